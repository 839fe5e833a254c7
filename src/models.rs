use serde::{Deserialize, Serialize};

/// A user, as served by the [users endpoint](crate::Endpoint::UsersFetch) \
/// Any further fields in the response are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// A comment, as served by the [comments endpoint](crate::Endpoint::CommentsFetch)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(rename = "postId")]
    pub post_id: i64,
    pub id: i64,
    /// The comment title
    pub name: String,
    /// The authors email
    pub email: String,
    pub body: String,
}
