use once_cell::sync::Lazy;
use url::Url;

const USERS_URL: &str = "https://jsonplaceholder.typicode.com/users";
const COMMENTS_URL: &str = "https://jsonplaceholder.typicode.com/comments";

// Constants, so parsing cannot fail at runtime
static USERS: Lazy<Url> = Lazy::new(|| Url::parse(USERS_URL).unwrap());
static COMMENTS: Lazy<Url> = Lazy::new(|| Url::parse(COMMENTS_URL).unwrap());

/// A fixed remote resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    UsersFetch,
    CommentsFetch,
}

impl Endpoint {

    pub fn url_str(&self) -> &'static str {
        match self {
            Endpoint::UsersFetch => USERS_URL,
            Endpoint::CommentsFetch => COMMENTS_URL,
        }
    }

    pub fn url(&self) -> &'static Url {
        match self {
            Endpoint::UsersFetch => &USERS,
            Endpoint::CommentsFetch => &COMMENTS,
        }
    }

}
