use thiserror::Error;

pub type Result<T, E = FetchError> = std::result::Result<T, E>;

/// Everything that can end a fetch cycle \
/// Errors from the client and the decoder are passed through as they are, never wrapped further.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request could not be sent or the body could not be read
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The body was not valid JSON, or did not have the expected shape
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl FetchError {

    pub fn is_transport(&self) -> bool {
        matches!(self, FetchError::Transport(_))
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, FetchError::Decode(_))
    }

}
