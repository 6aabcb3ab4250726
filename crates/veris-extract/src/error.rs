use thiserror::Error;

/// Failures internal to one extraction call.
///
/// These never cross the stage boundary: `extract` catches them, logs, and
/// returns an empty claim list.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("extraction API returned status {status}")]
    Api { status: u16 },

    #[error("malformed extraction response: {0}")]
    MalformedResponse(String),
}
