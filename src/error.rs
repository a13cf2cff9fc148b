use thiserror::Error;

/// A user-supplied date that does not match `DD/MM/YYYY`.
#[derive(Debug, Error)]
#[error("invalid date {input:?}: expected DD/MM/YYYY")]
pub struct DateFormatError {
    pub input: String,
}

/// Failure talking to the mailbox service.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("service returned {status}: {message}")]
    Status { status: u16, message: String },
}

/// Failure reversing a body's transport encoding.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid base64 data: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("body is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Why a single message was dropped from a batch. Message-level failures
/// are logged with their reason and never abort the surrounding batch.
#[derive(Debug, Error)]
pub enum SkipReason {
    #[error("fetch failed: {0}")]
    Fetch(#[from] ApiError),
    #[error("body decode failed: {0}")]
    Decode(#[from] DecodeError),
}
