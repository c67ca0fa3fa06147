use sinker_model::EnvelopeError;
use thiserror::Error;

/// Failure of a single API call.
///
/// The console treats every variant the same way (log and keep stale data);
/// the split exists for diagnostics.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("http request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("backend rejected request: code={code} msg={msg}")]
    Rejected { code: String, msg: String },

    #[error("response carried no entity")]
    MissingEntity,

    #[error("failed to decode {what}: {reason}")]
    Decode { what: &'static str, reason: String },

    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

impl From<EnvelopeError> for ClientError {
    fn from(err: EnvelopeError) -> Self {
        match err {
            EnvelopeError::Rejected { code, msg } => ClientError::Rejected { code, msg },
            EnvelopeError::MissingEntity => ClientError::MissingEntity,
        }
    }
}
