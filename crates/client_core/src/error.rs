use shared::error::{ErrorCode, ValidationError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid store url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("store request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("store rejected request with status {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("local store failure: {0:#}")]
    Local(#[from] anyhow::Error),
}

#[derive(Debug, Error)]
pub enum ManageError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("mutation failed: {source}")]
    MutationFailed { source: StoreError },
    #[error("no docente form is open")]
    FormClosed,
}

impl ManageError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation(_) | Self::FormClosed => ErrorCode::Validation,
            Self::MutationFailed { .. } => ErrorCode::MutationFailed,
        }
    }
}
