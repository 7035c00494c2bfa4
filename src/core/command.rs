use async_trait::async_trait;
use crate::core::library::DataError;

#[derive(Debug, Clone)]
pub enum CommandError {
    Access {
        message: String,
    },
    Save {
        message: String,
        reason_code: Option<String>,
    },
    CoverUpload {
        message: String,
        reason_code: Option<String>,
    },
    Upload {
        message: String,
        reason_code: Option<String>,
        retryable: bool,
    },
    Unavailable {
        message: String,
        reason_code: Option<String>,
        retryable: bool,
    },
    NotFound {
        message: String,
    },
    Validation {
        message: String,
        reason_code: Option<String>,
    },
    Serialization {
        message: String,
    },
    Runtime {
        message: String,
        reason_code: Option<String>,
    },
}

#[async_trait]
pub trait Command<Request, Response>: Sync + Send {
    async fn execute(&self, req: Request) -> Result<Response, CommandError>;
}

impl From<DataError> for CommandError {
    fn from(other: DataError) -> Self {
        match other {
            DataError::Unauthorized { message } => {
                CommandError::Access { message }
            }
            DataError::SaveFailed { message, reason_code } => {
                CommandError::Save { message, reason_code }
            }
            DataError::CoverUpload { message, reason_code } => {
                CommandError::CoverUpload { message, reason_code }
            }
            DataError::UploadFailed { message, reason_code, retryable } => {
                CommandError::Upload { message, reason_code, retryable }
            }
            DataError::Unavailable { message, reason_code, retryable } => {
                CommandError::Unavailable { message, reason_code, retryable }
            }
            DataError::NotFound { message } => {
                CommandError::NotFound { message }
            }
            DataError::Validation { message, reason_code } => {
                CommandError::Validation { message, reason_code }
            }
            DataError::Serialization { message } => {
                CommandError::Serialization { message }
            }
            DataError::Runtime { message, reason_code } => {
                CommandError::Runtime { message, reason_code }
            }
        }
    }
}
