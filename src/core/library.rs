use std::fmt;
use std::fmt::{Display, Formatter};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub enum DataError {
    Unauthorized {
        message: String,
    },
    SaveFailed {
        message: String,
        reason_code: Option<String>,
    },
    // The book record itself may already be durably saved when the cover
    // pipeline fails, so this must stay distinguishable from SaveFailed.
    CoverUpload {
        message: String,
        reason_code: Option<String>,
    },
    UploadFailed {
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

impl DataError {
    pub fn unauthorized(message: &str) -> DataError {
        DataError::Unauthorized { message: message.to_string() }
    }

    pub fn save_failed(message: &str, reason_code: Option<String>) -> DataError {
        DataError::SaveFailed { message: message.to_string(), reason_code }
    }

    pub fn cover_upload(message: &str, reason_code: Option<String>) -> DataError {
        DataError::CoverUpload { message: message.to_string(), reason_code }
    }

    pub fn upload_failed(message: &str, reason_code: Option<String>, retryable: bool) -> DataError {
        DataError::UploadFailed { message: message.to_string(), reason_code, retryable }
    }

    pub fn unavailable(message: &str, reason_code: Option<String>, retryable: bool) -> DataError {
        DataError::Unavailable { message: message.to_string(), reason_code, retryable }
    }

    pub fn not_found(message: &str) -> DataError {
        DataError::NotFound { message: message.to_string() }
    }

    pub fn validation(message: &str, reason_code: Option<String>) -> DataError {
        DataError::Validation { message: message.to_string(), reason_code }
    }

    pub fn serialization(message: &str) -> DataError {
        DataError::Serialization { message: message.to_string() }
    }

    pub fn runtime(message: &str, reason_code: Option<String>) -> DataError {
        DataError::Runtime { message: message.to_string(), reason_code }
    }

    pub fn retryable(&self) -> bool {
        match self {
            DataError::Unauthorized { .. } => { false }
            DataError::SaveFailed { .. } => { false }
            DataError::CoverUpload { .. } => { false }
            DataError::UploadFailed { retryable, .. } => { *retryable }
            DataError::Unavailable { retryable, .. } => { *retryable }
            DataError::NotFound { .. } => { false }
            DataError::Validation { .. } => { false }
            DataError::Serialization { .. } => { false }
            DataError::Runtime { .. } => { false }
        }
    }
}

impl From<std::io::Error> for DataError {
    fn from(err: std::io::Error) -> Self {
        DataError::runtime(
            format!("file io {:?}", err).as_str(), None)
    }
}

impl From<serde_json::Error> for DataError {
    fn from(err: serde_json::Error) -> Self {
        DataError::serialization(
            format!("serde json parsing {:?}", err).as_str())
    }
}

impl Display for DataError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            DataError::Unauthorized { message } => {
                write!(f, "{}", message)
            }
            DataError::SaveFailed { message, reason_code } => {
                write!(f, "{} {:?}", message, reason_code)
            }
            DataError::CoverUpload { message, reason_code } => {
                write!(f, "{} {:?}", message, reason_code)
            }
            DataError::UploadFailed { message, reason_code, retryable } => {
                write!(f, "{} {:?} {}", message, reason_code, retryable)
            }
            DataError::Unavailable { message, reason_code, retryable } => {
                write!(f, "{} {:?} {}", message, reason_code, retryable)
            }
            DataError::NotFound { message } => {
                write!(f, "{}", message)
            }
            DataError::Validation { message, reason_code } => {
                write!(f, "{} {:?}", message, reason_code)
            }
            DataError::Serialization { message } => {
                write!(f, "{}", message)
            }
            DataError::Runtime { message, reason_code } => {
                write!(f, "{} {:?}", message, reason_code)
            }
        }
    }
}

/// A specialized Result type for the data-access layer.
pub type DataResult<T> = Result<T, DataError>;

#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub enum MediaType {
    Paper,
    Ebook,
}

impl From<String> for MediaType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Paper" => MediaType::Paper,
            "Ebook" => MediaType::Ebook,
            _ => MediaType::Paper,
        }
    }
}

impl Display for MediaType {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            MediaType::Paper => write!(f, "Paper"),
            MediaType::Ebook => write!(f, "Ebook"),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::core::library::{DataError, MediaType};

    #[tokio::test]
    async fn test_should_create_unauthorized_error() {
        assert!(matches!(DataError::unauthorized("test"), DataError::Unauthorized{ message: _ }));
    }

    #[tokio::test]
    async fn test_should_create_save_failed_error() {
        assert!(matches!(DataError::save_failed("test", None), DataError::SaveFailed{ message: _, reason_code: _ }));
    }

    #[tokio::test]
    async fn test_should_create_cover_upload_error() {
        assert!(matches!(DataError::cover_upload("test", None), DataError::CoverUpload{ message: _, reason_code: _ }));
    }

    #[tokio::test]
    async fn test_should_create_upload_failed_error() {
        assert!(matches!(DataError::upload_failed("test", None, true), DataError::UploadFailed{ message: _, reason_code: _, retryable: _ }));
    }

    #[tokio::test]
    async fn test_should_create_unavailable_error() {
        assert!(matches!(DataError::unavailable("test", None, false), DataError::Unavailable{ message: _, reason_code: _, retryable: _ }));
    }

    #[tokio::test]
    async fn test_should_create_not_found_error() {
        assert!(matches!(DataError::not_found("test"), DataError::NotFound{ message: _ }));
    }

    #[tokio::test]
    async fn test_should_create_validation_error() {
        assert!(matches!(DataError::validation("test", None), DataError::Validation{ message: _, reason_code: _ }));
    }

    #[tokio::test]
    async fn test_should_create_serialization_error() {
        assert!(matches!(DataError::serialization("test"), DataError::Serialization{ message: _ }));
    }

    #[tokio::test]
    async fn test_should_create_runtime_error() {
        assert!(matches!(DataError::runtime("test", None), DataError::Runtime{ message: _, reason_code: _ }));
    }

    #[tokio::test]
    async fn test_should_create_retryable_error() {
        assert_eq!(false, DataError::unauthorized("test").retryable());
        assert_eq!(false, DataError::save_failed("test", None).retryable());
        assert_eq!(false, DataError::cover_upload("test", None).retryable());
        assert_eq!(true, DataError::upload_failed("test", None, true).retryable());
        assert_eq!(false, DataError::upload_failed("test", None, false).retryable());
        assert_eq!(true, DataError::unavailable("test", None, true).retryable());
        assert_eq!(false, DataError::unavailable("test", None, false).retryable());
        assert_eq!(false, DataError::not_found("test").retryable());
        assert_eq!(false, DataError::validation("test", None).retryable());
        assert_eq!(false, DataError::serialization("test").retryable());
        assert_eq!(false, DataError::runtime("test", None).retryable());
    }

    #[tokio::test]
    async fn test_should_convert_serde_error() {
        let err = serde_json::from_str::<i64>("not a number").unwrap_err();
        assert!(matches!(DataError::from(err), DataError::Serialization{ message: _ }));
    }

    #[tokio::test]
    async fn test_should_format_media_type() {
        let kinds = vec![
            MediaType::Paper,
            MediaType::Ebook,
        ];
        for kind in kinds {
            let str = kind.to_string();
            let str_kind = MediaType::from(str);
            assert_eq!(kind, str_kind);
        }
    }

    #[tokio::test]
    async fn test_should_default_unknown_media_type() {
        assert_eq!(MediaType::Paper, MediaType::from("Vinyl".to_string()));
    }
}
