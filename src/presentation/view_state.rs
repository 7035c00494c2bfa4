use crate::core::command::CommandError;
use crate::core::library::DataError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Status {
    Loading,
    Success,
    Error,
}

// What went wrong, with enough shape for the UI to pick between a retry
// affordance and a dead-end message.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewError {
    NotFound {
        message: String,
    },
    Failed {
        message: String,
        retryable: bool,
    },
}

impl ViewError {
    pub fn not_found(message: &str) -> ViewError {
        ViewError::NotFound { message: message.to_string() }
    }

    pub fn failed(message: &str, retryable: bool) -> ViewError {
        ViewError::Failed { message: message.to_string(), retryable }
    }

    pub fn retryable(&self) -> bool {
        match self {
            ViewError::NotFound { .. } => { false }
            ViewError::Failed { retryable, .. } => { *retryable }
        }
    }
}

impl From<DataError> for ViewError {
    fn from(err: DataError) -> Self {
        match err {
            DataError::NotFound { message } => ViewError::NotFound { message },
            other => {
                let retryable = other.retryable();
                ViewError::failed(other.to_string().as_str(), retryable)
            }
        }
    }
}

impl From<CommandError> for ViewError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::NotFound { message } => ViewError::NotFound { message },
            CommandError::Unavailable { message, retryable, .. } => {
                ViewError::failed(message.as_str(), retryable)
            }
            CommandError::Upload { message, retryable, .. } => {
                ViewError::failed(message.as_str(), retryable)
            }
            other => ViewError::failed(format!("{:?}", other).as_str(), false),
        }
    }
}

/// Single-slot render state: latest emission wins, and the state persists
/// until explicitly replaced.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState<T: Clone> {
    pub status: Status,
    pub data: Option<T>,
    pub error: Option<ViewError>,
}

impl<T: Clone> ViewState<T> {
    pub fn loading() -> Self {
        Self {
            status: Status::Loading,
            data: None,
            error: None,
        }
    }

    pub fn success(data: T) -> Self {
        Self {
            status: Status::Success,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(error: ViewError) -> Self {
        Self {
            status: Status::Error,
            data: None,
            error: Some(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::core::library::DataError;
    use crate::presentation::view_state::{Status, ViewError, ViewState};

    #[tokio::test]
    async fn test_should_build_view_states() {
        let loading: ViewState<String> = ViewState::loading();
        assert_eq!(Status::Loading, loading.status);
        assert_eq!(None, loading.data);

        let success = ViewState::success("book".to_string());
        assert_eq!(Status::Success, success.status);
        assert_eq!(Some("book".to_string()), success.data);

        let error: ViewState<String> = ViewState::error(ViewError::not_found("Book not found"));
        assert_eq!(Status::Error, error.status);
        assert_eq!(Some(ViewError::not_found("Book not found")), error.error);
    }

    #[tokio::test]
    async fn test_should_distinguish_not_found_from_failure() {
        let not_found = ViewError::from(DataError::not_found("gone"));
        assert!(matches!(not_found, ViewError::NotFound { .. }));
        assert!(!not_found.retryable());

        let failed = ViewError::from(DataError::unavailable("down", None, true));
        assert!(matches!(failed, ViewError::Failed { .. }));
        assert!(failed.retryable());
    }
}
