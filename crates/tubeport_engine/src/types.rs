use std::fmt;

use thiserror::Error;

/// Identifies one submit-to-terminal chain; allocated by the caller.
pub type ChainId = u64;

/// Stage reported by the service's status route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteStatus {
    Pending,
    Downloading,
    Converting,
    Uploading,
    Completed,
    Failed,
}

impl RemoteStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, RemoteStatus::Completed | RemoteStatus::Failed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    pub url: String,
    pub cookies: Option<String>,
}

/// A validated status response.
///
/// `error` is only present when failed and `result_url` only when completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskReport {
    pub task_id: String,
    pub status: RemoteStatus,
    pub progress: Option<String>,
    pub error: Option<String>,
    pub result_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    TaskCreated {
        chain: ChainId,
        task_id: String,
    },
    TaskCreationFailed {
        chain: ChainId,
        error: ClientError,
    },
    StatusReported {
        chain: ChainId,
        report: TaskReport,
    },
    PollFailed {
        chain: ChainId,
        error: ClientError,
    },
    CookieUploadFinished {
        result: Result<(), ClientError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ClientError {
    pub kind: ErrorKind,
    /// User-facing text: the service's detail when it sent one.
    pub message: String,
}

impl ClientError {
    pub(crate) fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    UnsupportedFileType,
    FileTooLarge { max_bytes: u64, actual: u64 },
    FileUnreadable,
    InvalidSettings,
    /// No response was received.
    Network,
    /// Non-2xx status, or a body that does not have the expected shape.
    ServiceRejected { status: u16, detail: Option<String> },
}

impl ErrorKind {
    /// Caught locally, before any request was made.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ErrorKind::UnsupportedFileType
                | ErrorKind::FileTooLarge { .. }
                | ErrorKind::FileUnreadable
                | ErrorKind::InvalidSettings
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::UnsupportedFileType => write!(f, "unsupported file type"),
            ErrorKind::FileTooLarge { max_bytes, actual } => {
                write!(f, "file too large (max {max_bytes}, actual {actual})")
            }
            ErrorKind::FileUnreadable => write!(f, "file unreadable"),
            ErrorKind::InvalidSettings => write!(f, "invalid settings"),
            ErrorKind::Network => write!(f, "network error"),
            ErrorKind::ServiceRejected { status, .. } => write!(f, "service rejected ({status})"),
        }
    }
}
