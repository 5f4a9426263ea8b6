use std::path::PathBuf;

use crate::{ChainId, StatusReport};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the URL input.
    UrlChanged(String),
    /// User edited the inline cookies text.
    CookiesChanged(String),
    /// User asked to download and convert the current URL.
    SubmitClicked,
    /// User asked to start over.
    ResetClicked,
    /// User picked a cookies file to upload.
    CookieFileChosen(PathBuf),
    /// The service accepted the task.
    TaskCreated { chain: ChainId, task_id: String },
    /// Task creation failed; `message` is user-facing.
    TaskCreationFailed { chain: ChainId, message: String },
    /// A poll resolved with a decoded status.
    StatusReported { chain: ChainId, report: StatusReport },
    /// A poll failed; the chain has stopped.
    PollFailed { chain: ChainId, message: String },
    /// A cookies upload finished, either way.
    CookieUploadFinished(CookieUploadResult),
    /// User acknowledged the current notification.
    NotificationDismissed,
    NoOp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CookieUploadResult {
    Stored,
    /// Rejected locally before anything was sent.
    InvalidFile(String),
    /// The service answered with an error, optionally with its detail text.
    Rejected(Option<String>),
    /// No response from the service.
    Unreachable,
}
