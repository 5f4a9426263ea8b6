use crate::{Task, TaskStatus, UrlValidity};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Information,
    Error,
}

/// One-shot message shown to the user; not part of any task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub severity: Severity,
    pub text: String,
}

impl Notification {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            severity: Severity::Information,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub url: String,
    pub url_validity: UrlValidity,
    pub cookies: String,
    pub busy: bool,
    pub can_submit: bool,
    pub can_reset: bool,
    pub uploads_in_flight: usize,
    pub task: Option<TaskView>,
    pub notification: Option<Notification>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskView {
    pub task_id: Option<String>,
    pub status: TaskStatus,
    pub progress: Option<String>,
    pub error: Option<String>,
    pub result_url: Option<String>,
    /// The failure looks credential related; show how to export cookies.
    pub cookie_hint: bool,
}

impl TaskView {
    pub(crate) fn from_task(task: &Task) -> Self {
        let cookie_hint = task
            .error()
            .is_some_and(|error| error.to_ascii_lowercase().contains("cookies"));
        Self {
            task_id: task.task_id().map(ToOwned::to_owned),
            status: task.status(),
            progress: task.progress().map(ToOwned::to_owned),
            error: task.error().map(ToOwned::to_owned),
            result_url: task.result_url().map(ToOwned::to_owned),
            cookie_hint,
        }
    }
}
