use std::fmt;

/// Processing stage reported by the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    Downloading,
    Converting,
    Uploading,
    Completed,
    Failed,
}

impl TaskStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }

    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::Downloading => "Downloading",
            TaskStatus::Converting => "Converting",
            TaskStatus::Uploading => "Uploading",
            TaskStatus::Completed => "Completed",
            TaskStatus::Failed => "Failed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One decoded status response, already matched to the tracked task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub status: TaskStatus,
    pub progress: Option<String>,
    pub error: Option<String>,
    pub result_url: Option<String>,
}

impl StatusReport {
    pub fn new(status: TaskStatus) -> Self {
        Self {
            status,
            progress: None,
            error: None,
            result_url: None,
        }
    }
}

/// Outcome of feeding a report or failure into a [`Task`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Applied,
    /// The task was already terminal; nothing changed.
    Absorbed,
}

/// The tracked remote job.
///
/// Stages are taken verbatim from the service. `Completed` and `Failed`
/// absorb every later update. `result_url` is only kept while completed and
/// `error` only while failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    task_id: Option<String>,
    status: TaskStatus,
    progress: Option<String>,
    error: Option<String>,
    result_url: Option<String>,
}

impl Task {
    /// A freshly created task, before the first poll resolves.
    pub fn pending(task_id: impl Into<String>) -> Self {
        Self {
            task_id: Some(task_id.into()),
            status: TaskStatus::Pending,
            progress: None,
            error: None,
            result_url: None,
        }
    }

    /// A submission the service never accepted; it has no identifier.
    pub fn rejected(error: impl Into<String>) -> Self {
        Self {
            task_id: None,
            status: TaskStatus::Failed,
            progress: None,
            error: Some(error.into()),
            result_url: None,
        }
    }

    pub fn task_id(&self) -> Option<&str> {
        self.task_id.as_deref()
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn progress(&self) -> Option<&str> {
        self.progress.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn result_url(&self) -> Option<&str> {
        self.result_url.as_deref()
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn apply_report(&mut self, report: StatusReport) -> Transition {
        if self.is_terminal() {
            return Transition::Absorbed;
        }
        self.status = report.status;
        self.progress = report.progress;
        self.error = match report.status {
            TaskStatus::Failed => Some(
                report
                    .error
                    .unwrap_or_else(|| "Processing failed without details.".to_string()),
            ),
            _ => None,
        };
        self.result_url = match report.status {
            TaskStatus::Completed => report.result_url,
            _ => None,
        };
        Transition::Applied
    }

    /// Local failure (lost connection, rejected poll). Keeps the last progress text.
    pub fn fail(&mut self, error: impl Into<String>) -> Transition {
        if self.is_terminal() {
            return Transition::Absorbed;
        }
        self.status = TaskStatus::Failed;
        self.error = Some(error.into());
        self.result_url = None;
        Transition::Applied
    }
}
