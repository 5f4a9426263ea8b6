//! JSON bodies exchanged with the remote service.
//!
//! Responses are decoded into typed values here; a body with the wrong shape
//! is reported as a rejection rather than passed along.

use serde::{Deserialize, Serialize};

use crate::{ClientError, ErrorKind, RemoteStatus, TaskReport};

#[derive(Debug, Serialize)]
pub(crate) struct CreateTaskBody<'a> {
    pub url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cookies: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct CreateTaskResponse {
    task_id: String,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    #[serde(default)]
    task_id: Option<String>,
    status: RemoteStatus,
    #[serde(default)]
    progress: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    cloudinary_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

fn malformed(status: u16, what: &str, err: impl std::fmt::Display) -> ClientError {
    ClientError::new(
        ErrorKind::ServiceRejected {
            status,
            detail: None,
        },
        format!("Unexpected {what} response from server: {err}"),
    )
}

pub(crate) fn decode_task_id(status: u16, body: &[u8]) -> Result<String, ClientError> {
    let parsed: CreateTaskResponse =
        serde_json::from_slice(body).map_err(|err| malformed(status, "task creation", err))?;
    if parsed.task_id.is_empty() {
        return Err(malformed(status, "task creation", "empty task id"));
    }
    Ok(parsed.task_id)
}

/// Decodes a status body. A `task_id` echoed by the service must match
/// `expected_task_id`; a body without one is taken to be about that task.
pub(crate) fn decode_report(
    status: u16,
    body: &[u8],
    expected_task_id: &str,
) -> Result<TaskReport, ClientError> {
    let parsed: StatusResponse =
        serde_json::from_slice(body).map_err(|err| malformed(status, "status", err))?;
    if let Some(echoed) = parsed.task_id.as_deref() {
        if echoed != expected_task_id {
            return Err(malformed(
                status,
                "status",
                format!("expected task {expected_task_id}, got {echoed}"),
            ));
        }
    }

    let result_url = match parsed.status {
        RemoteStatus::Completed => match parsed.cloudinary_url.filter(|url| !url.is_empty()) {
            Some(url) => Some(url),
            None => return Err(malformed(status, "status", "completed task has no result url")),
        },
        _ => None,
    };
    let error = match parsed.status {
        RemoteStatus::Failed => Some(
            parsed
                .error
                .filter(|error| !error.trim().is_empty())
                .unwrap_or_else(|| "Processing failed without details.".to_string()),
        ),
        _ => None,
    };

    Ok(TaskReport {
        task_id: expected_task_id.to_string(),
        status: parsed.status,
        progress: parsed.progress.filter(|progress| !progress.is_empty()),
        error,
        result_url,
    })
}

/// Extracts `detail` from an error body. Non-string details (such as
/// validation error lists) are rendered as compact JSON.
pub(crate) fn decode_detail(body: &[u8]) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_slice(body).ok()?;
    match parsed.detail? {
        serde_json::Value::String(text) if !text.trim().is_empty() => Some(text),
        serde_json::Value::String(_) | serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}
