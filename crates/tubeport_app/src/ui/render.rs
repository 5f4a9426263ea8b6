use tubeport_core::{AppViewModel, Notification, Severity, TaskStatus, TaskView, UrlValidity};

const COOKIE_HINT: &[&str] = &[
    "Tip: for age-restricted or geo-blocked videos, export cookies from your browser:",
    "  1. Install a browser extension like \"Get cookies.txt LOCALLY\"",
    "  2. Visit YouTube and log in",
    "  3. Export cookies for youtube.com",
    "  4. Run again with --cookie-file <cookies.txt>",
];

/// Renders the view model as terminal lines. Pure; printing is the caller's job.
pub fn render(view: &AppViewModel) -> Vec<String> {
    let mut lines = Vec::new();

    if view.url_validity == UrlValidity::Invalid {
        lines.push("Please enter a valid YouTube URL".to_string());
    }

    match &view.task {
        Some(task) => render_task(task, &mut lines),
        None if view.busy => lines.push("Submitting...".to_string()),
        None => {}
    }

    if view.uploads_in_flight > 0 {
        lines.push("Uploading cookies...".to_string());
    }
    if let Some(notification) = &view.notification {
        lines.push(format_notification(notification));
    }

    lines
}

fn render_task(task: &TaskView, lines: &mut Vec<String>) {
    let marker = match task.status {
        TaskStatus::Completed => "OK",
        TaskStatus::Failed => "ERR",
        _ => "..",
    };
    match &task.task_id {
        Some(task_id) => lines.push(format!("[{marker}] {} (task {task_id})", task.status)),
        None => lines.push(format!("[{marker}] {}", task.status)),
    }
    if let Some(progress) = &task.progress {
        lines.push(format!("     {progress}"));
    }
    if let Some(error) = &task.error {
        lines.push(format!("     Error: {error}"));
    }
    if task.cookie_hint {
        lines.extend(COOKIE_HINT.iter().map(|line| format!("     {line}")));
    }
    if let Some(url) = &task.result_url {
        lines.push(format!("     Download complete: {url}"));
    }
}

fn format_notification(notification: &Notification) -> String {
    let tag = match notification.severity {
        Severity::Information => "info",
        Severity::Error => "error",
    };
    format!("[{tag}] {}", notification.text)
}
