use crate::view_model::Notification;
use crate::{normalize_inline_cookies, AppState, CookieUploadResult, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::UrlChanged(raw) => {
            // Inputs are locked while a task is processing.
            if !state.is_busy() {
                state.set_url_input(raw);
            }
            Vec::new()
        }
        Msg::CookiesChanged(raw) => {
            if !state.is_busy() {
                state.set_cookies_input(raw);
            }
            Vec::new()
        }
        Msg::SubmitClicked => {
            if !state.can_submit() {
                return (state, Vec::new());
            }
            let url = state.url_input().trim().to_string();
            let cookies = normalize_inline_cookies(state.cookies_input());
            let chain = state.begin_chain();
            vec![Effect::CreateTask {
                chain,
                url,
                cookies,
            }]
        }
        Msg::ResetClicked => match state.reset() {
            Some(chain) => vec![Effect::CancelChain { chain }],
            None => Vec::new(),
        },
        Msg::CookieFileChosen(path) => {
            state.upload_started();
            vec![Effect::UploadCookieFile { path }]
        }
        Msg::TaskCreated { chain, task_id } => {
            if state.is_current(chain) {
                state.task_created(task_id);
            }
            Vec::new()
        }
        Msg::TaskCreationFailed { chain, message } => {
            if state.is_current(chain) {
                state.creation_failed(message);
            }
            Vec::new()
        }
        Msg::StatusReported { chain, report } => {
            if state.is_current(chain) {
                state.apply_report(report);
            }
            Vec::new()
        }
        Msg::PollFailed { chain, message } => {
            if state.is_current(chain) {
                state.poll_failed(message);
            }
            Vec::new()
        }
        Msg::CookieUploadFinished(result) => {
            state.upload_finished(upload_notification(result));
            Vec::new()
        }
        Msg::NotificationDismissed => {
            state.dismiss_notification();
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn upload_notification(result: CookieUploadResult) -> Notification {
    match result {
        CookieUploadResult::Stored => Notification::info("Cookies uploaded successfully!"),
        CookieUploadResult::InvalidFile(reason) => Notification::error(reason),
        CookieUploadResult::Rejected(detail) => Notification::error(format!(
            "Failed to upload cookies: {}",
            detail.as_deref().unwrap_or("Unknown error")
        )),
        CookieUploadResult::Unreachable => {
            Notification::error("Failed to upload cookies. Please check your connection.")
        }
    }
}
