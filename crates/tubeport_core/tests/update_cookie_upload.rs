use std::path::PathBuf;

use tubeport_core::{update, AppState, CookieUploadResult, Effect, Msg, Severity};

fn choose_file(state: AppState, name: &str) -> (AppState, Vec<Effect>) {
    update(state, Msg::CookieFileChosen(PathBuf::from(name)))
}

#[test]
fn upload_is_independent_of_an_active_task() {
    let (state, _) = update(AppState::new(), Msg::UrlChanged("https://youtu.be/abc".to_string()));
    let (state, _) = update(state, Msg::SubmitClicked);
    assert!(state.is_busy());

    let (state, effects) = choose_file(state, "cookies.txt");
    assert_eq!(
        effects,
        vec![Effect::UploadCookieFile {
            path: PathBuf::from("cookies.txt")
        }]
    );
    assert_eq!(state.uploads_in_flight(), 1);

    let (state, _) = update(state, Msg::CookieUploadFinished(CookieUploadResult::Stored));
    assert!(state.is_busy());
    assert_eq!(state.active_chain(), Some(1));
    assert_eq!(state.uploads_in_flight(), 0);
}

#[test]
fn upload_outcomes_become_notifications() {
    let cases = [
        (
            CookieUploadResult::Stored,
            Severity::Information,
            "Cookies uploaded successfully!",
        ),
        (
            CookieUploadResult::InvalidFile("Please upload a .txt file".to_string()),
            Severity::Error,
            "Please upload a .txt file",
        ),
        (
            CookieUploadResult::Rejected(Some("bad format".to_string())),
            Severity::Error,
            "Failed to upload cookies: bad format",
        ),
        (
            CookieUploadResult::Rejected(None),
            Severity::Error,
            "Failed to upload cookies: Unknown error",
        ),
        (
            CookieUploadResult::Unreachable,
            Severity::Error,
            "Failed to upload cookies. Please check your connection.",
        ),
    ];

    for (result, severity, text) in cases {
        let (state, _) = choose_file(AppState::new(), "cookies.txt");
        let (state, _) = update(state, Msg::CookieUploadFinished(result));
        let note = state.view().notification.expect("notification");
        assert_eq!(note.severity, severity);
        assert_eq!(note.text, text);
        assert!(state.task().is_none());
    }
}

#[test]
fn notification_can_be_dismissed() {
    let (state, _) = choose_file(AppState::new(), "cookies.txt");
    let (state, _) = update(state, Msg::CookieUploadFinished(CookieUploadResult::Stored));
    let (state, _) = update(state, Msg::NotificationDismissed);
    assert!(state.view().notification.is_none());
}

#[test]
fn reset_keeps_pending_upload_count() {
    let (state, _) = choose_file(AppState::new(), "cookies.txt");
    let (state, _) = update(state, Msg::ResetClicked);
    assert_eq!(state.uploads_in_flight(), 1);
}
