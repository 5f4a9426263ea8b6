use std::io::Write;
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use tubeport_engine::{
    upload_cookie_file, ClientSettings, CreateTaskRequest, ErrorKind, RemoteStatus,
    ReqwestTaskClient, TaskClient,
};
use wiremock::matchers::{body_json, body_string_contains, header_regex, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ReqwestTaskClient {
    ReqwestTaskClient::new(ClientSettings::with_base_url(server.uri())).expect("client")
}

/// A base url nothing listens on.
fn unreachable_base() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

fn request(cookies: Option<&str>) -> CreateTaskRequest {
    CreateTaskRequest {
        url: "https://youtu.be/abc123".to_string(),
        cookies: cookies.map(ToOwned::to_owned),
    }
}

#[tokio::test]
async fn create_task_posts_url_and_cookies() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/download"))
        .and(body_json(json!({"url": "https://youtu.be/abc123", "cookies": "Y29va2ll"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"task_id": "t1"})))
        .expect(1)
        .mount(&server)
        .await;

    let task_id = client_for(&server)
        .create_task(&request(Some("Y29va2ll")))
        .await
        .expect("created");
    assert_eq!(task_id, "t1");
}

#[tokio::test]
async fn create_task_omits_absent_cookies() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/download"))
        .and(body_json(json!({"url": "https://youtu.be/abc123"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"task_id": "t9"})))
        .expect(1)
        .mount(&server)
        .await;

    let task_id = client_for(&server).create_task(&request(None)).await.unwrap();
    assert_eq!(task_id, "t9");
}

#[tokio::test]
async fn create_task_surfaces_server_detail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/download"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"detail": "rate limited"})))
        .mount(&server)
        .await;

    let err = client_for(&server).create_task(&request(None)).await.unwrap_err();
    assert_eq!(err.message, "rate limited");
    assert_eq!(
        err.kind,
        ErrorKind::ServiceRejected {
            status: 500,
            detail: Some("rate limited".to_string())
        }
    );
}

#[tokio::test]
async fn create_task_falls_back_to_status_code_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/download"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let err = client_for(&server).create_task(&request(None)).await.unwrap_err();
    assert_eq!(err.message, "Server error: 503");
}

#[tokio::test]
async fn create_task_with_malformed_body_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/download"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "t1"})))
        .mount(&server)
        .await;

    let err = client_for(&server).create_task(&request(None)).await.unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ServiceRejected { status: 200, .. }));
}

#[tokio::test]
async fn create_task_without_server_is_a_network_error() {
    let client = ReqwestTaskClient::new(ClientSettings::with_base_url(unreachable_base())).unwrap();
    let err = client.create_task(&request(None)).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Network);
    assert_eq!(
        err.message,
        "Network error occurred. Please check if the backend is running."
    );
}

#[tokio::test]
async fn poll_once_accepts_status_without_task_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/status/t1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "completed",
            "cloudinary_url": "https://cdn/x.mp4"
        })))
        .mount(&server)
        .await;

    let report = client_for(&server).poll_once("t1").await.unwrap();
    assert_eq!(report.task_id, "t1");
    assert_eq!(report.status, RemoteStatus::Completed);
    assert_eq!(report.result_url.as_deref(), Some("https://cdn/x.mp4"));
}

#[tokio::test]
async fn poll_once_decodes_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/status/t1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "task_id": "t1",
            "status": "converting",
            "progress": "Encoding HEVC"
        })))
        .mount(&server)
        .await;

    let report = client_for(&server).poll_once("t1").await.unwrap();
    assert_eq!(report.task_id, "t1");
    assert_eq!(report.status, RemoteStatus::Converting);
    assert_eq!(report.progress.as_deref(), Some("Encoding HEVC"));
    assert_eq!(report.result_url, None);
}

#[tokio::test]
async fn poll_once_reports_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/status/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client_for(&server).poll_once("gone").await.unwrap_err();
    assert_eq!(err.message, "Status check failed: 404");
    assert!(matches!(err.kind, ErrorKind::ServiceRejected { status: 404, detail: None }));
}

#[tokio::test]
async fn poll_once_without_server_reports_lost_connection() {
    let client = ReqwestTaskClient::new(ClientSettings::with_base_url(unreachable_base())).unwrap();
    let err = client.poll_once("t1").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Network);
    assert_eq!(err.message, "Lost connection to server. Please try again.");
}

#[tokio::test]
async fn slow_status_response_times_out_as_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/status/t1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(json!({"task_id": "t1", "status": "pending"})),
        )
        .mount(&server)
        .await;

    let settings = ClientSettings {
        request_timeout: Duration::from_millis(50),
        ..ClientSettings::with_base_url(server.uri())
    };
    let client = ReqwestTaskClient::new(settings).unwrap();
    let err = client.poll_once("t1").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Network);
}

#[tokio::test]
async fn oversized_status_body_is_rejected() {
    let server = MockServer::start().await;
    let padding = "x".repeat(64);
    Mock::given(method("GET"))
        .and(path("/api/status/t1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "task_id": "t1",
            "status": "pending",
            "progress": padding
        })))
        .mount(&server)
        .await;

    let settings = ClientSettings {
        max_response_bytes: 32,
        ..ClientSettings::with_base_url(server.uri())
    };
    let client = ReqwestTaskClient::new(settings).unwrap();
    let err = client.poll_once("t1").await.unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ServiceRejected { status: 200, .. }));
}

#[tokio::test]
async fn oversized_error_body_falls_back_to_status_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/download"))
        .respond_with(ResponseTemplate::new(502).set_body_string("x".repeat(4096)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/status/t1"))
        .respond_with(ResponseTemplate::new(503).set_body_string("<html>".repeat(1024)))
        .mount(&server)
        .await;

    let settings = ClientSettings {
        max_response_bytes: 1024,
        ..ClientSettings::with_base_url(server.uri())
    };
    let client = ReqwestTaskClient::new(settings).unwrap();

    let err = client.create_task(&request(None)).await.unwrap_err();
    assert_eq!(
        err.kind,
        ErrorKind::ServiceRejected {
            status: 502,
            detail: None
        }
    );
    assert_eq!(err.message, "Server error: 502");

    let err = client.poll_once("t1").await.unwrap_err();
    assert_eq!(err.message, "Status check failed: 503");
}

fn cookie_file(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("cookies")
        .suffix(suffix)
        .tempfile()
        .unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[tokio::test]
async fn cookie_upload_sends_multipart_file_field() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/upload-cookies"))
        .and(header_regex("content-type", "^multipart/form-data"))
        .and(body_string_contains("name=\"file\""))
        .and(body_string_contains(".youtube.com\tTRUE"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    let file = cookie_file(".txt", "# Netscape HTTP Cookie File\n.youtube.com\tTRUE\t/\tTRUE\t0\tSID\tabc\n");
    let client = client_for(&server);
    upload_cookie_file(&client, file.path(), client.settings().max_cookie_file_bytes)
        .await
        .expect("uploaded");
}

#[tokio::test]
async fn cookie_upload_rejection_carries_detail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/upload-cookies"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"detail": "bad cookies"})))
        .mount(&server)
        .await;

    let file = cookie_file(".txt", "cookie");
    let client = client_for(&server);
    let err = upload_cookie_file(&client, file.path(), 1024).await.unwrap_err();
    assert_eq!(
        err.kind,
        ErrorKind::ServiceRejected {
            status: 400,
            detail: Some("bad cookies".to_string())
        }
    );
}

#[tokio::test]
async fn non_text_cookie_file_is_rejected_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/upload-cookies"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let file = cookie_file(".json", "{}");
    let client = client_for(&server);
    let err = upload_cookie_file(&client, file.path(), 1024).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnsupportedFileType);
    assert!(err.kind.is_validation());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn oversized_cookie_file_is_rejected_before_any_request() {
    let server = MockServer::start().await;
    let file = cookie_file(".txt", "0123456789abcdef");
    let client = client_for(&server);

    let err = upload_cookie_file(&client, file.path(), 8).await.unwrap_err();
    assert_eq!(
        err.kind,
        ErrorKind::FileTooLarge {
            max_bytes: 8,
            actual: 16
        }
    );
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_cookie_file_is_unreadable() {
    let server = MockServer::start().await;
    let client = client_for(&server);
    let err = upload_cookie_file(&client, std::path::Path::new("/nonexistent/cookies.txt"), 1024)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::FileUnreadable);
}
