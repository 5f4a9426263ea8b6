use futures_util::StreamExt;
use reqwest::StatusCode;
use url::Url;

use client_logging::{client_debug, client_warn};

use crate::wire::{decode_detail, decode_report, decode_task_id, CreateTaskBody};
use crate::{ClientError, ClientSettings, CookieFile, CreateTaskRequest, ErrorKind, TaskReport};

const CREATE_UNREACHABLE: &str = "Network error occurred. Please check if the backend is running.";
const POLL_UNREACHABLE: &str = "Lost connection to server. Please try again.";
const UPLOAD_UNREACHABLE: &str = "Failed to upload cookies. Please check your connection.";

/// The three operations of the remote processing service.
#[async_trait::async_trait]
pub trait TaskClient: Send + Sync {
    /// Submits a URL that already passed validation; returns the task id.
    async fn create_task(&self, request: &CreateTaskRequest) -> Result<String, ClientError>;

    /// Fetches the current status of one task.
    async fn poll_once(&self, task_id: &str) -> Result<TaskReport, ClientError>;

    /// Sends a packaged cookies file. The service decides whether it was stored.
    async fn upload_cookies(&self, file: CookieFile) -> Result<(), ClientError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestTaskClient {
    settings: ClientSettings,
    base: Url,
    http: reqwest::Client,
}

impl ReqwestTaskClient {
    pub fn new(settings: ClientSettings) -> Result<Self, ClientError> {
        let base = settings.validate()?;
        let http = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ClientError::new(ErrorKind::InvalidSettings, err.to_string()))?;
        Ok(Self {
            settings,
            base,
            http,
        })
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| {
                ClientError::new(ErrorKind::InvalidSettings, "service url cannot carry a path")
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Reads a response body, refusing anything above `max_response_bytes`.
    /// An error body over the limit is dropped instead, so the caller falls
    /// back to its status-code message.
    async fn read_body(
        &self,
        response: reqwest::Response,
        unreachable: &str,
    ) -> Result<(StatusCode, Vec<u8>), ClientError> {
        let status = response.status();
        let max_bytes = self.settings.max_response_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return oversized(status, max_bytes, content_len);
            }
        }

        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|err| network_error(unreachable, &err))?;
            let next_len = body.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return oversized(status, max_bytes, next_len);
            }
            body.extend_from_slice(&chunk);
        }
        Ok((status, body))
    }
}

#[async_trait::async_trait]
impl TaskClient for ReqwestTaskClient {
    async fn create_task(&self, request: &CreateTaskRequest) -> Result<String, ClientError> {
        let url = self.endpoint(&["api", "download"])?;
        client_debug!(
            "POST {} url={} cookies_len={}",
            url,
            request.url,
            request.cookies.as_ref().map_or(0, String::len)
        );

        let body = CreateTaskBody {
            url: &request.url,
            cookies: request.cookies.as_deref(),
        };
        let response = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|err| network_error(CREATE_UNREACHABLE, &err))?;
        let (status, body) = self.read_body(response, CREATE_UNREACHABLE).await?;
        if !status.is_success() {
            return Err(rejected(
                status,
                &body,
                format!("Server error: {}", status.as_u16()),
            ));
        }
        decode_task_id(status.as_u16(), &body)
    }

    async fn poll_once(&self, task_id: &str) -> Result<TaskReport, ClientError> {
        let url = self.endpoint(&["api", "status", task_id])?;
        client_debug!("GET {}", url);

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|err| network_error(POLL_UNREACHABLE, &err))?;
        let (status, body) = self.read_body(response, POLL_UNREACHABLE).await?;
        if !status.is_success() {
            return Err(rejected(
                status,
                &body,
                format!("Status check failed: {}", status.as_u16()),
            ));
        }
        decode_report(status.as_u16(), &body, task_id)
    }

    async fn upload_cookies(&self, file: CookieFile) -> Result<(), ClientError> {
        let url = self.endpoint(&["api", "upload-cookies"])?;
        client_debug!(
            "POST {} file={} bytes={}",
            url,
            file.file_name,
            file.contents.len()
        );

        let part = reqwest::multipart::Part::bytes(file.contents)
            .file_name(file.file_name)
            .mime_str("text/plain")
            .map_err(|err| ClientError::new(ErrorKind::FileUnreadable, err.to_string()))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .http
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|err| network_error(UPLOAD_UNREACHABLE, &err))?;
        let (status, body) = self.read_body(response, UPLOAD_UNREACHABLE).await?;
        if !status.is_success() {
            return Err(rejected(
                status,
                &body,
                format!("Upload failed: {}", status.as_u16()),
            ));
        }
        Ok(())
    }
}

fn network_error(message: &str, err: &reqwest::Error) -> ClientError {
    client_warn!("Request failed without a response: {}", err);
    ClientError::new(ErrorKind::Network, message)
}

fn rejected(status: StatusCode, body: &[u8], fallback: String) -> ClientError {
    let detail = decode_detail(body);
    client_warn!(
        "Service rejected request with {}: {}",
        status,
        detail.as_deref().unwrap_or("<no detail>")
    );
    let message = detail.clone().unwrap_or(fallback);
    ClientError::new(
        ErrorKind::ServiceRejected {
            status: status.as_u16(),
            detail,
        },
        message,
    )
}

/// Over-limit success bodies are rejected; over-limit error bodies are
/// dropped and the error is reported from the status code alone.
fn oversized(
    status: StatusCode,
    max_bytes: u64,
    actual: u64,
) -> Result<(StatusCode, Vec<u8>), ClientError> {
    if !status.is_success() {
        client_debug!("Discarding {} error body of {} bytes", status, actual);
        return Ok((status, Vec::new()));
    }
    Err(ClientError::new(
        ErrorKind::ServiceRejected {
            status: status.as_u16(),
            detail: None,
        },
        format!("Server response too large ({actual} bytes, limit {max_bytes})"),
    ))
}
