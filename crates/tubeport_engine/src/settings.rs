use std::time::Duration;

use url::Url;

use crate::{ClientError, ErrorKind};

#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Root of the remote service; the `/api/...` routes hang below it.
    pub base_url: String,
    pub poll_interval: Duration,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_cookie_file_bytes: u64,
    pub max_response_bytes: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:10000".to_string(),
            poll_interval: Duration::from_millis(2000),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_cookie_file_bytes: 100 * 1024 * 1024,
            max_response_bytes: 1024 * 1024,
        }
    }
}

impl ClientSettings {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Checks the settings and returns the parsed base URL.
    pub fn validate(&self) -> Result<Url, ClientError> {
        let base = Url::parse(&self.base_url).map_err(|err| {
            ClientError::new(
                ErrorKind::InvalidSettings,
                format!("invalid service url {:?}: {err}", self.base_url),
            )
        })?;
        if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
            return Err(ClientError::new(
                ErrorKind::InvalidSettings,
                format!("service url {:?} must be an http(s) url", self.base_url),
            ));
        }
        if self.poll_interval.is_zero() {
            return Err(ClientError::new(
                ErrorKind::InvalidSettings,
                "poll interval must be greater than zero",
            ));
        }
        Ok(base)
    }
}
