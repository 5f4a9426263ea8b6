use std::path::Path;

use client_logging::client_debug;

use crate::{ClientError, ErrorKind, TaskClient};

/// Only Netscape-format cookie exports (plain text) are accepted.
pub const COOKIE_FILE_EXTENSION: &str = "txt";

/// A cookies file that passed the local checks and is ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieFile {
    pub file_name: String,
    pub contents: Vec<u8>,
}

impl CookieFile {
    /// Checks the file name, then the size, then reads the raw bytes.
    /// Nothing is sent anywhere.
    pub async fn load(path: &Path, max_bytes: u64) -> Result<Self, ClientError> {
        let file_name = check_file_name(path)?;

        let metadata = tokio::fs::metadata(path).await.map_err(|err| unreadable(path, err))?;
        if !metadata.is_file() {
            return Err(ClientError::new(
                ErrorKind::FileUnreadable,
                format!("{} is not a file", path.display()),
            ));
        }
        if metadata.len() > max_bytes {
            return Err(too_large(max_bytes, metadata.len()));
        }

        let contents = tokio::fs::read(path).await.map_err(|err| unreadable(path, err))?;
        // The file may have grown between the two calls.
        if contents.len() as u64 > max_bytes {
            return Err(too_large(max_bytes, contents.len() as u64));
        }
        client_debug!("Packaged cookie file {} ({} bytes)", file_name, contents.len());
        Ok(Self {
            file_name,
            contents,
        })
    }
}

/// Packages the file at `path` and sends it. Local checks fail before any request.
pub async fn upload_cookie_file(
    client: &dyn TaskClient,
    path: &Path,
    max_bytes: u64,
) -> Result<(), ClientError> {
    let file = CookieFile::load(path, max_bytes).await?;
    client.upload_cookies(file).await
}

fn check_file_name(path: &Path) -> Result<String, ClientError> {
    let suffix = format!(".{COOKIE_FILE_EXTENSION}");
    let file_name = path.file_name().and_then(|name| name.to_str());
    // Suffix match rather than `Path::extension`, which ignores a bare ".txt".
    let has_text_suffix = |name: &str| {
        name.len() >= suffix.len()
            && name.as_bytes()[name.len() - suffix.len()..].eq_ignore_ascii_case(suffix.as_bytes())
    };

    match file_name {
        Some(name) if has_text_suffix(name) => Ok(name.to_owned()),
        _ => Err(ClientError::new(
            ErrorKind::UnsupportedFileType,
            format!("Please upload a .{COOKIE_FILE_EXTENSION} file"),
        )),
    }
}

fn unreadable(path: &Path, err: std::io::Error) -> ClientError {
    ClientError::new(
        ErrorKind::FileUnreadable,
        format!("Could not read {}: {err}", path.display()),
    )
}

fn too_large(max_bytes: u64, actual: u64) -> ClientError {
    ClientError::new(
        ErrorKind::FileTooLarge { max_bytes, actual },
        format!("Cookie file is too large ({actual} bytes, limit {max_bytes})"),
    )
}
