//! Tubeport engine: remote task client, polling chains and effect execution.
mod chain;
mod client;
mod credentials;
mod engine;
mod settings;
mod types;
mod wire;

pub use chain::{run_task_chain, EventSink};
pub use client::{ReqwestTaskClient, TaskClient};
pub use credentials::{upload_cookie_file, CookieFile, COOKIE_FILE_EXTENSION};
pub use engine::{EngineError, EngineHandle};
pub use settings::ClientSettings;
pub use types::{
    ChainId, ClientError, CreateTaskRequest, EngineEvent, ErrorKind, RemoteStatus, TaskReport,
};
