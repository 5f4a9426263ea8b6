use std::sync::{mpsc, Arc};

use client_logging::client_info;
use tubeport_core::{CookieUploadResult, Effect, Msg, StatusReport, TaskStatus};
use tubeport_engine::{
    ClientError, ClientSettings, CreateTaskRequest, EngineError, EngineEvent, EngineHandle,
    ErrorKind, EventSink, RemoteStatus, TaskReport,
};

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(settings: ClientSettings, msg_tx: mpsc::Sender<Msg>) -> Result<Self, EngineError> {
        let engine = EngineHandle::new(settings, Arc::new(MsgSink { tx: msg_tx }))?;
        Ok(Self { engine })
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::CreateTask {
                    chain,
                    url,
                    cookies,
                } => {
                    client_info!(
                        "CreateTask chain={} url={} with_cookies={}",
                        chain,
                        url,
                        cookies.is_some()
                    );
                    self.engine.submit(chain, CreateTaskRequest { url, cookies });
                }
                Effect::CancelChain { chain } => {
                    client_info!("CancelChain chain={}", chain);
                    self.engine.cancel(chain);
                }
                Effect::UploadCookieFile { path } => {
                    client_info!("UploadCookieFile path={:?}", path);
                    self.engine.upload_cookies(path);
                }
            }
        }
    }

    pub fn shutdown(self) {
        self.engine.shutdown();
    }
}

/// Turns engine events into core messages on the app's inbox.
struct MsgSink {
    tx: mpsc::Sender<Msg>,
}

impl EventSink for MsgSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(map_event(event));
    }
}

pub(crate) fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::TaskCreated { chain, task_id } => Msg::TaskCreated { chain, task_id },
        EngineEvent::TaskCreationFailed { chain, error } => Msg::TaskCreationFailed {
            chain,
            message: error.message,
        },
        EngineEvent::StatusReported { chain, report } => Msg::StatusReported {
            chain,
            report: map_report(report),
        },
        EngineEvent::PollFailed { chain, error } => Msg::PollFailed {
            chain,
            message: error.message,
        },
        EngineEvent::CookieUploadFinished { result } => {
            Msg::CookieUploadFinished(map_upload(result))
        }
    }
}

fn map_report(report: TaskReport) -> StatusReport {
    StatusReport {
        status: map_status(report.status),
        progress: report.progress,
        error: report.error,
        result_url: report.result_url,
    }
}

fn map_status(status: RemoteStatus) -> TaskStatus {
    match status {
        RemoteStatus::Pending => TaskStatus::Pending,
        RemoteStatus::Downloading => TaskStatus::Downloading,
        RemoteStatus::Converting => TaskStatus::Converting,
        RemoteStatus::Uploading => TaskStatus::Uploading,
        RemoteStatus::Completed => TaskStatus::Completed,
        RemoteStatus::Failed => TaskStatus::Failed,
    }
}

fn map_upload(result: Result<(), ClientError>) -> CookieUploadResult {
    match result {
        Ok(()) => CookieUploadResult::Stored,
        Err(err) if err.kind.is_validation() => CookieUploadResult::InvalidFile(err.message),
        Err(err) => match err.kind {
            ErrorKind::ServiceRejected { detail, .. } => CookieUploadResult::Rejected(detail),
            _ => CookieUploadResult::Unreachable,
        },
    }
}
