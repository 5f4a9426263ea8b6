use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use client_logging::{client_debug, client_info, client_warn};

use crate::chain::{run_task_chain, EventSink};
use crate::credentials::upload_cookie_file;
use crate::{
    ChainId, ClientError, ClientSettings, CreateTaskRequest, EngineEvent, ReqwestTaskClient,
    TaskClient,
};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid client settings: {0}")]
    Settings(#[from] ClientError),
    #[error("failed to start engine runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

enum EngineCommand {
    Submit {
        chain: ChainId,
        request: CreateTaskRequest,
    },
    Cancel {
        chain: ChainId,
    },
    UploadCookies {
        path: PathBuf,
    },
}

/// Runs all network work on one current-thread runtime owned by a
/// dedicated thread. Results are delivered through the [`EventSink`].
pub struct EngineHandle {
    cmd_tx: Option<mpsc::UnboundedSender<EngineCommand>>,
    worker: Option<thread::JoinHandle<()>>,
}

impl EngineHandle {
    pub fn new(settings: ClientSettings, sink: Arc<dyn EventSink>) -> Result<Self, EngineError> {
        let client = Arc::new(ReqwestTaskClient::new(settings.clone())?);
        Self::with_client(client, &settings, sink)
    }

    pub fn with_client(
        client: Arc<dyn TaskClient>,
        settings: &ClientSettings,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, EngineError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let limits = Limits {
            poll_interval: settings.poll_interval,
            max_cookie_file_bytes: settings.max_cookie_file_bytes,
        };

        let worker = thread::Builder::new()
            .name("tubeport-engine".to_string())
            .spawn(move || runtime.block_on(dispatch(client, cmd_rx, sink, limits)))?;

        Ok(Self {
            cmd_tx: Some(cmd_tx),
            worker: Some(worker),
        })
    }

    pub fn submit(&self, chain: ChainId, request: CreateTaskRequest) {
        self.send(EngineCommand::Submit { chain, request });
    }

    pub fn cancel(&self, chain: ChainId) {
        self.send(EngineCommand::Cancel { chain });
    }

    pub fn upload_cookies(&self, path: impl Into<PathBuf>) {
        self.send(EngineCommand::UploadCookies { path: path.into() });
    }

    fn send(&self, command: EngineCommand) {
        if let Some(cmd_tx) = &self.cmd_tx {
            let _ = cmd_tx.send(command);
        }
    }

    /// Cancels every chain still running and waits for the engine thread.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        self.cmd_tx = None;
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

#[derive(Debug, Clone, Copy)]
struct Limits {
    poll_interval: Duration,
    max_cookie_file_bytes: u64,
}

async fn dispatch(
    client: Arc<dyn TaskClient>,
    mut cmd_rx: mpsc::UnboundedReceiver<EngineCommand>,
    sink: Arc<dyn EventSink>,
    limits: Limits,
) {
    let mut chains: HashMap<ChainId, CancellationToken> = HashMap::new();

    while let Some(command) = cmd_rx.recv().await {
        chains.retain(|_, token| !token.is_cancelled());
        match command {
            EngineCommand::Submit { chain, request } => {
                client_info!("Submit chain={} url={}", chain, request.url);
                let token = CancellationToken::new();
                if let Some(previous) = chains.insert(chain, token.clone()) {
                    client_warn!("Chain {} submitted twice; cancelling the first", chain);
                    previous.cancel();
                }
                let client = client.clone();
                let sink = sink.clone();
                tokio::spawn(async move {
                    run_task_chain(
                        client.as_ref(),
                        chain,
                        request,
                        limits.poll_interval,
                        &token,
                        sink.as_ref(),
                    )
                    .await;
                    // Finished chains mark their token so the registry forgets them.
                    token.cancel();
                });
            }
            EngineCommand::Cancel { chain } => match chains.remove(&chain) {
                Some(token) => {
                    client_info!("Cancel chain={}", chain);
                    token.cancel();
                }
                None => client_debug!("Cancel for finished chain={}", chain),
            },
            EngineCommand::UploadCookies { path } => {
                client_info!("Upload cookies from {:?}", path);
                let client = client.clone();
                let sink = sink.clone();
                tokio::spawn(async move {
                    let result =
                        upload_cookie_file(client.as_ref(), &path, limits.max_cookie_file_bytes)
                            .await;
                    if let Err(err) = &result {
                        client_warn!("Cookie upload failed ({}): {}", err.kind, err.message);
                    }
                    sink.emit(EngineEvent::CookieUploadFinished { result });
                });
            }
        }
    }

    for token in chains.values() {
        token.cancel();
    }
    client_debug!("Engine dispatcher stopped");
}
