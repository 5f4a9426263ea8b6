use std::time::Duration;

use tokio_util::sync::CancellationToken;

use client_logging::{client_debug, client_info, client_trace, client_warn};

use crate::{ChainId, CreateTaskRequest, EngineEvent, TaskClient};

/// Receives engine results; implementations must not block.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

/// Creates a task, then polls it until it is terminal, a poll fails, or
/// `token` is cancelled.
///
/// A poll is only issued after the previous one resolved and the interval
/// elapsed, so at most one request per task is in flight. Results that
/// resolve after cancellation are dropped without being emitted.
pub async fn run_task_chain(
    client: &dyn TaskClient,
    chain: ChainId,
    request: CreateTaskRequest,
    poll_interval: Duration,
    token: &CancellationToken,
    sink: &dyn EventSink,
) {
    let created = tokio::select! {
        biased;
        _ = token.cancelled() => None,
        result = client.create_task(&request) => Some(result),
    };
    let created = match created {
        Some(result) if !token.is_cancelled() => result,
        _ => {
            client_info!("Chain {} cancelled before the task was created", chain);
            return;
        }
    };
    let task_id = match created {
        Ok(task_id) => task_id,
        Err(error) => {
            client_warn!("Chain {} could not create task: {}", chain, error.kind);
            sink.emit(EngineEvent::TaskCreationFailed { chain, error });
            return;
        }
    };

    client_info!("Chain {} tracking task {}", chain, task_id);
    sink.emit(EngineEvent::TaskCreated {
        chain,
        task_id: task_id.clone(),
    });

    loop {
        let polled = tokio::select! {
            biased;
            _ = token.cancelled() => None,
            result = client.poll_once(&task_id) => Some(result),
        };
        let polled = match polled {
            Some(result) if !token.is_cancelled() => result,
            _ => {
                client_info!("Chain {} cancelled; dropping poll for {}", chain, task_id);
                return;
            }
        };
        let report = match polled {
            Ok(report) => report,
            Err(error) => {
                client_warn!("Chain {} poll failed for {}: {}", chain, task_id, error.kind);
                sink.emit(EngineEvent::PollFailed { chain, error });
                return;
            }
        };

        let terminal = report.status.is_terminal();
        client_debug!("Chain {} task {} is {:?}", chain, task_id, report.status);
        sink.emit(EngineEvent::StatusReported { chain, report });
        if terminal {
            client_info!("Chain {} finished", chain);
            return;
        }

        client_trace!("Chain {} next poll in {:?}", chain, poll_interval);
        tokio::select! {
            biased;
            _ = token.cancelled() => {
                client_info!("Chain {} cancelled while waiting", chain);
                return;
            }
            _ = tokio::time::sleep(poll_interval) => {}
        }
    }
}
