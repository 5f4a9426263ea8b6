use std::path::PathBuf;

use crate::ChainId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Create the remote task, then keep polling it until it is terminal.
    CreateTask {
        chain: ChainId,
        url: String,
        cookies: Option<String>,
    },
    /// Stop a polling chain; anything it still produces is stale.
    CancelChain { chain: ChainId },
    /// Send a cookies file to the service. Not tied to any chain.
    UploadCookieFile { path: PathBuf },
}
