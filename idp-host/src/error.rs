use crate::bootstrap::BootstrapError;
use idp_store::StoreError;
use thiserror::Error;

/// Top-level host failures. Any of these aborts startup; the process
/// exits non-zero and the deployment never serves traffic against an
/// unbootstrapped store.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("Configuration error: {0}")]
    Config(anyhow::Error),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Bootstrap failed: {0}")]
    Bootstrap(#[from] BootstrapError),
}
