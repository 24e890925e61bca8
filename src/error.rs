use crate::config::ConfigError;
use crate::context::LifecycleError;
use thiserror::Error;

/// Top-level error type for the proxy-fnd library.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("lifecycle error: {0}")]
    Lifecycle(#[from] LifecycleError),
}
