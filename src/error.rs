use std::fmt;

use crate::storage::StoreError;

/// Errors raised by the lifecycle core.
///
/// "Not found" is not an error: operations addressing an unknown id
/// return `false` or an empty result so callers can treat "nothing
/// happened" uniformly.
#[derive(Debug)]
pub enum LifecycleError {
    /// Malformed creation input, raised synchronously.
    Validation(String),
    /// Load or save against the record store failed.
    Store(StoreError),
}

impl fmt::Display for LifecycleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleError::Validation(msg) => write!(f, "Validation error: {}", msg),
            LifecycleError::Store(err) => write!(f, "Store error: {}", err),
        }
    }
}

impl From<StoreError> for LifecycleError {
    fn from(error: StoreError) -> Self {
        LifecycleError::Store(error)
    }
}

impl std::error::Error for LifecycleError {}

#[derive(Debug)]
pub enum ConfigError {
    Io(String),
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "Config I/O error: {}", msg),
            ConfigError::Parse(msg) => write!(f, "Config parse error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Top-level error union for the binary.
#[derive(Debug)]
pub enum RxError {
    Lifecycle(LifecycleError),
    Store(StoreError),
    Config(ConfigError),
}

impl fmt::Display for RxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RxError::Lifecycle(err) => write!(f, "{}", err),
            RxError::Store(err) => write!(f, "{}", err),
            RxError::Config(err) => write!(f, "{}", err),
        }
    }
}

impl From<LifecycleError> for RxError {
    fn from(error: LifecycleError) -> Self {
        RxError::Lifecycle(error)
    }
}

impl From<StoreError> for RxError {
    fn from(error: StoreError) -> Self {
        RxError::Store(error)
    }
}

impl From<ConfigError> for RxError {
    fn from(error: ConfigError) -> Self {
        RxError::Config(error)
    }
}

impl std::error::Error for RxError {}
