use thiserror::Error;

/// Failures while setting up the console's diagnostic logging.
#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("unknown log format {0:?}, use one of: text, json, journald")]
    InvalidFormat(String),
    #[error("journald logging needs a Linux build with the `journald` feature")]
    JournaldNotSupported,
    #[error("console logger is already installed")]
    AlreadyInitialized,
    #[error("cannot install console logger: {0}")]
    InitializationFailed(String),
    #[error("invalid log filter directive {0:?}")]
    InvalidLogLevel(String),
}
