//! Runtime side of the console: periodic polling, the per-task status
//! poller and the [`Console`] shell that owns every panel's data.

mod config;
pub use config::{
    ConsoleConfig, DEFAULT_BASE_URL, DEFAULT_OVERVIEW_INTERVAL_MS, DEFAULT_REQUEST_TIMEOUT_MS,
    DEFAULT_STATUS_INTERVAL_MS,
};

mod error;
pub use error::{ConfigError, CoreError};

mod poll;
pub use poll::PollHandle;

mod poller;
pub use poller::{PollerState, StatusPoller};

mod console;
pub use console::{Console, DEBUG_PLACEHOLDER, LoadingStates, Tab};

#[cfg(test)]
mod testing;
