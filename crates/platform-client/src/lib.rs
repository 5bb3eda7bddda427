//! Platform Client - talks to the workspace platform API
//!
//! This crate provides the HTTP transport, the catalog and RunSession
//! endpoint wrappers, and the poller that waits for a RunSession's request
//! list to stop growing.

mod catalog;
mod config;
mod error;
mod poller;
mod runsessions;
mod transport;

pub use catalog::IndexStatus;
pub use config::{PlatformConfig, PollSettings, ENV_API_KEY, ENV_API_URL, ENV_WORKSPACE};
pub use error::{ClientError, Result, TransportError};
pub use poller::{RunSessionSource, StabilizationPoller, STABLE_POLLS_REQUIRED};
pub use transport::{PlatformClient, CONNECT_TIMEOUT, GET_TIMEOUT};
