//! Client configuration

use std::fmt;
use std::time::Duration;

use crate::error::{ClientError, Result};

pub const ENV_API_URL: &str = "RW_API_URL";
pub const ENV_WORKSPACE: &str = "RW_WORKSPACE";
pub const ENV_API_KEY: &str = "RW_API_KEY";

/// Where and as whom to talk to the platform API
#[derive(Clone)]
pub struct PlatformConfig {
    /// API base URL, without trailing slash
    pub base_url: String,
    /// Workspace all calls are scoped to
    pub workspace: String,
    token: String,
}

impl fmt::Debug for PlatformConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlatformConfig")
            .field("base_url", &self.base_url)
            .field("workspace", &self.workspace)
            .field("token", &"<redacted>")
            .finish()
    }
}

fn required(name: &str, value: Option<String>) -> Result<String> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ClientError::configuration(format!("{} is not set", name))),
    }
}

impl PlatformConfig {
    pub fn new(
        base_url: impl Into<String>,
        workspace: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<Self> {
        let base_url = required("API base URL", Some(base_url.into()))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            workspace: required("workspace", Some(workspace.into()))?,
            token: required("API token", Some(token.into()))?,
        })
    }

    /// Build from `RW_API_URL`, `RW_WORKSPACE` and `RW_API_KEY`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = required(ENV_API_URL, lookup(ENV_API_URL))?;
        let workspace = required(ENV_WORKSPACE, lookup(ENV_WORKSPACE))?;
        let token = required(ENV_API_KEY, lookup(ENV_API_KEY))?;
        Self::new(base_url, workspace, token)
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

/// Timing of the stabilization poller
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollSettings {
    /// Delay between two fetches
    pub poll_interval: Duration,
    /// Give up once this much time has passed
    pub max_wait: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            max_wait: Duration::from_secs(300),
        }
    }
}

impl PollSettings {
    /// Build from seconds, rejecting non-finite or non-positive values
    pub fn from_secs_f64(poll_interval: f64, max_wait: f64) -> Result<Self> {
        let to_duration = |name: &str, secs: f64| {
            Duration::try_from_secs_f64(secs).map_err(|_| {
                ClientError::invalid_argument(format!(
                    "{} must be a finite, positive number of seconds, got {}",
                    name, secs
                ))
            })
        };
        let settings = Self {
            poll_interval: to_duration("poll_interval", poll_interval)?,
            max_wait: to_duration("max_wait", max_wait)?,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Set the poll interval
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Set the deadline
    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = max_wait;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.poll_interval.is_zero() {
            return Err(ClientError::invalid_argument("poll_interval must be positive"));
        }
        if self.max_wait.is_zero() {
            return Err(ClientError::invalid_argument("max_wait must be positive"));
        }
        Ok(())
    }
}
