use std::time::Duration;

use crate::consts::consts::REQRES_URL;

#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub endpoint: String,
    pub timeout: Duration,
}

// Implements: https://rust-unofficial.github.io/patterns/patterns/creational/builder.html
impl SyncOptions {
    /// Overrides the users endpoint, the sync command always uses `REQRES_URL`
    pub fn set_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Per request timeout, covers connecting and reading the body
    pub fn set_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            endpoint: REQRES_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}
