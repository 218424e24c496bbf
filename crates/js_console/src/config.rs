//! Console configuration.

/// Console configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// Whether plain console output is echoed to the process log.
    pub echo_to_log: bool,
    /// Maximum number of messages delivered per catch-up response.
    pub batch_limit: Option<usize>,
}

impl ConsoleConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether console output is echoed to the process log.
    pub fn with_echo_to_log(mut self, enabled: bool) -> Self {
        self.echo_to_log = enabled;
        self
    }

    /// Cap catch-up responses at `limit` messages. Zero is treated as no cap.
    pub fn with_batch_limit(mut self, limit: usize) -> Self {
        self.batch_limit = (limit > 0).then_some(limit);
        self
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            echo_to_log: true,
            batch_limit: None,
        }
    }
}
