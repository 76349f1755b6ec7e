use doorlock_core::constants::DEFAULT_REPLY_TIMEOUT_MS;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for a [`Link`](crate::Link).
///
/// # Example
///
/// ```
/// use doorlock_link::LinkConfig;
/// use std::time::Duration;
///
/// let config = LinkConfig::default();
/// assert_eq!(config.reply_timeout(), Some(Duration::from_millis(5000)));
///
/// let forever = LinkConfig::wait_forever();
/// assert_eq!(forever.reply_timeout(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// How long a request waits for its status reply (milliseconds).
    ///
    /// `None` waits indefinitely.
    pub reply_timeout_ms: Option<u64>,
}

impl LinkConfig {
    /// A link that blocks on replies for as long as it takes.
    pub fn wait_forever() -> Self {
        Self {
            reply_timeout_ms: None,
        }
    }

    pub fn reply_timeout(&self) -> Option<Duration> {
        self.reply_timeout_ms.map(Duration::from_millis)
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            reply_timeout_ms: Some(DEFAULT_REPLY_TIMEOUT_MS),
        }
    }
}
