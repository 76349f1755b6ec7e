use anyhow::{Context, Result};
use doorlock_actuator::ActuatorConfig;
use doorlock_hmi::HmiConfig;
use doorlock_link::LinkConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::warn;

/// Default tick period of both nodes' timers.
pub const DEFAULT_TICK_PERIOD_MS: u64 = 1000;

/// Settings for both nodes of the simulated device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    pub link: LinkConfig,
    pub actuator: ActuatorConfig,
    pub hmi: HmiConfig,

    /// Length of one timer tick (milliseconds)
    pub tick_period_ms: u64,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            link: LinkConfig::default(),
            actuator: ActuatorConfig::default(),
            hmi: HmiConfig::default(),
            tick_period_ms: DEFAULT_TICK_PERIOD_MS,
        }
    }
}

impl DeviceConfig {
    /// Read a JSON config file. Missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }

    /// # Errors
    ///
    /// Returns an error for a zero tick period or an invalid node config.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(self.tick_period_ms > 0, "tick_period_ms must be positive");
        self.actuator.validate()?;
        self.hmi.validate()?;

        if self.actuator.door != self.hmi.door || self.actuator.alarm_secs != self.hmi.alarm_secs {
            warn!("UI and actuator timings differ; screens will drift from the door");
        }
        Ok(())
    }
}
