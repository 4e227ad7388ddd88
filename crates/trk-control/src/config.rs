//! Worker configuration document.
//!
//! # TOML format
//!
//! ```toml
//! tick_interval_secs = 0.2
//! exercise_start     = "08:30:00"
//!
//! [reference]
//! lat         = -23.5
//! lng         = -46.6
//! declination = -21.0
//!
//! # Optional; without it the worker runs with no network bridges.
//! [network.config]
//! interface = "0.0.0.0"
//! address   = "235.12.2.4"
//! port      = 1970
//!
//! [network.track]
//! address = "235.12.2.4"
//! port    = 1971
//!
//! [network.pilot_command]
//! address = "235.12.2.4"
//! port    = 1972
//!
//! [queues]
//! track_capacity = 1024
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use trk_core::{ReferenceFrame, TimeOfDay};
use trk_net::ChannelAddress;
use trk_net::queue::DEFAULT_TRACK_CAPACITY;

use crate::{ControlError, ControlResult};

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ControlConfig {
    /// Wall-clock seconds per tick.  Must be positive.
    pub tick_interval_secs: f64,
    /// Simulated time of day at tick 0, `HH:MM[:SS]`.
    #[serde(default = "midnight")]
    pub exercise_start:     String,
    pub reference:          ReferenceConfig,
    #[serde(default)]
    pub network:            Option<NetworkConfig>,
    #[serde(default)]
    pub queues:             QueueConfig,
}

#[derive(Copy, Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReferenceConfig {
    pub lat:         f64,
    pub lng:         f64,
    #[serde(default)]
    pub declination: f64,
}

#[derive(Copy, Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NetworkConfig {
    pub config:        ChannelAddress,
    pub track:         ChannelAddress,
    pub pilot_command: ChannelAddress,
}

#[derive(Copy, Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QueueConfig {
    #[serde(default = "default_track_capacity")]
    pub track_capacity: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self { track_capacity: DEFAULT_TRACK_CAPACITY }
    }
}

fn midnight() -> String {
    "00:00:00".to_owned()
}

fn default_track_capacity() -> usize {
    DEFAULT_TRACK_CAPACITY
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            tick_interval_secs: 0.2,
            exercise_start:     midnight(),
            reference:          ReferenceConfig { lat: 0.0, lng: 0.0, declination: 0.0 },
            network:            None,
            queues:             QueueConfig::default(),
        }
    }
}

impl ControlConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> ControlResult<Self> {
        let config: ControlConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: &Path) -> ControlResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> ControlResult<()> {
        if !(self.tick_interval_secs.is_finite() && self.tick_interval_secs > 0.0) {
            return Err(ControlError::Config(format!(
                "tick_interval_secs must be positive, got {}",
                self.tick_interval_secs
            )));
        }
        let interval = Duration::try_from_secs_f64(self.tick_interval_secs).map_err(|e| {
            ControlError::Config(format!(
                "tick_interval_secs {} is not a usable interval: {e}",
                self.tick_interval_secs
            ))
        })?;
        if interval.is_zero() {
            return Err(ControlError::Config(format!(
                "tick_interval_secs {} rounds to zero",
                self.tick_interval_secs
            )));
        }
        if self.queues.track_capacity == 0 {
            return Err(ControlError::Config("queues.track_capacity must be positive".into()));
        }
        self.start_time()?;
        self.reference_frame()?;
        Ok(())
    }

    /// Interval as a `Duration`.  Saturates for values `validate` rejects.
    pub fn tick_interval(&self) -> Duration {
        Duration::try_from_secs_f64(self.tick_interval_secs).unwrap_or(Duration::MAX)
    }

    pub fn start_time(&self) -> ControlResult<TimeOfDay> {
        Ok(TimeOfDay::parse(&self.exercise_start)?)
    }

    pub fn reference_frame(&self) -> ControlResult<ReferenceFrame> {
        let r = self.reference;
        Ok(ReferenceFrame::new(r.lat, r.lng, r.declination)?)
    }
}
