//! Navigator configuration.
//!
//! Defaults reproduce the toolkit helpers' behaviour: swipes start and stop
//! 5px inside the visible band and drag at rate 5. The settle timeout and the
//! swipe limit only matter for a viewport that never settles or never
//! reaches a boundary.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::result::{NavError, NavResult};
use crate::wait::{WaitOptions, DEFAULT_POLL_INTERVAL_MS, DEFAULT_WAIT_TIMEOUT_MS};

/// Distance kept from the band edges when swiping (pixels)
pub const DEFAULT_SWIPE_INSET: i32 = 5;

/// Slow drag rate; faster drags overshoot in virtualized lists
pub const DEFAULT_DRAG_RATE: u32 = 5;

/// Upper bound on swipes in one operation
pub const DEFAULT_MAX_SWIPES: u32 = 500;

/// Configuration for [`Flickable`](crate::Flickable) and
/// [`ListView`](crate::ListView)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigatorConfig {
    /// Pixels between the band edges and the drag endpoints
    pub swipe_inset: i32,
    /// Drag rate passed to the pointing device
    pub drag_rate: u32,
    /// Timeout for each settle wait in milliseconds. A swipe waits for
    /// dragging and then for moving to stop, each with this bound.
    pub settle_timeout_ms: u64,
    /// Polling interval for settle waits in milliseconds
    pub poll_interval_ms: u64,
    /// Maximum swipes issued by a single operation
    pub max_swipes: u32,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            swipe_inset: DEFAULT_SWIPE_INSET,
            drag_rate: DEFAULT_DRAG_RATE,
            settle_timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            max_swipes: DEFAULT_MAX_SWIPES,
        }
    }
}

impl NavigatorConfig {
    /// Create new config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the swipe inset
    #[must_use]
    pub const fn with_swipe_inset(mut self, inset: i32) -> Self {
        self.swipe_inset = inset;
        self
    }

    /// Set the drag rate
    #[must_use]
    pub const fn with_drag_rate(mut self, rate: u32) -> Self {
        self.drag_rate = rate;
        self
    }

    /// Set the settle timeout
    #[must_use]
    pub const fn with_settle_timeout(mut self, timeout_ms: u64) -> Self {
        self.settle_timeout_ms = timeout_ms;
        self
    }

    /// Set the polling interval
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Set the swipe limit
    #[must_use]
    pub const fn with_max_swipes(mut self, max_swipes: u32) -> Self {
        self.max_swipes = max_swipes;
        self
    }

    /// Wait options for settle waits
    #[must_use]
    pub const fn settle_wait(&self) -> WaitOptions {
        WaitOptions {
            timeout_ms: self.settle_timeout_ms,
            poll_interval_ms: self.poll_interval_ms,
        }
    }

    /// Reject values that would make navigation misbehave
    pub fn validate(&self) -> NavResult<()> {
        if self.swipe_inset < 0 {
            return Err(invalid("swipe_inset must not be negative"));
        }
        if self.drag_rate == 0 {
            return Err(invalid("drag_rate must be positive"));
        }
        if self.poll_interval_ms == 0 {
            return Err(invalid("poll_interval_ms must be positive"));
        }
        if self.max_swipes == 0 {
            return Err(invalid("max_swipes must be positive"));
        }
        Ok(())
    }

    /// Parse and validate a YAML document; missing keys take defaults
    pub fn from_yaml_str(yaml: &str) -> NavResult<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> NavResult<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> NavResult<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }
}

fn invalid(message: &str) -> NavError {
    NavError::InvalidConfig {
        message: message.to_string(),
    }
}
