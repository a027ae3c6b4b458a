//! CPU configuration.
//!
//! Every field has a default, so an empty JSON object is a valid config:
//!
//! ```
//! use motorola_6809::{Config, Platform};
//!
//! let cfg = Config::from_json(r#"{ "platform": "sbc09", "vectors": { "reset": 65534 } }"#)?;
//! assert_eq!(cfg.platform, Platform::Sbc09);
//! assert_eq!(cfg.vectors.irq, 0xFFF8);
//! # Ok::<(), motorola_6809::ConfigError>(())
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Target board. Selects the condition codes set by reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Reset sets E and leaves the other flags alone.
    #[default]
    Generic,
    /// Reset clears CC entirely; the monitor ROM masks interrupts itself.
    Sbc09,
}

/// Addresses of the seven interrupt vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vectors {
    pub reset: u16,
    pub nmi: u16,
    pub swi: u16,
    pub irq: u16,
    pub firq: u16,
    pub swi2: u16,
    pub swi3: u16,
}

impl Default for Vectors {
    fn default() -> Self {
        Self {
            reset: 0xFFFE,
            nmi: 0xFFFC,
            swi: 0xFFFA,
            irq: 0xFFF8,
            firq: 0xFFF6,
            swi2: 0xFFF4,
            swi3: 0xFFF2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub platform: Platform,
    pub vectors: Vectors,
    /// Instructions per inner burst, between sync callback polls.
    pub inner_burst_op_count: u64,
    /// Initial number of inner bursts per `run()`; retuned after each call.
    pub startup_burst_count: u64,
    pub min_burst_count: u64,
    pub max_burst_count: u64,
    /// Upper bound on a single pacing sleep.
    pub max_delay_secs: f64,
    /// Wall-clock time `run()` aims to take.
    pub max_run_time_secs: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            platform: Platform::Generic,
            vectors: Vectors::default(),
            inner_burst_op_count: 100,
            startup_burst_count: 100,
            min_burst_count: 10,
            max_burst_count: 10_000,
            max_delay_secs: 0.01,
            max_run_time_secs: 0.1,
        }
    }
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    #[must_use]
    pub fn sbc09() -> Self {
        Self {
            platform: Platform::Sbc09,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn max_delay(&self) -> Duration {
        secs(self.max_delay_secs)
    }

    #[must_use]
    pub fn max_run_time(&self) -> Duration {
        secs(self.max_run_time_secs)
    }
}

/// Negative or non-finite durations count as zero.
fn secs(value: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or(Duration::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_default() {
        let cfg = Config::from_json("{}").unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.vectors.reset, 0xFFFE);
        assert_eq!(cfg.max_delay(), Duration::from_millis(10));
    }

    #[test]
    fn bad_json_is_an_error() {
        assert!(Config::from_json(r#"{ "platform": "dragon64" }"#).is_err());
        assert!(Config::from_json("[").is_err());
    }

    #[test]
    fn negative_durations_clamp_to_zero() {
        let cfg = Config {
            max_delay_secs: -1.0,
            ..Config::default()
        };
        assert_eq!(cfg.max_delay(), Duration::ZERO);
    }

    #[test]
    fn serializes_back_to_json() {
        let json = serde_json::to_string(&Config::sbc09()).unwrap();
        assert!(json.contains(r#""platform":"sbc09""#));
        assert_eq!(Config::from_json(&json).unwrap(), Config::sbc09());
    }
}
