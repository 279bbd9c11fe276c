//! Tunables for the show.
//!
//! Every field has a default matching the stock show, so an empty TOML
//! file (or no file at all) gives the standard behaviour.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{FireworksError, Result};

// ════════════════════════════════════════════════════════════════════════════
// FireworksConfig
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FireworksConfig {
    /// New batches are refused while the live count is above this.
    pub pool_cap:          usize,
    /// Minimum gap between two triggers on the same lane.
    pub debounce_ms:       u64,
    /// Mean wrist→fingertip distance below which a hand is a fist.
    pub fist_threshold:    f32,
    /// Minimum gap between two finale pattern volleys.
    pub finale_cadence_ms: u64,
    /// Each finale pattern owns this slice of wall-clock time.
    pub finale_pattern_ms: u64,
    /// Per-tick velocity damping applied to every particle.
    pub friction:          f32,
    /// Background fade per frame (0 = hard clear, 1 = never fade).
    pub trail_fade:        f32,
}

impl Default for FireworksConfig {
    fn default() -> Self {
        FireworksConfig {
            pool_cap:          2000,
            debounce_ms:       250,
            fist_threshold:    0.25,
            finale_cadence_ms: 15,
            finale_pattern_ms: 400,
            friction:          0.96,
            trail_fade:        0.78,
        }
    }
}

impl FireworksConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let cfg: FireworksConfig = toml::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.pool_cap == 0 {
            return Err(invalid("pool_cap", "must be at least 1"));
        }
        if !(self.fist_threshold > 0.0 && self.fist_threshold < 1.0) {
            return Err(invalid("fist_threshold", "must lie in (0, 1)"));
        }
        if self.finale_pattern_ms == 0 {
            return Err(invalid("finale_pattern_ms", "must be at least 1"));
        }
        if !(self.friction > 0.0 && self.friction <= 1.0) {
            return Err(invalid("friction", "must lie in (0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.trail_fade) {
            return Err(invalid("trail_fade", "must lie in [0, 1]"));
        }
        Ok(())
    }

    pub fn debounce(&self)        -> Duration { Duration::from_millis(self.debounce_ms) }
    pub fn finale_cadence(&self)  -> Duration { Duration::from_millis(self.finale_cadence_ms) }
    pub fn finale_pattern(&self)  -> Duration { Duration::from_millis(self.finale_pattern_ms) }
}

fn invalid(field: &'static str, reason: &str) -> FireworksError {
    FireworksError::ConfigInvalid { field, reason: reason.to_string() }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
