//! Generator configuration: sampling grid and channel model per profile.
//!
//! Defaults reproduce the reference plots:
//!
//! | Profile | Sample rate | Window | Samples | α | f_fade |
//! |---------|-------------|--------|---------|---|--------|
//! | FM (mx) | 100 kHz | 10 ms | 1000 | 80 /s | 20 Hz |
//! | OFDM (sg) | 20 GHz | 4 µs | 80000 | 3e6 /s | 2 MHz |
//!
//! Overrides can be loaded from JSON; omitted sections keep their defaults:
//!
//! ```json
//! { "ofdm": { "sampling": { "sample_rate": 20e9, "window": 1e-6 } } }
//! ```

use crate::channel::ChannelModel;
use crate::error::{ConfigError, Result};
use crate::profile::Profile;
use serde::{Deserialize, Serialize};

/// FM visualization sample rate, Hz
pub const FM_SAMPLE_RATE: f64 = 1e5;
/// FM visualization window, s
pub const FM_WINDOW: f64 = 0.01;
/// OFDM visualization sample rate, Hz
pub const OFDM_SAMPLE_RATE: f64 = 20e9;
/// OFDM visualization window when the received trace is shown, s
pub const OFDM_WINDOW: f64 = 4e-6;
/// OFDM visualization window for a transmit-only plot, s
pub const OFDM_SINGLE_TRACE_WINDOW: f64 = 1e-6;
/// Largest grid a single generation will allocate, per trace
pub const MAX_SAMPLES: usize = 10_000_000;

/// Fixed sampling grid `t_i = i / sample_rate` for `i < floor(rate·window)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Sample rate in Hz
    pub sample_rate: f64,
    /// Observation window in seconds
    pub window: f64,
}

impl SamplingConfig {
    /// Create a sampling grid
    pub fn new(sample_rate: f64, window: f64) -> Self {
        Self {
            sample_rate,
            window,
        }
    }

    /// 100 kHz over 10 ms
    pub fn fm_broadcast() -> Self {
        Self::new(FM_SAMPLE_RATE, FM_WINDOW)
    }

    /// 20 GHz over 4 µs
    pub fn nr_sub6() -> Self {
        Self::new(OFDM_SAMPLE_RATE, OFDM_WINDOW)
    }

    /// 20 GHz over 1 µs
    pub fn nr_sub6_single_trace() -> Self {
        Self::new(OFDM_SAMPLE_RATE, OFDM_SINGLE_TRACE_WINDOW)
    }

    /// Builder: set window
    pub fn with_window(mut self, window: f64) -> Self {
        self.window = window;
        self
    }

    /// Builder: set sample rate
    pub fn with_sample_rate(mut self, sample_rate: f64) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Number of samples in the window, capped at [`MAX_SAMPLES`]
    pub fn sample_count(&self) -> usize {
        let n = (self.sample_rate * self.window).floor();
        if n >= MAX_SAMPLES as f64 {
            MAX_SAMPLES
        } else {
            n as usize
        }
    }

    /// Time of sample `i`
    #[inline]
    pub fn time_at(&self, i: usize) -> f64 {
        i as f64 / self.sample_rate
    }

    fn check(&self, section: &str) -> Result<()> {
        if !(self.sample_rate.is_finite() && self.sample_rate > 0.0) {
            return Err(ConfigError::InvalidValue {
                field: format!("{section}.sampling.sample_rate"),
                reason: format!("must be a positive number, got {}", self.sample_rate),
            });
        }
        if !(self.window.is_finite() && self.window >= 0.0) {
            return Err(ConfigError::InvalidValue {
                field: format!("{section}.sampling.window"),
                reason: format!("must be a non-negative number, got {}", self.window),
            });
        }
        let requested = (self.sample_rate * self.window).floor();
        if requested > MAX_SAMPLES as f64 {
            return Err(ConfigError::InvalidValue {
                field: format!("{section}.sampling.window"),
                reason: format!(
                    "{} s at {} Hz needs {:e} samples, limit is {}",
                    self.window, self.sample_rate, requested, MAX_SAMPLES
                ),
            });
        }
        Ok(())
    }
}

/// Sampling grid and channel for one profile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfileConfig {
    /// Sampling grid
    pub sampling: SamplingConfig,
    /// Channel applied to produce the received trace
    pub channel: ChannelModel,
}

impl ProfileConfig {
    /// FM broadcast defaults
    pub fn fm_broadcast() -> Self {
        Self {
            sampling: SamplingConfig::fm_broadcast(),
            channel: ChannelModel::fm_broadcast(),
        }
    }

    /// 5G sub-6 GHz defaults
    pub fn nr_sub6() -> Self {
        Self {
            sampling: SamplingConfig::nr_sub6(),
            channel: ChannelModel::nr_sub6(),
        }
    }

    fn check(&self, section: &str) -> Result<()> {
        self.sampling.check(section)?;
        let ch = &self.channel;
        for (name, value) in [
            ("attenuation", ch.attenuation),
            ("fading_frequency", ch.fading_frequency),
            ("fading_floor", ch.fading_floor),
            ("fading_depth", ch.fading_depth),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::InvalidValue {
                    field: format!("{section}.channel.{name}"),
                    reason: format!("must be finite, got {value}"),
                });
            }
        }
        Ok(())
    }
}

/// Configuration for both generators
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// FM (Mexico) generator settings
    #[serde(default = "ProfileConfig::fm_broadcast")]
    pub fm: ProfileConfig,
    /// OFDM (Singapore) generator settings
    #[serde(default = "ProfileConfig::nr_sub6")]
    pub ofdm: ProfileConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            fm: ProfileConfig::fm_broadcast(),
            ofdm: ProfileConfig::nr_sub6(),
        }
    }
}

impl GeneratorConfig {
    /// Parse and check a JSON configuration
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that every section describes a usable grid and channel
    pub fn validate(&self) -> Result<()> {
        self.fm.check("fm")?;
        self.ofdm.check("ofdm")?;
        Ok(())
    }

    /// Settings used for `profile`
    pub fn for_profile(&self, profile: Profile) -> &ProfileConfig {
        match profile {
            Profile::Mexico => &self.fm,
            Profile::Singapore => &self.ofdm,
        }
    }

    /// Mutable settings used for `profile`
    pub fn for_profile_mut(&mut self, profile: Profile) -> &mut ProfileConfig {
        match profile {
            Profile::Mexico => &mut self.fm,
            Profile::Singapore => &mut self.ofdm,
        }
    }
}
