//! FM broadcast waveform (Mexico profile)
//!
//! A single-tone FM signal:
//!
//! ```text
//! s(t) = A · cos(2π·fc·t + β·sin(2π·fm·t))
//! ```
//!
//! Where:
//! - A = sqrt(P), the RMS-to-peak scaling is left out on purpose so the plot
//!   reads in "volts into 1 Ω"
//! - fc = carrier frequency
//! - β = Δf / fm, the modulation index
//! - fm = audio (modulating) frequency
//!
//! With the default 100 kHz grid the carrier is heavily undersampled; the plot
//! shows the aliased pattern, which is what the visualization expects.

use super::SignalGenerator;
use crate::channel::ChannelModel;
use crate::config::{ProfileConfig, SamplingConfig};
use crate::params::FmParams;
use crate::profile::Profile;
use std::f64::consts::PI;

/// Peak amplitude for a power in watts; non-positive power falls back to 1
pub fn amplitude_for_power(power: f64) -> f64 {
    if power > 0.0 {
        power.sqrt()
    } else {
        1.0
    }
}

/// FM generator for validated broadcast parameters
#[derive(Debug, Clone)]
pub struct FmGenerator {
    params: FmParams,
    config: ProfileConfig,
    amplitude: f64,
    beta: f64,
}

impl FmGenerator {
    /// Create a generator
    pub fn new(params: FmParams, config: ProfileConfig) -> Self {
        Self {
            params,
            config,
            amplitude: amplitude_for_power(params.power()),
            beta: params.modulation_index(),
        }
    }

    /// Generator with the default 10 ms broadcast window and channel
    pub fn broadcast(params: FmParams) -> Self {
        Self::new(params, ProfileConfig::fm_broadcast())
    }

    /// Parameters being rendered
    pub fn params(&self) -> &FmParams {
        &self.params
    }

    /// Carrier amplitude `A`
    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    /// Modulation index `β`
    pub fn modulation_index(&self) -> f64 {
        self.beta
    }

    /// Carson's rule bandwidth
    pub fn carson_bandwidth(&self) -> f64 {
        self.params.carson_bandwidth()
    }
}

impl SignalGenerator for FmGenerator {
    fn profile(&self) -> Profile {
        Profile::Mexico
    }

    fn sampling(&self) -> &SamplingConfig {
        &self.config.sampling
    }

    fn channel(&self) -> &ChannelModel {
        &self.config.channel
    }

    #[inline]
    fn transmitted_at(&self, t: f64) -> f64 {
        let fc = self.params.frequency();
        let fm = self.params.audio_frequency();
        self.amplitude * (2.0 * PI * fc * t + self.beta * (2.0 * PI * fm * t).sin()).cos()
    }
}
