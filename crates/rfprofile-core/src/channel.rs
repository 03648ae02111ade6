//! Synthetic propagation channel.
//!
//! The received trace is the transmitted one scaled by a time-varying gain:
//!
//! ```text
//! g(t) = exp(-α·t) · (floor + depth·cos(2π·f_fade·t))
//! ```
//!
//! The exponential term models path loss growing over the observation window
//! and the cosine term a slow multipath fade. The coefficients are illustrative
//! and picked per profile so both effects are visible inside the plotted
//! window; they are not derived from a physical link budget.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Attenuation coefficient for the FM broadcast window, 1/s
pub const FM_ATTENUATION: f64 = 80.0;
/// Fading rate for the FM broadcast window, Hz
pub const FM_FADING_FREQUENCY: f64 = 20.0;
/// Attenuation coefficient for the 5G window, 1/s
pub const OFDM_ATTENUATION: f64 = 3e6;
/// Fading rate for the 5G window, Hz
pub const OFDM_FADING_FREQUENCY: f64 = 2e6;
/// Minimum of the fading envelope
pub const DEFAULT_FADING_FLOOR: f64 = 0.7;
/// Swing of the fading envelope around its floor
pub const DEFAULT_FADING_DEPTH: f64 = 0.3;

/// Exponential attenuation with multiplicative fading
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelModel {
    /// Attenuation coefficient α in 1/s
    pub attenuation: f64,
    /// Fading frequency in Hz
    pub fading_frequency: f64,
    /// Constant part of the fading envelope
    #[serde(default = "default_fading_floor")]
    pub fading_floor: f64,
    /// Cosine part of the fading envelope
    #[serde(default = "default_fading_depth")]
    pub fading_depth: f64,
}

fn default_fading_floor() -> f64 {
    DEFAULT_FADING_FLOOR
}

fn default_fading_depth() -> f64 {
    DEFAULT_FADING_DEPTH
}

impl ChannelModel {
    /// Create a channel with the default fading envelope
    pub fn new(attenuation: f64, fading_frequency: f64) -> Self {
        Self {
            attenuation,
            fading_frequency,
            fading_floor: DEFAULT_FADING_FLOOR,
            fading_depth: DEFAULT_FADING_DEPTH,
        }
    }

    /// Channel tuned for a 10 ms FM broadcast window
    pub fn fm_broadcast() -> Self {
        Self::new(FM_ATTENUATION, FM_FADING_FREQUENCY)
    }

    /// Channel tuned for a few microseconds of 5G sub-6 GHz signal
    pub fn nr_sub6() -> Self {
        Self::new(OFDM_ATTENUATION, OFDM_FADING_FREQUENCY)
    }

    /// A channel that passes the signal unchanged
    pub fn ideal() -> Self {
        Self {
            attenuation: 0.0,
            fading_frequency: 0.0,
            fading_floor: 1.0,
            fading_depth: 0.0,
        }
    }

    /// Builder: set attenuation coefficient
    pub fn with_attenuation(mut self, alpha: f64) -> Self {
        self.attenuation = alpha;
        self
    }

    /// Builder: set fading frequency
    pub fn with_fading_frequency(mut self, hz: f64) -> Self {
        self.fading_frequency = hz;
        self
    }

    /// Builder: set fading envelope floor and depth
    pub fn with_fading_envelope(mut self, floor: f64, depth: f64) -> Self {
        self.fading_floor = floor;
        self.fading_depth = depth;
        self
    }

    /// Path loss term `exp(-α·t)`
    #[inline]
    pub fn attenuation_at(&self, t: f64) -> f64 {
        (-self.attenuation * t).exp()
    }

    /// Fading term `floor + depth·cos(2π·f_fade·t)`
    #[inline]
    pub fn fading_at(&self, t: f64) -> f64 {
        self.fading_floor + self.fading_depth * (2.0 * PI * self.fading_frequency * t).cos()
    }

    /// Total channel gain at time `t`
    #[inline]
    pub fn gain_at(&self, t: f64) -> f64 {
        self.attenuation_at(t) * self.fading_at(t)
    }

    /// Received amplitude for a transmitted amplitude at time `t`
    #[inline]
    pub fn apply(&self, t: f64, transmitted: f64) -> f64 {
        transmitted * self.gain_at(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_gain_at_origin() {
        // exp(0) = 1 and the envelope peaks at floor + depth = 1
        assert_eq!(ChannelModel::fm_broadcast().gain_at(0.0), 1.0);
        assert_eq!(ChannelModel::nr_sub6().gain_at(0.0), 1.0);
    }

    #[test]
    fn test_fm_gain_values() {
        let ch = ChannelModel::fm_broadcast();
        // Half a fading period (25 ms) puts the envelope at its floor - depth
        let t = 0.025;
        let expected = (-80.0f64 * t).exp() * 0.4;
        assert!((ch.gain_at(t) - expected).abs() < 1e-12);
        assert!((ch.attenuation_at(0.01) - (-0.8f64).exp()).abs() < 1e-15);
    }

    #[test]
    fn test_gain_decays() {
        let ch = ChannelModel::nr_sub6();
        let early = ch.attenuation_at(1e-7);
        let late = ch.attenuation_at(4e-6);
        assert!(late < early);
        assert!(late > 0.0);
    }

    #[test]
    fn test_ideal_channel() {
        let ch = ChannelModel::ideal();
        for t in [0.0, 1e-6, 0.5, 3.0] {
            assert_eq!(ch.apply(t, 0.75), 0.75);
        }
    }

    #[test]
    fn test_builders() {
        let ch = ChannelModel::ideal()
            .with_attenuation(80.0)
            .with_fading_frequency(20.0)
            .with_fading_envelope(DEFAULT_FADING_FLOOR, DEFAULT_FADING_DEPTH);
        assert_eq!(ch, ChannelModel::fm_broadcast());

        // A flat envelope leaves only the path loss
        let flat = ChannelModel::nr_sub6().with_fading_envelope(1.0, 0.0);
        assert_eq!(flat.fading_at(1e-7), 1.0);
        assert_eq!(flat.gain_at(2e-6), flat.attenuation_at(2e-6));
    }

    #[test]
    fn test_deserialize_defaults_envelope() {
        let ch: ChannelModel =
            serde_json::from_str(r#"{"attenuation": 10.0, "fading_frequency": 5.0}"#).unwrap();
        assert_eq!(ch.fading_floor, DEFAULT_FADING_FLOOR);
        assert_eq!(ch.fading_depth, DEFAULT_FADING_DEPTH);
    }
}
