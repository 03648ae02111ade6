//! OFDM waveform (Singapore 5G sub-6 GHz profile)
//!
//! The transmitted signal is the sum of `N` equally spaced tones, each carrying
//! a fixed QPSK-like phase that rotates by a quarter turn per subcarrier:
//!
//! ```text
//! s(t) = Σ_{k=0}^{N-1} A · cos(2π·(fc + k·Δf)·t + φ_k)
//!
//! φ_k = (k mod 4) · π/2
//! A   = sqrt(P / N)
//! ```
//!
//! No IFFT is involved; every sample sums the tones directly, so generation
//! costs `O(samples · N)`. With 80 000 samples and up to 4096 subcarriers this
//! is the one expensive path in the crate.

use super::SignalGenerator;
use crate::channel::ChannelModel;
use crate::config::{ProfileConfig, SamplingConfig};
use crate::params::OfdmParams;
use crate::profile::Profile;
use std::f64::consts::PI;

/// Phase offset of subcarrier `k`
#[inline]
pub fn subcarrier_phase(k: usize) -> f64 {
    (k % 4) as f64 * (PI / 2.0)
}

#[derive(Debug, Clone, Copy)]
struct Subcarrier {
    frequency: f64,
    phase: f64,
}

/// OFDM generator for validated 5G parameters
#[derive(Debug, Clone)]
pub struct OfdmGenerator {
    params: OfdmParams,
    config: ProfileConfig,
    amplitude: f64,
    subcarriers: Vec<Subcarrier>,
}

impl OfdmGenerator {
    /// Create a generator
    pub fn new(params: OfdmParams, config: ProfileConfig) -> Self {
        let n = params.subcarrier_count() as usize;
        let subcarriers = (0..n)
            .map(|k| Subcarrier {
                frequency: params.frequency() + k as f64 * params.subcarrier_spacing(),
                phase: subcarrier_phase(k),
            })
            .collect();

        Self {
            params,
            config,
            amplitude: (params.power() / n as f64).sqrt(),
            subcarriers,
        }
    }

    /// Generator with the default 4 µs window and channel
    pub fn nr_sub6(params: OfdmParams) -> Self {
        Self::new(params, ProfileConfig::nr_sub6())
    }

    /// Parameters being rendered
    pub fn params(&self) -> &OfdmParams {
        &self.params
    }

    /// Per-subcarrier amplitude `A = sqrt(P / N)`
    pub fn subcarrier_amplitude(&self) -> f64 {
        self.amplitude
    }

    /// Frequencies of all subcarriers, Hz
    pub fn subcarrier_frequencies(&self) -> impl Iterator<Item = f64> + '_ {
        self.subcarriers.iter().map(|s| s.frequency)
    }

    /// Span covered by the subcarriers `N·Δf`, Hz
    pub fn occupied_bandwidth(&self) -> f64 {
        self.params.occupied_bandwidth()
    }
}

impl SignalGenerator for OfdmGenerator {
    fn profile(&self) -> Profile {
        Profile::Singapore
    }

    fn sampling(&self) -> &SamplingConfig {
        &self.config.sampling
    }

    fn channel(&self) -> &ChannelModel {
        &self.config.channel
    }

    fn transmitted_at(&self, t: f64) -> f64 {
        let a = self.amplitude;
        self.subcarriers
            .iter()
            .map(|s| a * (2.0 * PI * s.frequency * t + s.phase).cos())
            .sum()
    }

    fn cost_per_sample(&self) -> usize {
        self.subcarriers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::waveform::GenerateOptions;

    fn params(n: u32, power: f64) -> OfdmParams {
        OfdmParams::new(3.5e9, 30e3, n, power)
    }

    /// 200 samples at 20 GHz keeps large-N tests fast
    fn short_window() -> ProfileConfig {
        ProfileConfig {
            sampling: SamplingConfig::nr_sub6().with_window(1e-8),
            channel: ChannelModel::nr_sub6(),
        }
    }

    #[test]
    fn test_phase_rotation() {
        assert_eq!(subcarrier_phase(0), 0.0);
        assert_eq!(subcarrier_phase(1), PI / 2.0);
        assert_eq!(subcarrier_phase(2), PI);
        assert_eq!(subcarrier_phase(3), 3.0 * PI / 2.0);
        assert_eq!(subcarrier_phase(4), 0.0);
        assert_eq!(subcarrier_phase(4097), PI / 2.0);
    }

    #[test]
    fn test_origin_four_subcarriers_cancel() {
        let gen = OfdmGenerator::new(params(4, 10.0), short_window());
        assert!(gen.transmitted_at(0.0).abs() < 1e-12);
    }

    #[test]
    fn test_origin_closed_form_sum() {
        for n in [1u32, 2, 3, 5, 7, 64, 273] {
            let gen = OfdmGenerator::new(params(n, 8.0), short_window());
            let a = (8.0 / n as f64).sqrt();
            let expected: f64 = (0..n as usize).map(|k| a * subcarrier_phase(k).cos()).sum();
            let set = gen.generate(&GenerateOptions::transmitted_only());
            assert!(
                (set.transmitted.samples[0].amplitude - expected).abs() < 1e-9,
                "N = {}",
                n
            );
        }

        // One subcarrier is a plain cosine at full amplitude
        let gen = OfdmGenerator::new(params(1, 9.0), short_window());
        assert_eq!(gen.transmitted_at(0.0), 3.0);
    }

    #[test]
    fn test_default_window_sample_count() {
        let gen = OfdmGenerator::nr_sub6(params(4, 1.0));
        let set = gen.generate(&GenerateOptions::default());
        assert_eq!(set.transmitted.len(), 80_000);
        assert_eq!(set.received.unwrap().len(), 80_000);
        assert_eq!(set.transmitted.samples[1].time, 1.0 / 20e9);
    }

    #[test]
    fn test_single_trace_window() {
        let config = ProfileConfig {
            sampling: SamplingConfig::nr_sub6_single_trace(),
            channel: ChannelModel::nr_sub6(),
        };
        let set = OfdmGenerator::new(params(2, 1.0), config)
            .generate(&GenerateOptions::transmitted_only());
        assert_eq!(set.transmitted.len(), 20_000);
        assert!(set.received.is_none());
    }

    #[test]
    fn test_subcarrier_layout() {
        let gen = OfdmGenerator::new(params(4, 2.0), short_window());
        let freqs: Vec<f64> = gen.subcarrier_frequencies().collect();
        assert_eq!(freqs, vec![3.5e9, 3.5e9 + 30e3, 3.5e9 + 60e3, 3.5e9 + 90e3]);
        assert!((gen.subcarrier_amplitude() - 0.5f64.sqrt()).abs() < 1e-15);
        assert_eq!(gen.occupied_bandwidth(), 120e3);
        assert_eq!(gen.cost_per_sample(), 4);
        assert_eq!(gen.params().subcarrier_count(), 4);
    }

    #[test]
    fn test_matches_direct_sum() {
        let gen = OfdmGenerator::new(params(6, 3.0), short_window());
        let set = gen.generate(&GenerateOptions::transmitted_only());
        let a = 0.5f64.sqrt();
        for s in set.transmitted.samples.iter().step_by(17) {
            let expected: f64 = (0..6)
                .map(|k| {
                    let f = 3.5e9 + k as f64 * 30e3;
                    a * (2.0 * PI * f * s.time + subcarrier_phase(k)).cos()
                })
                .sum();
            assert!((s.amplitude - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_received_bounded_by_transmitted() {
        let gen = OfdmGenerator::new(params(16, 1.0), short_window());
        let set = gen.generate(&GenerateOptions::default());
        let rx = set.received.unwrap();
        for (tx, rx) in set.transmitted.samples.iter().zip(&rx.samples) {
            assert!(rx.amplitude.abs() <= tx.amplitude.abs() + 1e-12);
        }
    }

    #[test]
    fn test_idempotent() {
        let gen = OfdmGenerator::new(params(4096, 10.0), short_window());
        let a = gen.generate(&GenerateOptions::default());
        let b = gen.generate(&GenerateOptions::default());
        assert_eq!(a, b);
        for (x, y) in a.transmitted.samples.iter().zip(&b.transmitted.samples) {
            assert_eq!(x.amplitude.to_bits(), y.amplitude.to_bits());
        }
    }
}
