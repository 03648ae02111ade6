//! Time-domain waveform synthesis.
//!
//! Each profile has one generator behind the [`SignalGenerator`] trait. A
//! generator evaluates the transmitted signal on a fixed sampling grid and,
//! when asked, pushes every sample through the profile's [`ChannelModel`] to
//! produce the received trace as well.
//!
//! ```text
//!  SignalParameters ──► generator_for() ──► SignalGenerator
//!                                              │
//!                       t_i = i / rate         ▼
//!                                     s(t_i) ──┬──────────────► "transmitted"
//!                                              │
//!                                              └─► g(t_i)·s(t_i) ► "received"
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use rfprofile_core::prelude::*;
//!
//! let form = SignalForm::new(Profile::Mexico)
//!     .frequency(98.5, FrequencyUnit::MHz)
//!     .frequency_deviation(75.0, FrequencyUnit::KHz)
//!     .audio_frequency(15.0, FrequencyUnit::KHz)
//!     .power(1.0, PowerUnit::Watt);
//!
//! let params = validate(&form).expect("valid FM parameters");
//! let set = generate(&params, &GeneratorConfig::default(), &GenerateOptions::default());
//! assert_eq!(set.transmitted.len(), 1000);
//! assert!(set.received.is_some());
//! ```

pub mod fm;
pub mod ofdm;

pub use fm::FmGenerator;
pub use ofdm::OfdmGenerator;

use crate::channel::ChannelModel;
use crate::config::{GeneratorConfig, SamplingConfig};
use crate::params::SignalParameters;
use crate::profile::Profile;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

/// Above this many subcarrier evaluations a single generation is slow enough
/// to be worth a warning
pub const LARGE_WORKLOAD: usize = 50_000_000;

/// One point of a trace
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveformSample {
    /// Time in seconds from the start of the window
    pub time: f64,
    /// Instantaneous signal amplitude
    pub amplitude: f64,
}

/// Which side of the channel a trace represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceKind {
    /// Signal as emitted
    Transmitted,
    /// Signal after attenuation and fading
    Received,
}

impl TraceKind {
    /// Trace name used in output files
    pub fn name(&self) -> &'static str {
        match self {
            Self::Transmitted => "transmitted",
            Self::Received => "received",
        }
    }
}

/// An ordered sequence of samples
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    /// Transmitted or received
    pub kind: TraceKind,
    /// Samples in increasing time order
    pub samples: Vec<WaveformSample>,
}

impl Trace {
    /// Create a trace
    pub fn new(kind: TraceKind, samples: Vec<WaveformSample>) -> Self {
        Self { kind, samples }
    }

    /// Trace name ("transmitted" / "received")
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True if the trace has no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Amplitudes only
    pub fn amplitudes(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.amplitude)
    }

    /// Largest absolute amplitude (0 for an empty trace)
    pub fn peak_amplitude(&self) -> f64 {
        self.amplitudes().fold(0.0, |acc, a| acc.max(a.abs()))
    }

    /// Root-mean-square amplitude (0 for an empty trace)
    pub fn rms(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let sum_sq: f64 = self.amplitudes().map(|a| a * a).sum();
        (sum_sq / self.samples.len() as f64).sqrt()
    }

    /// Time between first and last sample
    pub fn duration(&self) -> f64 {
        match (self.samples.first(), self.samples.last()) {
            (Some(first), Some(last)) => last.time - first.time,
            _ => 0.0,
        }
    }
}

/// Options for one generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateOptions {
    /// Also produce the channel-impaired trace
    pub include_received: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            include_received: true,
        }
    }
}

impl GenerateOptions {
    /// Only the transmitted trace
    pub fn transmitted_only() -> Self {
        Self {
            include_received: false,
        }
    }

    /// Builder: include or skip the received trace
    pub fn include_received(mut self, include: bool) -> Self {
        self.include_received = include;
        self
    }
}

/// Result of one generation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaveformSet {
    /// Profile the traces were generated for
    pub profile: Profile,
    /// Sample rate of both traces, Hz
    pub sample_rate: f64,
    /// Signal as emitted
    pub transmitted: Trace,
    /// Signal after the channel, if requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received: Option<Trace>,
}

impl WaveformSet {
    /// All traces, transmitted first
    pub fn traces(&self) -> impl Iterator<Item = &Trace> {
        std::iter::once(&self.transmitted).chain(self.received.as_ref())
    }
}

/// A closed-form signal evaluated on a sampling grid
pub trait SignalGenerator {
    /// Profile this generator belongs to
    fn profile(&self) -> Profile;

    /// Sampling grid
    fn sampling(&self) -> &SamplingConfig;

    /// Channel used for the received trace
    fn channel(&self) -> &ChannelModel;

    /// Transmitted amplitude at time `t`
    fn transmitted_at(&self, t: f64) -> f64;

    /// Relative cost of one sample (number of tones summed)
    fn cost_per_sample(&self) -> usize {
        1
    }

    /// Evaluate the whole window.
    ///
    /// Traces are rebuilt from scratch on every call; identical inputs give
    /// bitwise-identical output.
    fn generate(&self, options: &GenerateOptions) -> WaveformSet {
        let sampling = *self.sampling();
        let channel = *self.channel();
        let count = sampling.sample_count();

        debug!(
            profile = %self.profile(),
            samples = count,
            sample_rate = sampling.sample_rate,
            include_received = options.include_received,
            "generating waveform"
        );

        let work = count.saturating_mul(self.cost_per_sample());
        if work > LARGE_WORKLOAD {
            warn!(
                "large workload: {} samples x {} tones, generation may take a while",
                count,
                self.cost_per_sample()
            );
        }

        let mut transmitted = Vec::with_capacity(count);
        let mut received = if options.include_received {
            Vec::with_capacity(count)
        } else {
            Vec::new()
        };

        for i in 0..count {
            let time = sampling.time_at(i);
            let amplitude = self.transmitted_at(time);
            transmitted.push(WaveformSample { time, amplitude });
            if options.include_received {
                received.push(WaveformSample {
                    time,
                    amplitude: channel.apply(time, amplitude),
                });
            }
        }

        let set = WaveformSet {
            profile: self.profile(),
            sample_rate: sampling.sample_rate,
            transmitted: Trace::new(TraceKind::Transmitted, transmitted),
            received: options
                .include_received
                .then(|| Trace::new(TraceKind::Received, received)),
        };

        for t in set.traces() {
            trace!(
                trace = t.name(),
                peak = t.peak_amplitude(),
                rms = t.rms(),
                "trace ready"
            );
        }
        set
    }
}

/// Build the generator matching the parameters' profile
pub fn generator_for(
    params: &SignalParameters,
    config: &GeneratorConfig,
) -> Box<dyn SignalGenerator> {
    match params {
        SignalParameters::Fm(p) => Box::new(FmGenerator::new(*p, config.fm)),
        SignalParameters::Ofdm(p) => Box::new(OfdmGenerator::new(*p, config.ofdm)),
    }
}

/// Generate traces for validated parameters
pub fn generate(
    params: &SignalParameters,
    config: &GeneratorConfig,
    options: &GenerateOptions,
) -> WaveformSet {
    generator_for(params, config).generate(options)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trace(amps: &[f64]) -> Trace {
        Trace::new(
            TraceKind::Transmitted,
            amps.iter()
                .enumerate()
                .map(|(i, &a)| WaveformSample {
                    time: i as f64 * 0.5,
                    amplitude: a,
                })
                .collect(),
        )
    }

    #[test]
    fn test_trace_stats() {
        let t = trace(&[1.0, -3.0, 2.0, 0.0]);
        assert_eq!(t.len(), 4);
        assert_eq!(t.peak_amplitude(), 3.0);
        assert!((t.rms() - (14.0f64 / 4.0).sqrt()).abs() < 1e-12);
        assert_eq!(t.duration(), 1.5);
    }

    #[test]
    fn test_empty_trace_stats() {
        let t = trace(&[]);
        assert!(t.is_empty());
        assert_eq!(t.peak_amplitude(), 0.0);
        assert_eq!(t.rms(), 0.0);
        assert_eq!(t.duration(), 0.0);
    }

    #[test]
    fn test_trace_kind_serializes_lowercase() {
        let json = serde_json::to_string(&TraceKind::Received).unwrap();
        assert_eq!(json, "\"received\"");
        assert_eq!(TraceKind::Transmitted.name(), "transmitted");
    }

    #[test]
    fn test_options() {
        assert!(GenerateOptions::default().include_received);
        assert!(!GenerateOptions::transmitted_only().include_received);
        assert!(GenerateOptions::transmitted_only().include_received(true).include_received);
    }
}
