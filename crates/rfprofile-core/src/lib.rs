//! # rfprofile Core Library
//!
//! Regulatory signal profiles and closed-form waveform synthesis for two
//! broadcast/cellular services:
//!
//! - **Mexico FM broadcast** (88-108 MHz): single-tone FM with Carson's rule
//!   bandwidth check
//! - **Singapore 5G sub-6 GHz** (3.3-3.8 GHz): multi-tone OFDM
//!
//! ## Signal Flow
//!
//! ```text
//! (value, unit) ──► to_base_unit ──► validate ──► SignalParameters
//!                                                       │
//!                                   generate ◄──────────┘
//!                                       │
//!                                       ▼
//!                   WaveformSet { transmitted, received? }
//! ```
//!
//! Validation is the only way to obtain [`SignalParameters`], so every
//! generator input is complete and within the profile's limits. Generation is
//! pure and single-threaded: the same parameters always produce the same
//! samples.
//!
//! ## Example
//!
//! ```rust
//! use rfprofile_core::prelude::*;
//!
//! let form = SignalForm::new(Profile::Singapore)
//!     .frequency(3.5, FrequencyUnit::GHz)
//!     .subcarrier_spacing(30.0, FrequencyUnit::KHz)
//!     .subcarrier_count(4)
//!     .power(10.0, PowerUnit::Watt);
//!
//! let params = validate(&form).expect("valid 5G parameters");
//! let mut config = GeneratorConfig::default();
//! config.ofdm.sampling = SamplingConfig::nr_sub6_single_trace();
//!
//! let set = generate(&params, &config, &GenerateOptions::transmitted_only());
//! assert_eq!(set.transmitted.len(), 20_000);
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod channel;
pub mod config;
pub mod error;
pub mod params;
pub mod profile;
pub mod units;
pub mod validation;
pub mod waveform;

// Re-export main types
pub use channel::ChannelModel;
pub use config::{GeneratorConfig, ProfileConfig, SamplingConfig};
pub use error::{ConfigError, ProfileError, UnitError};
pub use params::{FmParams, OfdmParams, SignalForm, SignalParameters};
pub use profile::{Bound, Profile, ProfileLimits};
pub use units::{from_base_unit, to_base_unit, FrequencyUnit, PhysicalQuantity, PowerUnit, TimeUnit, Unit};
pub use validation::{validate, Field, FieldError, ValidationErrors};
pub use waveform::{
    generate, generator_for, GenerateOptions, SignalGenerator, Trace, TraceKind, WaveformSample,
    WaveformSet,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{GeneratorConfig, SamplingConfig};
    pub use crate::params::{SignalForm, SignalParameters};
    pub use crate::profile::Profile;
    pub use crate::units::{FrequencyUnit, PhysicalQuantity, PowerUnit, TimeUnit};
    pub use crate::validation::validate;
    pub use crate::waveform::{generate, GenerateOptions, SignalGenerator, WaveformSet};
}
