//! Regulatory validation of form input.
//!
//! Only the selected profile's fields are checked; the other profile's fields
//! are ignored entirely. Every failing field gets exactly one message. When
//! the Carson bandwidth check fails it replaces any range message already
//! recorded for the deviation field.

use crate::params::{carson_bandwidth, FmParams, OfdmParams, SignalForm, SignalParameters};
use crate::profile::{
    format_count, format_frequency, format_power, Bound, Profile, FM_LIMITS, OFDM_LIMITS,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Form field an error is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// Country profile selector
    Profile,
    /// Carrier frequency
    Frequency,
    /// FM peak deviation
    FrequencyDeviation,
    /// FM audio frequency
    AudioFrequency,
    /// OFDM subcarrier spacing
    SubcarrierSpacing,
    /// OFDM subcarrier count
    SubcarrierCount,
    /// Transmit power
    Power,
}

impl Field {
    /// Snake-case name, matching the serialized form
    pub fn name(&self) -> &'static str {
        match self {
            Self::Profile => "profile",
            Self::Frequency => "frequency",
            Self::FrequencyDeviation => "frequency_deviation",
            Self::AudioFrequency => "audio_frequency",
            Self::SubcarrierSpacing => "subcarrier_spacing",
            Self::SubcarrierCount => "subcarrier_count",
            Self::Power => "power",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Why a single field was rejected
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldError {
    /// Required value was not entered
    #[error("required")]
    Missing,

    /// Value lies outside the regulatory range
    #[error("must be {allowed}")]
    OutOfRange {
        /// Offending value, base SI units
        value: f64,
        /// Description of the accepted range
        allowed: String,
    },

    /// Carson bandwidth `2(Δf + fm)` over the channel allocation
    #[error("bandwidth {} exceeds {}", hz(.bandwidth), hz(.limit))]
    BandwidthExceeded {
        /// Computed Carson bandwidth, Hz
        bandwidth: f64,
        /// Allowed maximum, Hz
        limit: f64,
    },
}

/// Per-field validation failures; never empty when returned as an error
#[derive(Error, Debug, Clone, Default, PartialEq, Serialize)]
#[error("{} invalid field(s): {}", .errors.len(), summarize(.errors))]
pub struct ValidationErrors {
    errors: BTreeMap<Field, FieldError>,
}

fn hz(value: &f64) -> String {
    format_frequency(*value)
}

fn summarize(errors: &BTreeMap<Field, FieldError>) -> String {
    errors
        .iter()
        .map(|(field, err)| format!("{field} {err}"))
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    /// Error recorded for `field`, if any
    pub fn get(&self, field: Field) -> Option<&FieldError> {
        self.errors.get(&field)
    }

    /// Whether `field` failed
    pub fn contains(&self, field: Field) -> bool {
        self.errors.contains_key(&field)
    }

    /// Number of failing fields
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// True when nothing failed
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Failing fields in display order
    pub fn iter(&self) -> impl Iterator<Item = (Field, &FieldError)> {
        self.errors.iter().map(|(f, e)| (*f, e))
    }

    /// Record an error, replacing any earlier one for the same field
    fn set(&mut self, field: Field, error: FieldError) {
        self.errors.insert(field, error);
    }

    fn into_result<T>(self, ok: impl FnOnce() -> T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(ok())
        } else {
            Err(self)
        }
    }
}

/// Check a required value against `bound`, recording the failure.
///
/// Returns the value only when it passed.
fn require(
    errors: &mut ValidationErrors,
    field: Field,
    value: Option<f64>,
    bound: &Bound,
    format: fn(f64) -> String,
) -> Option<f64> {
    match value {
        None => {
            errors.set(field, FieldError::Missing);
            None
        }
        Some(v) if !bound.contains(v) => {
            errors.set(
                field,
                FieldError::OutOfRange {
                    value: v,
                    allowed: bound.describe(format),
                },
            );
            None
        }
        Some(v) => Some(v),
    }
}

/// Validate the form for its selected profile.
///
/// On success the returned parameters are complete and within every
/// regulatory limit; on failure no parameters are produced.
pub fn validate(form: &SignalForm) -> Result<SignalParameters, ValidationErrors> {
    let result = match form.profile {
        None => {
            let mut errors = ValidationErrors::default();
            errors.set(Field::Profile, FieldError::Missing);
            Err(errors)
        }
        Some(Profile::Mexico) => validate_fm(form).map(SignalParameters::Fm),
        Some(Profile::Singapore) => validate_ofdm(form).map(SignalParameters::Ofdm),
    };

    match &result {
        Ok(params) => debug!(profile = %params.profile(), "validation passed"),
        Err(errors) => debug!(failed = errors.len(), "validation failed: {}", errors),
    }
    result
}

/// Validate the FM (Mexico) fields of `form`
pub fn validate_fm(form: &SignalForm) -> Result<FmParams, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    let limits = &FM_LIMITS;

    let deviation_raw = form.frequency_deviation.to_base_unit();
    let audio_raw = form.audio_frequency.to_base_unit();

    let fc = require(
        &mut errors,
        Field::Frequency,
        form.frequency.to_base_unit(),
        &limits.carrier,
        format_frequency,
    );
    let deviation = require(
        &mut errors,
        Field::FrequencyDeviation,
        deviation_raw,
        &limits.deviation,
        format_frequency,
    );
    let audio = require(
        &mut errors,
        Field::AudioFrequency,
        audio_raw,
        &limits.audio,
        format_frequency,
    );
    let power = require(
        &mut errors,
        Field::Power,
        form.power.to_base_unit(),
        &limits.power,
        format_power,
    );

    // Runs on the raw values: an out-of-range deviation still gets the
    // bandwidth message if the pair is too wide
    if let (Some(dev), Some(fm)) = (deviation_raw, audio_raw) {
        let bandwidth = carson_bandwidth(dev, fm);
        if bandwidth > limits.max_bandwidth {
            errors.set(
                Field::FrequencyDeviation,
                FieldError::BandwidthExceeded {
                    bandwidth,
                    limit: limits.max_bandwidth,
                },
            );
        }
    }

    match (fc, deviation, audio, power) {
        (Some(fc), Some(dev), Some(fm), Some(p)) => {
            errors.into_result(|| FmParams::new(fc, dev, fm, p))
        }
        _ => Err(errors),
    }
}

/// Validate the OFDM (Singapore) fields of `form`
pub fn validate_ofdm(form: &SignalForm) -> Result<OfdmParams, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    let limits = &OFDM_LIMITS;

    let fc = require(
        &mut errors,
        Field::Frequency,
        form.frequency.to_base_unit(),
        &limits.carrier,
        format_frequency,
    );
    let spacing = require(
        &mut errors,
        Field::SubcarrierSpacing,
        form.subcarrier_spacing.to_base_unit(),
        &limits.spacing,
        format_frequency,
    );
    let count = require(
        &mut errors,
        Field::SubcarrierCount,
        form.subcarrier_count.map(f64::from),
        &limits.subcarriers,
        format_count,
    );
    let power = require(
        &mut errors,
        Field::Power,
        form.power.to_base_unit(),
        &limits.power,
        format_power,
    );

    match (fc, spacing, count, power, form.subcarrier_count) {
        (Some(fc), Some(spacing), Some(_), Some(p), Some(n)) => {
            errors.into_result(|| OfdmParams::new(fc, spacing, n, p))
        }
        _ => Err(errors),
    }
}
