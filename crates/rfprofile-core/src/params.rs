//! Raw form state and validated signal parameters.
//!
//! [`SignalForm`] holds whatever the user has typed so far. The parameter
//! records ([`FmParams`], [`OfdmParams`]) can only be obtained from
//! [`crate::validation::validate`], so a generator never sees a missing or
//! out-of-range value.

use crate::profile::Profile;
use crate::units::{FrequencyUnit, PhysicalQuantity, PowerUnit};
use serde::{Deserialize, Serialize};

/// Values collected by the front end, before conversion and validation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalForm {
    /// Selected country profile
    pub profile: Option<Profile>,
    /// Carrier frequency (both profiles)
    pub frequency: PhysicalQuantity<FrequencyUnit>,
    /// Peak frequency deviation (FM)
    pub frequency_deviation: PhysicalQuantity<FrequencyUnit>,
    /// Audio (modulating) frequency (FM)
    pub audio_frequency: PhysicalQuantity<FrequencyUnit>,
    /// Subcarrier spacing (OFDM)
    pub subcarrier_spacing: PhysicalQuantity<FrequencyUnit>,
    /// Number of subcarriers (OFDM)
    pub subcarrier_count: Option<u32>,
    /// Transmit power (both profiles)
    pub power: PhysicalQuantity<PowerUnit>,
}

impl SignalForm {
    /// Empty form with a profile preselected
    pub fn new(profile: Profile) -> Self {
        Self {
            profile: Some(profile),
            ..Default::default()
        }
    }

    /// Builder: set carrier frequency
    pub fn frequency(mut self, value: f64, unit: FrequencyUnit) -> Self {
        self.frequency = PhysicalQuantity::new(value, unit);
        self
    }

    /// Builder: set frequency deviation
    pub fn frequency_deviation(mut self, value: f64, unit: FrequencyUnit) -> Self {
        self.frequency_deviation = PhysicalQuantity::new(value, unit);
        self
    }

    /// Builder: set audio frequency
    pub fn audio_frequency(mut self, value: f64, unit: FrequencyUnit) -> Self {
        self.audio_frequency = PhysicalQuantity::new(value, unit);
        self
    }

    /// Builder: set subcarrier spacing
    pub fn subcarrier_spacing(mut self, value: f64, unit: FrequencyUnit) -> Self {
        self.subcarrier_spacing = PhysicalQuantity::new(value, unit);
        self
    }

    /// Builder: set subcarrier count
    pub fn subcarrier_count(mut self, count: u32) -> Self {
        self.subcarrier_count = Some(count);
        self
    }

    /// Builder: set transmit power
    pub fn power(mut self, value: f64, unit: PowerUnit) -> Self {
        self.power = PhysicalQuantity::new(value, unit);
        self
    }
}

/// Validated FM broadcast parameters, base SI units
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FmParams {
    frequency: f64,
    frequency_deviation: f64,
    audio_frequency: f64,
    power: f64,
}

impl FmParams {
    pub(crate) fn new(
        frequency: f64,
        frequency_deviation: f64,
        audio_frequency: f64,
        power: f64,
    ) -> Self {
        Self {
            frequency,
            frequency_deviation,
            audio_frequency,
            power,
        }
    }

    /// Carrier frequency `fc`, Hz
    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Peak deviation `Δf`, Hz
    pub fn frequency_deviation(&self) -> f64 {
        self.frequency_deviation
    }

    /// Modulating frequency `fm`, Hz (always > 0)
    pub fn audio_frequency(&self) -> f64 {
        self.audio_frequency
    }

    /// Transmit power, W
    pub fn power(&self) -> f64 {
        self.power
    }

    /// Modulation index `β = Δf / fm`
    pub fn modulation_index(&self) -> f64 {
        self.frequency_deviation / self.audio_frequency
    }

    /// Carson's rule bandwidth `2(Δf + fm)`, Hz
    pub fn carson_bandwidth(&self) -> f64 {
        carson_bandwidth(self.frequency_deviation, self.audio_frequency)
    }
}

/// Carson's rule estimate of FM occupied bandwidth
pub fn carson_bandwidth(deviation: f64, audio_frequency: f64) -> f64 {
    2.0 * (deviation + audio_frequency)
}

/// Validated 5G OFDM parameters, base SI units
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OfdmParams {
    frequency: f64,
    subcarrier_spacing: f64,
    subcarrier_count: u32,
    power: f64,
}

impl OfdmParams {
    pub(crate) fn new(
        frequency: f64,
        subcarrier_spacing: f64,
        subcarrier_count: u32,
        power: f64,
    ) -> Self {
        Self {
            frequency,
            subcarrier_spacing,
            subcarrier_count,
            power,
        }
    }

    /// Carrier frequency `fc` (subcarrier 0), Hz
    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Subcarrier spacing `Δf`, Hz
    pub fn subcarrier_spacing(&self) -> f64 {
        self.subcarrier_spacing
    }

    /// Subcarrier count `N` (always >= 1)
    pub fn subcarrier_count(&self) -> u32 {
        self.subcarrier_count
    }

    /// Transmit power, W
    pub fn power(&self) -> f64 {
        self.power
    }

    /// Span covered by the subcarriers `N·Δf`, Hz
    pub fn occupied_bandwidth(&self) -> f64 {
        self.subcarrier_count as f64 * self.subcarrier_spacing
    }
}

/// Parameters accepted by validation, tagged by profile
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "profile")]
pub enum SignalParameters {
    /// Mexico FM broadcast
    #[serde(rename = "mx")]
    Fm(FmParams),
    /// Singapore 5G OFDM
    #[serde(rename = "sg")]
    Ofdm(OfdmParams),
}

impl SignalParameters {
    /// Profile these parameters were validated against
    pub fn profile(&self) -> Profile {
        match self {
            Self::Fm(_) => Profile::Mexico,
            Self::Ofdm(_) => Profile::Singapore,
        }
    }

    /// Carrier frequency, Hz
    pub fn frequency(&self) -> f64 {
        match self {
            Self::Fm(p) => p.frequency(),
            Self::Ofdm(p) => p.frequency(),
        }
    }

    /// Transmit power, W
    pub fn power(&self) -> f64 {
        match self {
            Self::Fm(p) => p.power(),
            Self::Ofdm(p) => p.power(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_builder() {
        let form = SignalForm::new(Profile::Mexico)
            .frequency(98.5, FrequencyUnit::MHz)
            .power(500.0, PowerUnit::MilliWatt);
        assert_eq!(form.profile, Some(Profile::Mexico));
        assert_eq!(form.frequency.to_base_unit(), Some(98.5e6));
        assert_eq!(form.power.to_base_unit(), Some(0.5));
        assert!(!form.audio_frequency.is_entered());
        assert_eq!(form.subcarrier_count, None);
    }

    #[test]
    fn test_fm_derived() {
        let p = FmParams::new(98e6, 75e3, 15e3, 1.0);
        assert!((p.modulation_index() - 5.0).abs() < 1e-12);
        assert_eq!(p.carson_bandwidth(), 180e3);
    }

    #[test]
    fn test_ofdm_derived() {
        let p = OfdmParams::new(3.5e9, 30e3, 273, 10.0);
        assert_eq!(p.occupied_bandwidth(), 273.0 * 30e3);
        assert_eq!(SignalParameters::Ofdm(p).profile(), Profile::Singapore);
    }

    #[test]
    fn test_serialize_tagged() {
        let json = serde_json::to_value(SignalParameters::Fm(FmParams::new(98e6, 75e3, 15e3, 1.0)))
            .unwrap();
        assert_eq!(json["profile"], "mx");
        assert_eq!(json["audio_frequency"], 15e3);
    }
}
