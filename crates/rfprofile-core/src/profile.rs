//! Country profiles and their regulatory limits.
//!
//! | Profile | Service | Carrier band | Modulation |
//! |---------|---------|--------------|------------|
//! | `mx` | Mexico FM broadcast | 88-108 MHz | Analog FM |
//! | `sg` | Singapore 5G sub-6 GHz | 3.3-3.8 GHz | OFDM |

use crate::error::ProfileError;
use crate::units::{from_base_unit, FrequencyUnit, Unit};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Country profile selecting the modulation and the rule set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Profile {
    /// Mexico FM broadcast
    #[serde(rename = "mx")]
    Mexico,
    /// Singapore 5G NR sub-6 GHz
    #[serde(rename = "sg")]
    Singapore,
}

impl Profile {
    /// All known profiles
    pub const ALL: [Profile; 2] = [Profile::Mexico, Profile::Singapore];

    /// Short code used on the command line
    pub fn code(&self) -> &'static str {
        match self {
            Self::Mexico => "mx",
            Self::Singapore => "sg",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Mexico => "Mexico - FM broadcast",
            Self::Singapore => "Singapore - 5G sub-6 GHz",
        }
    }

    /// Modulation family generated for this profile
    pub fn modulation(&self) -> &'static str {
        match self {
            Self::Mexico => "FM",
            Self::Singapore => "OFDM",
        }
    }

    /// Regulatory limits applied by validation
    pub fn limits(&self) -> ProfileLimits {
        match self {
            Self::Mexico => ProfileLimits::Fm(FM_LIMITS),
            Self::Singapore => ProfileLimits::Ofdm(OFDM_LIMITS),
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Profile {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mx" | "mexico" | "fm" => Ok(Self::Mexico),
            "sg" | "singapore" | "5g" | "ofdm" => Ok(Self::Singapore),
            _ => Err(ProfileError::Unknown(s.to_string())),
        }
    }
}

/// A closed or half-open interval `[min, max]` / `(min, max]` in base SI units.
///
/// Values must be finite to be contained.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bound {
    /// Lower limit
    pub min: f64,
    /// Upper limit (inclusive); `f64::INFINITY` for no upper limit
    pub max: f64,
    /// Whether `min` itself is allowed
    pub min_inclusive: bool,
}

impl Bound {
    /// `[min, max]`
    pub const fn inclusive(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            min_inclusive: true,
        }
    }

    /// `(min, max]`
    pub const fn exclusive_min(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            min_inclusive: false,
        }
    }

    /// `(min, +inf)`
    pub const fn greater_than(min: f64) -> Self {
        Self::exclusive_min(min, f64::INFINITY)
    }

    /// Whether `value` lies within the bound
    pub fn contains(&self, value: f64) -> bool {
        if !value.is_finite() {
            return false;
        }
        let above_min = if self.min_inclusive {
            value >= self.min
        } else {
            value > self.min
        };
        above_min && value <= self.max
    }

    /// Describe the allowed range using `format` for the numbers
    pub fn describe(&self, format: impl Fn(f64) -> String) -> String {
        if self.max.is_infinite() {
            format!("greater than {}", format(self.min))
        } else if self.min_inclusive {
            format!("between {} and {}", format(self.min), format(self.max))
        } else {
            format!(
                "greater than {} and at most {}",
                format(self.min),
                format(self.max)
            )
        }
    }
}

/// Format a frequency in the largest unit that keeps the number >= 1
pub fn format_frequency(hz: f64) -> String {
    let unit = FrequencyUnit::all()
        .iter()
        .rev()
        .copied()
        .find(|u| hz.abs() >= u.factor())
        .unwrap_or(FrequencyUnit::Hz);
    format!("{} {}", from_base_unit(hz, unit), unit)
}

/// Format a power in watts
pub fn format_power(watts: f64) -> String {
    format!("{} W", watts)
}

/// Format a plain count
pub fn format_count(n: f64) -> String {
    format!("{}", n)
}

/// FM broadcast limits (Mexico)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FmLimits {
    /// Carrier frequency band, Hz
    pub carrier: Bound,
    /// Peak frequency deviation, Hz
    pub deviation: Bound,
    /// Audio (modulating) frequency, Hz
    pub audio: Bound,
    /// Transmit power, W
    pub power: Bound,
    /// Maximum Carson bandwidth `2(Δf + fm)`, Hz
    pub max_bandwidth: f64,
}

/// 5G NR sub-6 GHz limits (Singapore)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OfdmLimits {
    /// Carrier frequency band, Hz
    pub carrier: Bound,
    /// Subcarrier spacing, Hz
    pub spacing: Bound,
    /// Subcarrier count
    pub subcarriers: Bound,
    /// Transmit power, W
    pub power: Bound,
}

/// Limits of one profile
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "modulation", rename_all = "lowercase")]
pub enum ProfileLimits {
    /// FM rule set
    Fm(FmLimits),
    /// OFDM rule set
    Ofdm(OfdmLimits),
}

/// Mexico FM broadcast band plan
pub const FM_LIMITS: FmLimits = FmLimits {
    carrier: Bound::inclusive(88e6, 108e6),
    deviation: Bound::exclusive_min(0.0, 75e3),
    audio: Bound::exclusive_min(0.0, 15e3),
    power: Bound::greater_than(0.0),
    max_bandwidth: 200e3,
};

/// Singapore 5G n78 band plan
pub const OFDM_LIMITS: OfdmLimits = OfdmLimits {
    carrier: Bound::inclusive(3.3e9, 3.8e9),
    spacing: Bound::exclusive_min(0.0, 120e3),
    subcarriers: Bound::exclusive_min(0.0, 4096.0),
    power: Bound::greater_than(0.0),
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_parse() {
        assert_eq!("mx".parse::<Profile>().unwrap(), Profile::Mexico);
        assert_eq!("Singapore".parse::<Profile>().unwrap(), Profile::Singapore);
        assert_eq!(
            "us".parse::<Profile>(),
            Err(ProfileError::Unknown("us".to_string()))
        );
    }

    #[test]
    fn test_bound_edges() {
        let band = Bound::inclusive(88e6, 108e6);
        assert!(band.contains(88e6));
        assert!(band.contains(108e6));
        assert!(!band.contains(87.9e6));
        assert!(!band.contains(108.1e6));

        let dev = Bound::exclusive_min(0.0, 75e3);
        assert!(!dev.contains(0.0));
        assert!(dev.contains(1.0));
        assert!(dev.contains(75e3));

        let power = Bound::greater_than(0.0);
        assert!(power.contains(1e-6));
        assert!(!power.contains(f64::INFINITY));
        assert!(!power.contains(f64::NAN));
    }

    #[test]
    fn test_describe() {
        assert_eq!(
            FM_LIMITS.carrier.describe(format_frequency),
            "between 88 MHz and 108 MHz"
        );
        assert_eq!(
            OFDM_LIMITS.spacing.describe(format_frequency),
            "greater than 0 Hz and at most 120 kHz"
        );
        assert_eq!(FM_LIMITS.power.describe(format_power), "greater than 0 W");
    }

    #[test]
    fn test_limits_by_profile() {
        assert!(matches!(Profile::Mexico.limits(), ProfileLimits::Fm(_)));
        assert!(matches!(Profile::Singapore.limits(), ProfileLimits::Ofdm(_)));
    }
}
