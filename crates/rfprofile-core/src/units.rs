//! Physical quantities and unit conversion.
//!
//! Every quantity entered by the user is a `(value, unit)` pair. Units are
//! grouped into categories (frequency, power, time) and each carries a fixed
//! multiplicative factor to its base SI unit. The category is part of the type:
//! a `PhysicalQuantity<PowerUnit>` cannot hold a frequency unit.
//!
//! ```rust
//! use rfprofile_core::units::{FrequencyUnit, PhysicalQuantity};
//!
//! let fc: PhysicalQuantity<FrequencyUnit> = "98.5 MHz".parse().unwrap();
//! assert_eq!(fc.to_base_unit(), Some(98.5e6));
//!
//! let blank = PhysicalQuantity::empty(FrequencyUnit::Hz);
//! assert_eq!(blank.to_base_unit(), None);
//! ```

use crate::error::UnitError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A unit belonging to one measurement category
pub trait Unit: Copy + fmt::Debug + PartialEq + 'static {
    /// Category name used in messages ("frequency", "power", "time")
    const CATEGORY: &'static str;

    /// The base SI unit of this category (factor 1.0)
    const BASE: Self;

    /// Multiplicative factor from this unit to the base SI unit
    fn factor(self) -> f64;

    /// Canonical symbol (e.g. "MHz")
    fn symbol(self) -> &'static str;

    /// Accepted spellings when parsing, canonical symbol first
    fn aliases(self) -> &'static [&'static str];

    /// All units of the category, smallest first
    fn all() -> &'static [Self];
}

/// Frequency units (base: Hz)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FrequencyUnit {
    /// Hertz
    #[serde(rename = "Hz")]
    Hz,
    /// Kilohertz
    #[serde(rename = "kHz")]
    KHz,
    /// Megahertz
    #[serde(rename = "MHz")]
    MHz,
    /// Gigahertz
    #[serde(rename = "GHz")]
    GHz,
    /// Terahertz
    #[serde(rename = "THz")]
    THz,
}

impl Unit for FrequencyUnit {
    const CATEGORY: &'static str = "frequency";
    const BASE: Self = FrequencyUnit::Hz;

    fn factor(self) -> f64 {
        match self {
            Self::Hz => 1.0,
            Self::KHz => 1e3,
            Self::MHz => 1e6,
            Self::GHz => 1e9,
            Self::THz => 1e12,
        }
    }

    fn symbol(self) -> &'static str {
        self.aliases()[0]
    }

    fn aliases(self) -> &'static [&'static str] {
        // No millihertz unit exists here, so lowercase spellings are unambiguous
        match self {
            Self::Hz => &["Hz", "hz"],
            Self::KHz => &["kHz", "khz", "KHz"],
            Self::MHz => &["MHz", "mhz"],
            Self::GHz => &["GHz", "ghz"],
            Self::THz => &["THz", "thz"],
        }
    }

    fn all() -> &'static [Self] {
        &[Self::Hz, Self::KHz, Self::MHz, Self::GHz, Self::THz]
    }
}

/// Power units (base: W)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUnit {
    /// Milliwatt
    #[serde(rename = "mW")]
    MilliWatt,
    /// Watt
    #[serde(rename = "W")]
    Watt,
    /// Kilowatt
    #[serde(rename = "kW")]
    KiloWatt,
}

impl Unit for PowerUnit {
    const CATEGORY: &'static str = "power";
    const BASE: Self = PowerUnit::Watt;

    fn factor(self) -> f64 {
        match self {
            Self::MilliWatt => 1e-3,
            Self::Watt => 1.0,
            Self::KiloWatt => 1e3,
        }
    }

    fn symbol(self) -> &'static str {
        self.aliases()[0]
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::MilliWatt => &["mW"],
            Self::Watt => &["W", "w"],
            Self::KiloWatt => &["kW", "KW"],
        }
    }

    fn all() -> &'static [Self] {
        &[Self::MilliWatt, Self::Watt, Self::KiloWatt]
    }
}

/// Time units (base: s)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeUnit {
    /// Nanosecond
    #[serde(rename = "ns")]
    Nanosecond,
    /// Microsecond
    #[serde(rename = "µs", alias = "us")]
    Microsecond,
    /// Millisecond
    #[serde(rename = "ms")]
    Millisecond,
    /// Second
    #[serde(rename = "s")]
    Second,
}

impl Unit for TimeUnit {
    const CATEGORY: &'static str = "time";
    const BASE: Self = TimeUnit::Second;

    fn factor(self) -> f64 {
        match self {
            Self::Nanosecond => 1e-9,
            Self::Microsecond => 1e-6,
            Self::Millisecond => 1e-3,
            Self::Second => 1.0,
        }
    }

    fn symbol(self) -> &'static str {
        self.aliases()[0]
    }

    fn aliases(self) -> &'static [&'static str] {
        // Micro sign (U+00B5) and Greek mu (U+03BC) both show up in the wild
        match self {
            Self::Nanosecond => &["ns"],
            Self::Microsecond => &["µs", "μs", "us"],
            Self::Millisecond => &["ms"],
            Self::Second => &["s"],
        }
    }

    fn all() -> &'static [Self] {
        &[
            Self::Nanosecond,
            Self::Microsecond,
            Self::Millisecond,
            Self::Second,
        ]
    }
}

/// Look up a unit of category `U` by any accepted spelling
pub fn parse_unit<U: Unit>(symbol: &str) -> Result<U, UnitError> {
    let symbol = symbol.trim();
    U::all()
        .iter()
        .copied()
        .find(|unit| unit.aliases().contains(&symbol))
        .ok_or_else(|| UnitError::UnknownUnit {
            category: U::CATEGORY,
            symbol: symbol.to_string(),
        })
}

impl FromStr for FrequencyUnit {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_unit(s)
    }
}

impl FromStr for PowerUnit {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_unit(s)
    }
}

impl FromStr for TimeUnit {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_unit(s)
    }
}

impl fmt::Display for FrequencyUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl fmt::Display for PowerUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A user-entered value together with its unit.
///
/// `value == None` means "not entered yet", which is distinct from zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicalQuantity<U> {
    /// Entered value, in `unit`
    pub value: Option<f64>,
    /// Unit the value was entered in
    pub unit: U,
}

impl<U: Unit> PhysicalQuantity<U> {
    /// Create a quantity with an entered value
    pub fn new(value: f64, unit: U) -> Self {
        Self {
            value: Some(value),
            unit,
        }
    }

    /// Create a blank quantity with a preselected unit
    pub fn empty(unit: U) -> Self {
        Self { value: None, unit }
    }

    /// Value expressed in the category's base SI unit
    pub fn to_base_unit(&self) -> Option<f64> {
        to_base_unit(self)
    }

    /// Re-express this quantity in another unit of the same category
    pub fn convert_to(&self, unit: U) -> Self {
        Self {
            value: self.value.map(|v| from_base_unit(v * self.unit.factor(), unit)),
            unit,
        }
    }

    /// Whether a value has been entered
    pub fn is_entered(&self) -> bool {
        self.value.is_some()
    }
}

impl<U: Unit> Default for PhysicalQuantity<U> {
    fn default() -> Self {
        Self::empty(U::BASE)
    }
}

/// Convert a quantity to its base SI unit.
///
/// Returns `None` when no value was entered, so "not entered" propagates
/// without becoming an error here.
pub fn to_base_unit<U: Unit>(quantity: &PhysicalQuantity<U>) -> Option<f64> {
    quantity.value.map(|v| v * quantity.unit.factor())
}

/// Convert a base SI value into `unit`
pub fn from_base_unit<U: Unit>(base: f64, unit: U) -> f64 {
    base / unit.factor()
}

/// Parse `"<number><unit>"` or `"<number> <unit>"`; a bare number is taken
/// in the base unit.
fn parse_quantity<U: Unit>(s: &str) -> Result<PhysicalQuantity<U>, UnitError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(UnitError::Empty);
    }

    if let Ok(value) = s.parse::<f64>() {
        return Ok(PhysicalQuantity::new(value, U::BASE));
    }

    // Longest spelling first so "MHz" wins over "Hz"
    let mut candidates: Vec<(U, &'static str)> = U::all()
        .iter()
        .flat_map(|&unit| unit.aliases().iter().map(move |&alias| (unit, alias)))
        .collect();
    candidates.sort_by_key(|(_, alias)| std::cmp::Reverse(alias.len()));

    let mut matched_suffix = false;
    for (unit, alias) in candidates {
        if let Some(number) = s.strip_suffix(alias) {
            matched_suffix = true;
            if let Ok(value) = number.trim().parse::<f64>() {
                return Ok(PhysicalQuantity::new(value, unit));
            }
        }
    }

    if matched_suffix {
        return Err(UnitError::InvalidNumber(s.to_string()));
    }

    let symbol_start = s
        .char_indices()
        .find(|(_, c)| c.is_alphabetic() && *c != 'e' && *c != 'E')
        .map(|(i, _)| i)
        .unwrap_or(0);
    Err(UnitError::UnknownUnit {
        category: U::CATEGORY,
        symbol: s[symbol_start..].trim().to_string(),
    })
}

impl<U: Unit> FromStr for PhysicalQuantity<U> {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_quantity(s)
    }
}

impl<U: Unit> fmt::Display for PhysicalQuantity<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            Some(v) => write!(f, "{} {}", v, self.unit.symbol()),
            None => write!(f, "-- {}", self.unit.symbol()),
        }
    }
}
