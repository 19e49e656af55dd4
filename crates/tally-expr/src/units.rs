//! Unit table and unit-aware arithmetic
//!
//! Only the dimensions a note-taking ledger needs are modelled: length, mass
//! and area. Every unit carries a factor to its dimension's base unit
//! (metre, kilogram, square metre).

use crate::error::{ExprError, ExprResult};
use ahash::AHashMap;
use once_cell::sync::Lazy;

/// Physical dimension of a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Length,
    Mass,
    Area,
}

/// A unit definition
#[derive(Debug)]
pub struct UnitDef {
    /// Canonical name, used when a value is displayed
    pub name: &'static str,
    /// Accepted spellings besides `name`
    pub aliases: &'static [&'static str],
    pub dimension: Dimension,
    /// Multiplier to the base unit of `dimension`
    pub factor: f64,
    /// For length units, the matching area unit
    pub square: Option<&'static str>,
}

/// Keywords the parser treats as conversion operators
pub const CONVERSION_KEYWORDS: &[&str] = &["in", "to"];

static UNITS: &[UnitDef] = &[
    // Length
    UnitDef { name: "mm", aliases: &["millimeter", "millimeters"], dimension: Dimension::Length, factor: 0.001, square: Some("mm2") },
    UnitDef { name: "cm", aliases: &["centimeter", "centimeters"], dimension: Dimension::Length, factor: 0.01, square: Some("cm2") },
    UnitDef { name: "m", aliases: &["meter", "meters", "metre", "metres"], dimension: Dimension::Length, factor: 1.0, square: Some("m2") },
    UnitDef { name: "km", aliases: &["kilometer", "kilometers"], dimension: Dimension::Length, factor: 1000.0, square: Some("km2") },
    UnitDef { name: "inch", aliases: &["inches"], dimension: Dimension::Length, factor: 0.0254, square: Some("sqin") },
    UnitDef { name: "ft", aliases: &["foot", "feet"], dimension: Dimension::Length, factor: 0.3048, square: Some("sqft") },
    UnitDef { name: "yd", aliases: &["yard", "yards"], dimension: Dimension::Length, factor: 0.9144, square: Some("sqyd") },
    UnitDef { name: "mi", aliases: &["mile", "miles"], dimension: Dimension::Length, factor: 1609.344, square: Some("sqmi") },
    // Mass
    UnitDef { name: "mg", aliases: &["milligram", "milligrams"], dimension: Dimension::Mass, factor: 1e-6, square: None },
    UnitDef { name: "g", aliases: &["gram", "grams"], dimension: Dimension::Mass, factor: 0.001, square: None },
    UnitDef { name: "kg", aliases: &["kilogram", "kilograms"], dimension: Dimension::Mass, factor: 1.0, square: None },
    UnitDef { name: "tonne", aliases: &["tonnes"], dimension: Dimension::Mass, factor: 1000.0, square: None },
    UnitDef { name: "lb", aliases: &["lbs", "pound", "pounds"], dimension: Dimension::Mass, factor: 0.453_592_37, square: None },
    UnitDef { name: "oz", aliases: &["ounce", "ounces"], dimension: Dimension::Mass, factor: 0.028_349_523_125, square: None },
    // Area
    UnitDef { name: "mm2", aliases: &[], dimension: Dimension::Area, factor: 1e-6, square: None },
    UnitDef { name: "cm2", aliases: &[], dimension: Dimension::Area, factor: 1e-4, square: None },
    UnitDef { name: "m2", aliases: &["sqm"], dimension: Dimension::Area, factor: 1.0, square: None },
    UnitDef { name: "km2", aliases: &[], dimension: Dimension::Area, factor: 1e6, square: None },
    UnitDef { name: "sqin", aliases: &["in2"], dimension: Dimension::Area, factor: 0.000_645_16, square: None },
    UnitDef { name: "sqft", aliases: &["ft2"], dimension: Dimension::Area, factor: 0.092_903_04, square: None },
    UnitDef { name: "sqyd", aliases: &["yd2"], dimension: Dimension::Area, factor: 0.836_127_36, square: None },
    UnitDef { name: "sqmi", aliases: &["mi2"], dimension: Dimension::Area, factor: 2_589_988.110_336, square: None },
    UnitDef { name: "acre", aliases: &["acres"], dimension: Dimension::Area, factor: 4_046.856_422_4, square: None },
    UnitDef { name: "hectare", aliases: &["hectares", "ha"], dimension: Dimension::Area, factor: 10_000.0, square: None },
];

static UNIT_INDEX: Lazy<AHashMap<&'static str, &'static UnitDef>> = Lazy::new(|| {
    let mut index = AHashMap::new();
    for unit in UNITS {
        index.insert(unit.name, unit);
        for alias in unit.aliases {
            index.insert(*alias, unit);
        }
    }
    index
});

/// Look up a unit by name or alias (case-sensitive, `M` and `m` differ)
pub fn lookup(name: &str) -> Option<&'static UnitDef> {
    UNIT_INDEX.get(name).copied()
}

/// Whether `name` is a unit spelling
pub fn is_unit(name: &str) -> bool {
    UNIT_INDEX.contains_key(name)
}

/// Every token the unit system gives meaning to: unit spellings plus the
/// conversion keywords
pub fn unit_tokens() -> impl Iterator<Item = &'static str> {
    UNIT_INDEX
        .keys()
        .copied()
        .chain(CONVERSION_KEYWORDS.iter().copied())
}

pub(crate) fn resolve(name: &str) -> ExprResult<&'static UnitDef> {
    lookup(name).ok_or_else(|| ExprError::UnitMismatch(format!("Unknown unit {}", name)))
}

/// Convert `amount` expressed in `from` into `to`
pub fn convert(amount: f64, from: &str, to: &str) -> ExprResult<f64> {
    let from = resolve(from)?;
    let to = resolve(to)?;
    if from.dimension != to.dimension {
        return Err(ExprError::UnitMismatch(format!(
            "Cannot convert {} to {}",
            from.name, to.name
        )));
    }
    Ok(amount * from.factor / to.factor)
}

/// Base unit for a dimension
pub(crate) fn base_unit(dimension: Dimension) -> &'static str {
    match dimension {
        Dimension::Length => "m",
        Dimension::Mass => "kg",
        Dimension::Area => "m2",
    }
}
