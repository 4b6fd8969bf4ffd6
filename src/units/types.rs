use serde::Serialize;
use std::fmt;

/// Physical dimension a unit measures. Units only convert within a dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Length,
    Mass,
    Temperature,
    FuelEconomy,
    Pressure,
    Volume,
    Speed,
}

impl Dimension {
    pub const ALL: [Dimension; 7] = [
        Dimension::Length,
        Dimension::Mass,
        Dimension::Temperature,
        Dimension::FuelEconomy,
        Dimension::Pressure,
        Dimension::Volume,
        Dimension::Speed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Length => "length",
            Dimension::Mass => "mass",
            Dimension::Temperature => "temperature",
            Dimension::FuelEconomy => "fuel_economy",
            Dimension::Pressure => "pressure",
            Dimension::Volume => "volume",
            Dimension::Speed => "speed",
        }
    }

    pub fn parse(name: &str) -> Option<Dimension> {
        let name = name.trim().to_lowercase().replace(['-', ' '], "_");
        Dimension::ALL.into_iter().find(|d| d.as_str() == name)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a unit maps onto the reference unit of its dimension.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Scale {
    /// reference = value * factor
    Linear(f64),
    /// reference = value * factor + offset
    Affine { factor: f64, offset: f64 },
    /// reference = k / value
    Reciprocal(f64),
}

impl Scale {
    pub(crate) fn to_reference(self, value: f64) -> f64 {
        match self {
            Scale::Linear(factor) => value * factor,
            Scale::Affine { factor, offset } => value * factor + offset,
            Scale::Reciprocal(k) => k / value,
        }
    }

    pub(crate) fn from_reference(self, value: f64) -> f64 {
        match self {
            Scale::Linear(factor) => value / factor,
            Scale::Affine { factor, offset } => (value - offset) / factor,
            Scale::Reciprocal(k) => k / value,
        }
    }
}

/// Immutable unit descriptor: a stable identifier plus display metadata.
#[derive(Debug, Clone, Copy)]
pub struct Unit {
    /// Stable identifier used as cache key and in configuration (e.g. "km", "mpg")
    pub id: &'static str,
    /// Human-facing symbol (e.g. "km", "L/100 km")
    pub symbol: &'static str,
    pub name: &'static str,
    pub dimension: Dimension,
    pub(crate) scale: Scale,
}

impl Unit {
    /// Case-insensitive match against the identifier or the symbol.
    pub fn matches(&self, id_or_symbol: &str) -> bool {
        let needle = id_or_symbol.trim();
        self.id.eq_ignore_ascii_case(needle) || self.symbol.eq_ignore_ascii_case(needle)
    }
}

impl PartialEq for Unit {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.dimension == other.dimension
    }
}

impl Eq for Unit {}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id)
    }
}

impl Serialize for Unit {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("Unit", 4)?;
        state.serialize_field("id", self.id)?;
        state.serialize_field("symbol", self.symbol)?;
        state.serialize_field("name", self.name)?;
        state.serialize_field("dimension", &self.dimension)?;
        state.end()
    }
}

/// A number paired with the unit token it was written in, e.g. "10 mi".
#[derive(Debug, Clone, PartialEq)]
pub struct Quantity {
    pub value: f64,
    pub unit: String,
}
