use crate::error::{Error, Result};
use crate::units::catalog::{find_unit, UNITS};
use crate::units::types::Unit;

/// Number of decimal places conversions are rounded to unless configured otherwise.
pub const DEFAULT_PRECISION: u32 = 2;

/// Largest precision an `f64` can round to meaningfully.
pub const MAX_PRECISION: u32 = 15;

/// The conversion library seen by the multi-unit engine: deterministic, pure,
/// and closed over a fixed set of units.
pub trait Converter {
    /// Convert `value` expressed in `from` into `to`.
    fn convert(&self, value: f64, from: &Unit, to: &Unit) -> Result<f64>;

    /// Resolve a unit by identifier or symbol, case-insensitively.
    fn lookup(&self, id_or_symbol: &str) -> Option<&'static Unit>;
}

/// The built-in unit catalog, rounding every conversion to `precision` decimals.
#[derive(Debug, Clone, Copy)]
pub struct UnitCatalog {
    precision: u32,
}

impl UnitCatalog {
    pub fn new() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
        }
    }

    /// Precision is capped at [`MAX_PRECISION`].
    pub fn with_precision(precision: u32) -> Self {
        Self {
            precision: precision.min(MAX_PRECISION),
        }
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    pub fn units(&self) -> &'static [Unit] {
        UNITS
    }

    fn round(&self, value: f64) -> f64 {
        let scale = 10f64.powi(self.precision as i32);
        let rounded = (value * scale).round() / scale;
        // Collapse -0.0 so cached values compare and serialize cleanly
        if rounded == 0.0 {
            0.0
        } else {
            rounded
        }
    }
}

impl Default for UnitCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Converter for UnitCatalog {
    fn convert(&self, value: f64, from: &Unit, to: &Unit) -> Result<f64> {
        if from.dimension != to.dimension {
            return Err(Error::IncompatibleUnits {
                from: from.id.to_string(),
                from_dimension: from.dimension.to_string(),
                to: to.id.to_string(),
                to_dimension: to.dimension.to_string(),
            });
        }

        if from == to {
            return Ok(value);
        }

        // Rounding scales the value up first, so it can overflow on its own
        let converted = self.round(to.scale.from_reference(from.scale.to_reference(value)));
        if !converted.is_finite() {
            return Err(Error::NonFiniteResult {
                value,
                from: from.id.to_string(),
                to: to.id.to_string(),
            });
        }

        Ok(converted)
    }

    fn lookup(&self, id_or_symbol: &str) -> Option<&'static Unit> {
        find_unit(id_or_symbol)
    }
}

/// Convert between two units named by identifier or symbol.
pub fn convert_by_name(
    converter: &dyn Converter,
    value: f64,
    from: &str,
    to: &str,
) -> Result<f64> {
    let from_unit = converter
        .lookup(from)
        .ok_or_else(|| Error::UnknownUnit(from.to_string()))?;
    let to_unit = converter
        .lookup(to)
        .ok_or_else(|| Error::UnknownUnit(to.to_string()))?;
    converter.convert(value, from_unit, to_unit)
}
