use crate::engine::cache::ConversionCache;
use crate::error::{Error, Result};
use crate::model::FieldConfig;
use crate::units::{Converter, Unit};

/// Outcome of resolving one write to a multi-unit field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WriteResolution {
    /// Value to store in the base column, in the field's default unit
    pub base_value: f64,
    /// False when the write re-expressed the cached quantity in another unit
    pub real_change: bool,
}

/// Decide what base-unit value a write of `value` expressed in `unit` stores,
/// and whether it is a real change against the `existing` cache.
///
/// A value equal to the cached entry for `unit` is the same quantity re-expressed:
/// the cached base value is kept verbatim instead of being re-derived through a
/// lossy round trip. Equality is checked against the cache, never a fresh conversion.
pub fn resolve_write(
    field: &FieldConfig,
    value: f64,
    unit: &Unit,
    existing: Option<&ConversionCache>,
    converter: &dyn Converter,
) -> Result<WriteResolution> {
    if !value.is_finite() {
        return Err(Error::NonFiniteValue {
            field: field.name().to_string(),
            value,
        });
    }

    let default_unit = field.default_unit();

    if let Some(cache) = existing {
        let cached_at_unit = cache.value_for(field, unit);
        let cached_base = cache.value_for(field, default_unit);

        if let (Some(cached), Some(base_value)) = (cached_at_unit, cached_base) {
            if cached == value {
                log::debug!(
                    "{}: {} {} matches the cached value, keeping base {} {}",
                    field.name(),
                    value,
                    unit.id,
                    base_value,
                    default_unit.id
                );
                return Ok(WriteResolution {
                    base_value,
                    real_change: false,
                });
            }
        }
    }

    let base_value = converter.convert(value, unit, default_unit)?;
    log::debug!(
        "{}: {} {} is a new value, storing {} {}",
        field.name(),
        value,
        unit.id,
        base_value,
        default_unit.id
    );
    Ok(WriteResolution {
        base_value,
        real_change: true,
    })
}
