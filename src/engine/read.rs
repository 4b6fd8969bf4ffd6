use crate::engine::cache::ConversionCache;
use crate::engine::selection::SelectedUnits;
use crate::error::Result;
use crate::model::FieldConfig;
use crate::units::{Converter, Unit};

/// Pick the unit a read is expressed in: explicit request, then selection, then default.
pub fn target_unit(
    field: &FieldConfig,
    requested: Option<&str>,
    selected: &SelectedUnits,
) -> Result<&'static Unit> {
    match requested {
        Some(id_or_symbol) => field.resolve_unit(id_or_symbol),
        None => Ok(selected.current(field)),
    }
}

/// Read `field` in `target`. Cached values are returned verbatim; without a
/// cache entry the base value is converted on the fly.
///
/// A cache is only trusted while its default-unit entry equals the base value.
/// After an unsaved real change the persisted cache describes the old value.
pub fn read_value(
    field: &FieldConfig,
    base_value: Option<f64>,
    cache: Option<&ConversionCache>,
    target: &Unit,
    converter: &dyn Converter,
) -> Result<Option<f64>> {
    let base_value = match base_value {
        Some(v) => v,
        None => return Ok(None),
    };

    let trusted = cache.filter(|c| c.value_for(field, field.default_unit()) == Some(base_value));
    if let Some(cached) = trusted.and_then(|c| c.value_for(field, target)) {
        return Ok(Some(cached));
    }

    let value = converter.convert(base_value, field.default_unit(), target)?;
    Ok(Some(value))
}
