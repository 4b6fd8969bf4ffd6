// Reading and writing the persisted shape of a multi-unit field on a host record:
// the base column, the cache column and the unit-input pseudo attribute.

use crate::engine::cache::ConversionCache;
use crate::error::{Error, Result};
use crate::model::{FieldConfig, RecordType};
use crate::record::Attributes;
use crate::units::Unit;
use serde_json::Value;

/// Current base value of `field`. Numeric strings are accepted as numbers.
pub fn base_value<R: Attributes + ?Sized>(record: &R, field: &FieldConfig) -> Result<Option<f64>> {
    number_attribute(field, record.attribute(field.name()))
}

pub(crate) fn number_attribute(field: &FieldConfig, value: Option<&Value>) -> Result<Option<f64>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n.as_f64().map(Some).ok_or_else(|| Error::NotANumber {
            field: field.name().to_string(),
            found: n.to_string(),
        }),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| Error::NotANumber {
                field: field.name().to_string(),
                found: format!("{:?}", s),
            }),
        Some(other) => Err(Error::NotANumber {
            field: field.name().to_string(),
            found: other.to_string(),
        }),
    }
}

pub fn number_value(value: f64) -> Value {
    Value::from(value)
}

/// The persisted cache of `field`, if one is present and decodes.
/// A malformed cache is logged and treated as absent.
pub fn load_cache<R: Attributes + ?Sized>(
    record_type: &RecordType,
    record: &R,
    field: &FieldConfig,
) -> Option<ConversionCache> {
    let column = record_type.cache_column(field);
    let decoded = match record.attribute(&column) {
        None | Some(Value::Null) => return None,
        Some(Value::String(blob)) if blob.trim().is_empty() => return None,
        Some(Value::String(blob)) => ConversionCache::decode(field, blob),
        Some(other) => Err(Error::MalformedCache {
            field: field.name().to_string(),
            reason: format!("expected text, found {}", other),
        }),
    };

    match decoded {
        Ok(cache) => Some(cache),
        Err(e) => {
            log::warn!("{}; falling back to live conversion", e);
            None
        }
    }
}

pub fn cache_value(cache: Option<&ConversionCache>) -> Result<Value> {
    match cache {
        Some(cache) => Ok(Value::String(cache.encode()?)),
        None => Ok(Value::Null),
    }
}

/// The one-shot input unit pending for `field`, if the field accepts one.
pub fn pending_unit_input<R: Attributes + ?Sized>(
    record_type: &RecordType,
    record: &R,
    field: &FieldConfig,
) -> Result<Option<&'static Unit>> {
    if !field.accepts_unit_input() {
        return Ok(None);
    }

    match record.attribute(&record_type.unit_input_column(field)) {
        Some(Value::String(unit)) => field.resolve_unit(unit).map(Some),
        None | Some(Value::Null) => Ok(None),
        Some(other) => Err(Error::unsupported_unit(field.name(), &other.to_string())),
    }
}

/// Drop the unit-input pseudo attribute of `field` so it never reaches storage.
/// Fields that take no input unit leave a same-named attribute alone.
pub fn forget_unit_input<R: Attributes + ?Sized>(
    record_type: &RecordType,
    record: &mut R,
    field: &FieldConfig,
) {
    if !field.accepts_unit_input() {
        return;
    }
    let column = record_type.unit_input_column(field);
    if record.remove_attribute(&column).is_some() {
        record.sync_original(&column);
    }
}
