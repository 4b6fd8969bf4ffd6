use crate::engine::cache::{self, ConversionCache};
use crate::engine::change::resolve_write;
use crate::engine::columns::{
    base_value, cache_value, forget_unit_input, load_cache, number_value, pending_unit_input,
};
use crate::error::Result;
use crate::model::{FieldConfig, RecordType};
use crate::record::Attributes;
use crate::units::Converter;
use serde_json::Value;
use std::collections::BTreeSet;

/// Pending column writes for one field, computed before anything is applied.
struct FieldUpdate<'f> {
    field: &'f FieldConfig,
    base_value: Option<f64>,
    cache: Option<ConversionCache>,
    real_change: bool,
    write_cache: bool,
}

/// Pre-persist hook for a record that is about to be inserted.
///
/// Every multi-unit field holding a value gets a full cache built from that value,
/// read in its pending input unit or else the default unit, and its base value
/// normalized through the change-detection engine. Unit-input pseudo attributes
/// are dropped.
pub fn before_create<R: Attributes + ?Sized>(
    record_type: &RecordType,
    record: &mut R,
    converter: &dyn Converter,
) -> Result<()> {
    let mut updates = Vec::new();

    for field in record_type.fields() {
        let value = match base_value(record, field)? {
            Some(v) => v,
            None => continue,
        };
        let unit = pending_unit_input(record_type, record, field)?.unwrap_or(field.default_unit());

        let fresh = cache::build_from(field, Some(value), unit, converter)?;
        let resolution = resolve_write(field, value, unit, fresh.as_ref(), converter)?;
        updates.push(FieldUpdate {
            field,
            base_value: Some(resolution.base_value),
            cache: fresh,
            real_change: true,
            write_cache: true,
        });
    }

    apply(record_type, record, updates)?;
    for field in record_type.fields() {
        forget_unit_input(record_type, record, field);
    }
    Ok(())
}

/// Pre-persist hook for an existing record. Only fields in `dirty` are processed;
/// each is re-checked against its persisted cache, which is rebuilt on a real change
/// or when it no longer covers every supported unit.
pub fn before_update<R: Attributes + ?Sized>(
    record_type: &RecordType,
    record: &mut R,
    dirty: &BTreeSet<String>,
    converter: &dyn Converter,
) -> Result<()> {
    let mut updates = Vec::new();

    for field in record_type.fields() {
        if !dirty.contains(field.name()) {
            continue;
        }

        let value = match base_value(record, field)? {
            Some(v) => v,
            None => {
                updates.push(FieldUpdate {
                    field,
                    base_value: None,
                    cache: None,
                    real_change: true,
                    write_cache: true,
                });
                continue;
            }
        };
        let unit = pending_unit_input(record_type, record, field)?.unwrap_or(field.default_unit());
        let existing = load_cache(record_type, record, field);

        let resolution = resolve_write(field, value, unit, existing.as_ref(), converter)?;
        let complete = existing
            .as_ref()
            .is_some_and(|c| c.is_complete_for(field));
        let write_cache = resolution.real_change || !complete;
        let cache = if write_cache {
            cache::build(field, Some(resolution.base_value), converter)?
        } else {
            existing
        };
        updates.push(FieldUpdate {
            field,
            base_value: Some(resolution.base_value),
            cache,
            real_change: resolution.real_change,
            write_cache,
        });
    }

    apply(record_type, record, updates)?;
    for field in record_type.fields() {
        forget_unit_input(record_type, record, field);
    }
    Ok(())
}

fn apply<R: Attributes + ?Sized>(
    record_type: &RecordType,
    record: &mut R,
    updates: Vec<FieldUpdate<'_>>,
) -> Result<()> {
    // Encode everything up front so a failure leaves the record untouched
    let encoded = updates
        .iter()
        .map(|u| cache_value(u.cache.as_ref()))
        .collect::<Result<Vec<_>>>()?;

    for (update, cache_blob) in updates.into_iter().zip(encoded) {
        let name = update.field.name();
        let base = update.base_value.map(number_value).unwrap_or(Value::Null);
        record.set_attribute(name, base);

        if !update.real_change {
            log::debug!("{}: unchanged quantity", name);
            record.sync_original(name);
        }
        if update.write_cache {
            log::debug!("{}: rebuilt conversion cache", name);
            record.set_attribute(&record_type.cache_column(update.field), cache_blob);
        }
    }
    Ok(())
}
