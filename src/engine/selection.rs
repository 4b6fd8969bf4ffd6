use crate::error::Result;
use crate::model::{FieldConfig, RecordType};
use crate::units::Unit;
use std::collections::HashMap;

/// Instance-local choice of the unit each field is read and written in.
/// Never persisted; unset fields fall back to their default unit.
#[derive(Debug, Clone, Default)]
pub struct SelectedUnits {
    selected: HashMap<String, &'static Unit>,
}

impl SelectedUnits {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select `id_or_symbol` for `field`. Fails without changing state if unsupported.
    pub fn select(&mut self, field: &FieldConfig, id_or_symbol: &str) -> Result<&'static Unit> {
        let unit = field.resolve_unit(id_or_symbol)?;
        self.selected.insert(field.name().to_string(), unit);
        Ok(unit)
    }

    pub fn current(&self, field: &FieldConfig) -> &'static Unit {
        self.selected
            .get(field.name())
            .copied()
            .unwrap_or_else(|| field.default_unit())
    }

    pub fn reset(&mut self, field: &FieldConfig) {
        self.selected.remove(field.name());
    }

    /// Apply a batch of `field -> unit` selections; nothing changes unless all resolve.
    pub fn select_all<'a, I>(&mut self, record_type: &RecordType, selections: I) -> Result<()>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut resolved = Vec::new();
        for (field, unit) in selections {
            let config = record_type.field(field)?;
            resolved.push((config.name().to_string(), config.resolve_unit(unit)?));
        }
        self.selected.extend(resolved);
        Ok(())
    }
}
