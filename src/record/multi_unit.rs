use crate::engine::columns::{
    base_value, forget_unit_input, load_cache, number_attribute, number_value, pending_unit_input,
};
use crate::engine::{self, ConversionCache, SelectedUnits};
use crate::error::{Error, Result};
use crate::model::{FieldConfig, RecordType};
use crate::record::{Attributes, Record};
use crate::units::{parse_quantity, Converter, Unit};
use serde_json::{Map, Value};

/// A host record bound to its record type, exposing multi-unit fields in any
/// supported unit. Selected units live here and are never persisted.
pub struct MultiUnitRecord<'a, R: Attributes = Record> {
    record_type: &'a RecordType,
    converter: &'a dyn Converter,
    record: R,
    selected: SelectedUnits,
}

impl<'a, R: Attributes> MultiUnitRecord<'a, R> {
    pub fn new(record_type: &'a RecordType, converter: &'a dyn Converter, record: R) -> Self {
        Self {
            record_type,
            converter,
            record,
            selected: SelectedUnits::new(),
        }
    }

    /// Start with the given `field -> unit` selections applied.
    pub fn with_selected_units<'s, I>(mut self, selections: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'s str, &'s str)>,
    {
        self.selected.select_all(self.record_type, selections)?;
        Ok(self)
    }

    pub fn record_type(&self) -> &RecordType {
        self.record_type
    }

    pub fn record(&self) -> &R {
        &self.record
    }

    pub fn record_mut(&mut self) -> &mut R {
        &mut self.record
    }

    pub fn into_inner(self) -> R {
        self.record
    }

    pub fn is_multi_unit_field(&self, field: &str) -> bool {
        self.record_type.is_multi_unit_field(field)
    }

    pub fn default_unit(&self, field: &str) -> Result<&'static Unit> {
        Ok(self.record_type.field(field)?.default_unit())
    }

    pub fn supported_units(&self, field: &str) -> Result<&[&'static Unit]> {
        Ok(self.record_type.field(field)?.supported_units())
    }

    pub fn selected_unit(&self, field: &str) -> Result<&'static Unit> {
        Ok(self.selected.current(self.record_type.field(field)?))
    }

    /// Switch the unit `field` is read and written in. Never touches stored values.
    pub fn select_unit(&mut self, field: &str, id_or_symbol: &str) -> Result<&'static Unit> {
        let config = self.record_type.field(field)?;
        self.selected.select(config, id_or_symbol)
    }

    /// Read `field` in its selected unit.
    pub fn get(&self, field: &str) -> Result<Option<f64>> {
        self.read(field, None)
    }

    /// Read `field` in an explicit unit, by id or symbol.
    pub fn get_in(&self, field: &str, id_or_symbol: &str) -> Result<Option<f64>> {
        self.read(field, Some(id_or_symbol))
    }

    fn read(&self, field: &str, requested: Option<&str>) -> Result<Option<f64>> {
        let config = self.record_type.field(field)?;
        let target = engine::target_unit(config, requested, &self.selected)?;
        let base = base_value(&self.record, config)?;
        let cache = load_cache(self.record_type, &self.record, config);
        engine::read_value(config, base, cache.as_ref(), target, self.converter)
    }

    /// The persisted conversion cache of `field`, if present and well formed.
    pub fn cache(&self, field: &str) -> Result<Option<ConversionCache>> {
        let config = self.record_type.field(field)?;
        Ok(load_cache(self.record_type, &self.record, config))
    }

    /// Write `field` in the pending input unit, or else the selected unit.
    pub fn set(&mut self, field: &str, value: Option<f64>) -> Result<()> {
        let config = self.record_type.field(field)?;
        let unit = match pending_unit_input(self.record_type, &self.record, config)? {
            Some(unit) => unit,
            None => self.selected.current(config),
        };
        self.write(config, value, unit)
    }

    /// Write `field` with a one-shot input unit. The selected unit is unaffected.
    pub fn set_in(&mut self, field: &str, value: Option<f64>, id_or_symbol: &str) -> Result<()> {
        let config = self.record_type.field(field)?;
        let unit = config.resolve_unit(id_or_symbol)?;
        self.write(config, value, unit)
    }

    /// Stage a one-shot input unit through the `<field><unit_input_suffix>` pseudo attribute.
    pub fn set_unit_input(&mut self, field: &str, id_or_symbol: &str) -> Result<()> {
        let config = self.record_type.field(field)?;
        if !config.accepts_unit_input() {
            return Err(Error::InvalidConfig(format!(
                "field '{}' does not accept an input unit",
                field
            )));
        }
        let unit = config.resolve_unit(id_or_symbol)?;
        let column = self.record_type.unit_input_column(config);
        self.record.set_attribute(&column, Value::String(unit.id.to_string()));
        Ok(())
    }

    fn write(&mut self, config: &FieldConfig, value: Option<f64>, unit: &Unit) -> Result<()> {
        match value {
            Some(value) => {
                let existing = load_cache(self.record_type, &self.record, config);
                let resolution =
                    engine::resolve_write(config, value, unit, existing.as_ref(), self.converter)?;
                self.record
                    .set_attribute(config.name(), number_value(resolution.base_value));
                if !resolution.real_change {
                    self.record.sync_original(config.name());
                }
            }
            None => self.record.set_attribute(config.name(), Value::Null),
        }

        forget_unit_input(self.record_type, &mut self.record, config);
        Ok(())
    }

    /// Mass assignment. Unit-input pseudo attributes are applied before any field
    /// value; a string such as "10 mi" on a multi-unit field is written in that unit.
    pub fn fill(&mut self, attributes: Map<String, Value>) -> Result<()> {
        let mut values = Vec::new();

        for (key, value) in attributes {
            if let Some(config) = self.record_type.field_for_unit_input(&key) {
                let field = config.name().to_string();
                match value {
                    Value::String(unit) => self.set_unit_input(&field, &unit)?,
                    Value::Null => {}
                    other => return Err(Error::unsupported_unit(&field, &other.to_string())),
                }
            } else {
                values.push((key, value));
            }
        }

        for (key, value) in values {
            if self.record_type.cache_columns().contains(&key) {
                log::warn!("ignoring assignment to derived column '{}'", key);
                continue;
            }

            let config = match self.record_type.field(&key) {
                Ok(config) => config,
                Err(_) => {
                    self.record.set_attribute(&key, value);
                    continue;
                }
            };

            if let Value::String(s) = &value {
                if let Some(quantity) = parse_quantity(s) {
                    self.set_in(&key, Some(quantity.value), &quantity.unit)?;
                    continue;
                }
            }
            let number = number_attribute(config, Some(&value))?;
            self.set(&key, number)?;
        }

        Ok(())
    }

    /// Attributes as exposed to callers: cache columns hidden, multi-unit fields
    /// expressed in their selected unit.
    pub fn visible_attributes(&self) -> Result<Map<String, Value>> {
        let hidden = self.record_type.hidden_columns();
        let pseudo = self.record_type.unit_input_columns();
        let mut visible = Map::new();

        for key in self.record.attribute_names() {
            if hidden.contains(&key) || pseudo.contains(&key) {
                continue;
            }
            let value = if self.record_type.is_multi_unit_field(&key) {
                self.get(&key)?.map(number_value).unwrap_or(Value::Null)
            } else {
                self.record.attribute(&key).cloned().unwrap_or(Value::Null)
            };
            visible.insert(key, value);
        }

        Ok(visible)
    }

    pub fn is_dirty(&self, field: &str) -> bool {
        self.record.is_dirty(field)
    }

    /// Run the pre-insert hook.
    pub fn before_create(&mut self) -> Result<()> {
        engine::before_create(self.record_type, &mut self.record, self.converter)
    }

    /// Run the pre-update hook over the record's currently dirty attributes.
    pub fn before_update(&mut self) -> Result<()> {
        let dirty = self.record.dirty_keys();
        engine::before_update(self.record_type, &mut self.record, &dirty, self.converter)
    }
}
