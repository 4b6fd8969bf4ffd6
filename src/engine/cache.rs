use crate::error::{Error, Result};
use crate::model::FieldConfig;
use crate::units::{Converter, Unit};
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Derived mapping from every supported unit of a field to the field's value in that unit.
///
/// Entries keep the order the field declares its supported units in.
/// Keys are unit ids or symbols, depending on the field's `CacheKey`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConversionCache {
    entries: Vec<(String, f64)>,
}

impl ConversionCache {
    pub fn get(&self, key: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| *value)
    }

    /// Value cached for `unit` under the field's keying scheme.
    pub fn value_for(&self, field: &FieldConfig, unit: &Unit) -> Option<f64> {
        self.get(field.cache_key_for(unit))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Does this cache cover exactly the field's supported units?
    pub fn is_complete_for(&self, field: &FieldConfig) -> bool {
        self.entries.len() == field.supported_units().len()
            && field
                .supported_units()
                .iter()
                .all(|u| self.value_for(field, u).is_some())
    }

    fn insert(&mut self, key: String, value: f64) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Serialize to the persisted text representation.
    pub fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse the persisted text representation of `field`'s cache.
    pub fn decode(field: &FieldConfig, blob: &str) -> Result<Self> {
        serde_json::from_str(blob).map_err(|e| Error::MalformedCache {
            field: field.name().to_string(),
            reason: e.to_string(),
        })
    }
}

impl Serialize for ConversionCache {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

struct CacheVisitor;

impl<'de> Visitor<'de> for CacheVisitor {
    type Value = ConversionCache;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of unit to numeric value")
    }

    fn visit_map<A>(self, mut access: A) -> std::result::Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut cache = ConversionCache::default();
        while let Some((key, value)) = access.next_entry::<String, f64>()? {
            if !value.is_finite() {
                return Err(serde::de::Error::custom(format!(
                    "non-finite value for '{}'",
                    key
                )));
            }
            cache.insert(key, value);
        }
        Ok(cache)
    }
}

impl<'de> Deserialize<'de> for ConversionCache {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(CacheVisitor)
    }
}

/// Build a fresh cache covering every supported unit of `field` from a base-unit value.
/// An unset base value produces no cache.
pub fn build(
    field: &FieldConfig,
    base_value: Option<f64>,
    converter: &dyn Converter,
) -> Result<Option<ConversionCache>> {
    build_from(field, base_value, field.default_unit(), converter)
}

/// Like [`build`], with the source value expressed in `unit` rather than the default unit.
pub fn build_from(
    field: &FieldConfig,
    value: Option<f64>,
    unit: &Unit,
    converter: &dyn Converter,
) -> Result<Option<ConversionCache>> {
    let value = match value {
        Some(v) => v,
        None => return Ok(None),
    };

    let mut cache = ConversionCache::default();
    for target in field.supported_units() {
        let converted = converter.convert(value, unit, target)?;
        cache.insert(field.cache_key_for(target).to_string(), converted);
    }
    Ok(Some(cache))
}
