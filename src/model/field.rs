use crate::error::{Error, Result};
use crate::units::Unit;
use serde::{Deserialize, Serialize};

/// Which unit attribute keys the persisted conversion cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheKey {
    #[default]
    Id,
    Symbol,
}

impl CacheKey {
    pub fn key_for(&self, unit: &Unit) -> &'static str {
        match self {
            CacheKey::Id => unit.id,
            CacheKey::Symbol => unit.symbol,
        }
    }
}

/// Static declaration of one multi-unit field. Immutable once built.
#[derive(Debug, Clone)]
pub struct FieldConfig {
    name: String,
    default_unit: &'static Unit,
    supported_units: Vec<&'static Unit>,
    cache_key: CacheKey,
    accepts_unit_input: bool,
}

impl FieldConfig {
    pub fn new(
        name: impl Into<String>,
        default_unit: &'static Unit,
        supported_units: Vec<&'static Unit>,
    ) -> Result<Self> {
        let name = name.into();

        if name.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "multi-unit field name must not be empty".to_string(),
            ));
        }

        if !supported_units.contains(&default_unit) {
            return Err(Error::InvalidConfig(format!(
                "field '{}': default unit '{}' must be one of its supported units",
                name, default_unit.id
            )));
        }

        for (i, unit) in supported_units.iter().enumerate() {
            if unit.dimension != default_unit.dimension {
                return Err(Error::InvalidConfig(format!(
                    "field '{}': unit '{}' measures {} but the default unit measures {}",
                    name, unit.id, unit.dimension, default_unit.dimension
                )));
            }
            if supported_units[..i].contains(unit) {
                return Err(Error::InvalidConfig(format!(
                    "field '{}': unit '{}' is listed twice",
                    name, unit.id
                )));
            }
        }

        Ok(Self {
            name,
            default_unit,
            supported_units,
            cache_key: CacheKey::default(),
            accepts_unit_input: true,
        })
    }

    pub fn with_cache_key(mut self, cache_key: CacheKey) -> Self {
        self.cache_key = cache_key;
        self
    }

    pub fn with_unit_input(mut self, accepts_unit_input: bool) -> Self {
        self.accepts_unit_input = accepts_unit_input;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default_unit(&self) -> &'static Unit {
        self.default_unit
    }

    pub fn supported_units(&self) -> &[&'static Unit] {
        &self.supported_units
    }

    pub fn cache_key(&self) -> CacheKey {
        self.cache_key
    }

    pub fn accepts_unit_input(&self) -> bool {
        self.accepts_unit_input
    }

    /// Resolve a unit id or symbol (case-insensitive) against the supported units.
    pub fn resolve_unit(&self, id_or_symbol: &str) -> Result<&'static Unit> {
        self.supported_units
            .iter()
            .copied()
            .find(|u| u.matches(id_or_symbol))
            .ok_or_else(|| Error::unsupported_unit(&self.name, id_or_symbol))
    }

    /// Validation predicate: is `value` one of the supported units, by id or symbol.
    pub fn supports(&self, value: &str) -> bool {
        self.supported_units.iter().any(|u| u.matches(value))
    }

    /// The key `unit` is stored under in this field's conversion cache.
    pub fn cache_key_for(&self, unit: &Unit) -> &'static str {
        self.cache_key.key_for(unit)
    }
}

/// Suffixes used to derive the cache column and the unit-input pseudo attribute.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ColumnNaming {
    #[serde(default = "default_cache_suffix")]
    pub cache_suffix: String,
    #[serde(default = "default_unit_input_suffix")]
    pub unit_input_suffix: String,
}

fn default_cache_suffix() -> String {
    "_cache".to_string()
}

fn default_unit_input_suffix() -> String {
    "_unit_input".to_string()
}

impl Default for ColumnNaming {
    fn default() -> Self {
        Self {
            cache_suffix: default_cache_suffix(),
            unit_input_suffix: default_unit_input_suffix(),
        }
    }
}

impl ColumnNaming {
    pub fn cache_column(&self, field: &str) -> String {
        format!("{}{}", field, self.cache_suffix)
    }

    pub fn unit_input_column(&self, field: &str) -> String {
        format!("{}{}", field, self.unit_input_suffix)
    }
}
