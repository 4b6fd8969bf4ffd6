use crate::error::{Error, Result};
use crate::model::field::{CacheKey, ColumnNaming, FieldConfig};
use crate::model::record_type::RecordType;
use crate::units::{Converter, UnitCatalog, DEFAULT_PRECISION, MAX_PRECISION};
use serde::{Deserialize, Serialize};

/// On-disk TOML definition of a record type.
///
/// ```toml
/// name = "vehicle"
/// precision = 2
///
/// [[field]]
/// name = "height"
/// default_unit = "km"
/// supported_units = ["km", "mi"]
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModelFile {
    pub name: String,

    // Decimal places conversions are rounded to
    #[serde(default)]
    pub precision: Option<u32>,

    #[serde(default)]
    pub columns: ColumnNaming,

    // TOML uses [[field]] array syntax
    #[serde(rename = "field", default)]
    pub fields: Vec<FieldSpec>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FieldSpec {
    pub name: String,
    pub default_unit: String,
    pub supported_units: Vec<String>,

    #[serde(default)]
    pub cache_key: CacheKey,

    #[serde(default = "default_unit_input")]
    pub unit_input: bool,
}

fn default_unit_input() -> bool {
    true
}

/// A loaded model: the record type plus the conversion settings it declares.
#[derive(Debug, Clone)]
pub struct ModelDefinition {
    pub record_type: RecordType,
    pub precision: u32,
}

impl ModelDefinition {
    pub fn converter(&self) -> UnitCatalog {
        UnitCatalog::with_precision(self.precision)
    }
}

impl ModelFile {
    pub fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let file: ModelFile = toml::from_str(content)?;
        Ok(file)
    }

    /// Resolve unit identifiers against `converter` and build the record type.
    pub fn into_definition(self, converter: &dyn Converter) -> Result<ModelDefinition> {
        let precision = self.precision.unwrap_or(DEFAULT_PRECISION);
        if precision > MAX_PRECISION {
            return Err(Error::InvalidConfig(format!(
                "model '{}': precision {} exceeds the maximum of {}",
                self.name, precision, MAX_PRECISION
            )));
        }

        let mut builder = RecordType::builder(self.name.clone()).columns(self.columns);

        for spec in self.fields {
            let lookup = |id: &str| {
                converter.lookup(id).ok_or_else(|| {
                    Error::InvalidConfig(format!(
                        "model '{}', field '{}': unknown unit '{}'",
                        self.name, spec.name, id
                    ))
                })
            };

            let default_unit = lookup(&spec.default_unit)?;
            let supported_units = spec
                .supported_units
                .iter()
                .map(|id| lookup(id))
                .collect::<Result<Vec<_>>>()?;

            let field = FieldConfig::new(spec.name.clone(), default_unit, supported_units)?
                .with_cache_key(spec.cache_key)
                .with_unit_input(spec.unit_input);
            builder = builder.field(field);
        }

        Ok(ModelDefinition {
            record_type: builder.build()?,
            precision,
        })
    }
}

/// Load and resolve a model definition file using the built-in unit catalog.
pub fn load_model<P: AsRef<std::path::Path>>(path: P) -> Result<ModelDefinition> {
    ModelFile::load_from_file(path)?.into_definition(&UnitCatalog::new())
}
