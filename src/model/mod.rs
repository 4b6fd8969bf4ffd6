pub mod config;
pub mod field;
pub mod record_type;
pub mod registry;

#[cfg(test)]
mod tests;

pub use config::{load_model, FieldSpec, ModelDefinition, ModelFile};
pub use field::{CacheKey, ColumnNaming, FieldConfig};
pub use record_type::{RecordType, RecordTypeBuilder};
pub use registry::ModelRegistry;
