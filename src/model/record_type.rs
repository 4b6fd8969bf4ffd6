use crate::error::{Error, Result};
use crate::model::field::{ColumnNaming, FieldConfig};

/// A record type and the multi-unit fields it declares.
#[derive(Debug, Clone)]
pub struct RecordType {
    name: String,
    columns: ColumnNaming,
    fields: Vec<FieldConfig>,
}

impl RecordType {
    pub fn builder(name: impl Into<String>) -> RecordTypeBuilder {
        RecordTypeBuilder {
            name: name.into(),
            columns: ColumnNaming::default(),
            fields: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &ColumnNaming {
        &self.columns
    }

    pub fn fields(&self) -> &[FieldConfig] {
        &self.fields
    }

    pub fn is_multi_unit_field(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name() == name)
    }

    pub fn field(&self, name: &str) -> Result<&FieldConfig> {
        self.fields
            .iter()
            .find(|f| f.name() == name)
            .ok_or_else(|| Error::UnsupportedField(name.to_string()))
    }

    pub fn cache_column(&self, field: &FieldConfig) -> String {
        self.columns.cache_column(field.name())
    }

    pub fn unit_input_column(&self, field: &FieldConfig) -> String {
        self.columns.unit_input_column(field.name())
    }

    pub fn cache_columns(&self) -> Vec<String> {
        self.fields.iter().map(|f| self.cache_column(f)).collect()
    }

    pub fn unit_input_columns(&self) -> Vec<String> {
        self.fields
            .iter()
            .filter(|f| f.accepts_unit_input())
            .map(|f| self.unit_input_column(f))
            .collect()
    }

    /// The field a unit-input pseudo attribute belongs to, if `column` is one.
    pub fn field_for_unit_input(&self, column: &str) -> Option<&FieldConfig> {
        self.fields
            .iter()
            .filter(|f| f.accepts_unit_input())
            .find(|f| self.unit_input_column(f) == column)
    }

    /// Columns never exposed by visible-attribute listings.
    pub fn hidden_columns(&self) -> Vec<String> {
        self.cache_columns()
    }
}

pub struct RecordTypeBuilder {
    name: String,
    columns: ColumnNaming,
    fields: Vec<FieldConfig>,
}

impl RecordTypeBuilder {
    pub fn columns(mut self, columns: ColumnNaming) -> Self {
        self.columns = columns;
        self
    }

    pub fn field(mut self, field: FieldConfig) -> Self {
        self.fields.push(field);
        self
    }

    pub fn build(self) -> Result<RecordType> {
        if self.columns.cache_suffix.is_empty() || self.columns.unit_input_suffix.is_empty() {
            return Err(Error::InvalidConfig(format!(
                "record type '{}': column suffixes must not be empty",
                self.name
            )));
        }
        if self.columns.cache_suffix == self.columns.unit_input_suffix {
            return Err(Error::InvalidConfig(format!(
                "record type '{}': cache and unit-input suffixes must differ",
                self.name
            )));
        }

        let mut reserved = Vec::new();
        for field in &self.fields {
            reserved.push(self.columns.cache_column(field.name()));
            reserved.push(self.columns.unit_input_column(field.name()));
        }

        for (i, field) in self.fields.iter().enumerate() {
            if self.fields[..i].iter().any(|f| f.name() == field.name()) {
                return Err(Error::InvalidConfig(format!(
                    "record type '{}': multi-unit field '{}' is declared twice",
                    self.name,
                    field.name()
                )));
            }
            if reserved.iter().any(|c| c == field.name()) {
                return Err(Error::InvalidConfig(format!(
                    "record type '{}': field '{}' collides with a derived column",
                    self.name,
                    field.name()
                )));
            }
        }

        Ok(RecordType {
            name: self.name,
            columns: self.columns,
            fields: self.fields,
        })
    }
}
