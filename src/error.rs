use thiserror::Error;

/// Errors produced while configuring, reading or writing multi-unit fields.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Requested field \"{0}\" is not a multi-unit field")]
    UnsupportedField(String),

    #[error("Requested field \"{field}\" doesn't support unit '{unit}'")]
    UnsupportedUnitForField { field: String, unit: String },

    #[error("Conversion cache of field \"{field}\" is malformed: {reason}")]
    MalformedCache { field: String, reason: String },

    #[error("Unknown unit '{0}'")]
    UnknownUnit(String),

    #[error("Cannot convert from '{from}' ({from_dimension}) to '{to}' ({to_dimension})")]
    IncompatibleUnits {
        from: String,
        from_dimension: String,
        to: String,
        to_dimension: String,
    },

    #[error("Converting {value} from '{from}' to '{to}' does not produce a finite number")]
    NonFiniteResult { value: f64, from: String, to: String },

    #[error("Field \"{field}\" only accepts finite numbers, got {value}")]
    NonFiniteValue { field: String, value: f64 },

    #[error("Field \"{field}\" expects a number, got {found}")]
    NotANumber { field: String, found: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Row {0} not found")]
    RowNotFound(u64),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn unsupported_unit(field: &str, unit: &str) -> Self {
        Error::UnsupportedUnitForField {
            field: field.to_string(),
            unit: unit.to_string(),
        }
    }
}
