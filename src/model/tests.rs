use super::*;
use crate::error::Error;
use crate::units::{find_unit, UnitCatalog};
use std::collections::HashMap;

const VEHICLE: &str = r#"
name = "vehicle"

[[field]]
name = "height"
default_unit = "km"
supported_units = ["km", "mi"]

[[field]]
name = "fuel_consumption_city"
default_unit = "L/100km"
supported_units = ["L/100km", "km/l", "mpg", "mi/l"]
cache_key = "symbol"
unit_input = false
"#;

fn km() -> &'static crate::units::Unit {
    find_unit("km").unwrap()
}

fn mi() -> &'static crate::units::Unit {
    find_unit("mi").unwrap()
}

#[test]
fn test_load_model_definition() {
    let definition = ModelFile::parse(VEHICLE)
        .unwrap()
        .into_definition(&UnitCatalog::new())
        .unwrap();
    let record_type = &definition.record_type;

    assert_eq!(record_type.name(), "vehicle");
    assert_eq!(definition.precision, 2);
    assert_eq!(record_type.fields().len(), 2);

    let height = record_type.field("height").unwrap();
    assert_eq!(height.default_unit().id, "km");
    let ids: Vec<_> = height.supported_units().iter().map(|u| u.id).collect();
    assert_eq!(ids, vec!["km", "mi"]);
    assert_eq!(height.cache_key(), CacheKey::Id);
    assert!(height.accepts_unit_input());

    let fuel = record_type.field("fuel_consumption_city").unwrap();
    assert_eq!(fuel.default_unit().id, "L/100km");
    assert_eq!(fuel.cache_key(), CacheKey::Symbol);
    assert!(!fuel.accepts_unit_input());
}

#[test]
fn test_precision_out_of_range_rejected() {
    let content = VEHICLE.replace("name = \"vehicle\"\n", "name = \"vehicle\"\nprecision = 16\n");
    let err = ModelFile::parse(&content)
        .unwrap()
        .into_definition(&UnitCatalog::new())
        .unwrap_err();
    assert!(matches!(err, Error::InvalidConfig(msg) if msg.contains("precision 16")));

    let content = VEHICLE.replace("name = \"vehicle\"\n", "name = \"vehicle\"\nprecision = 15\n");
    let definition = ModelFile::parse(&content)
        .unwrap()
        .into_definition(&UnitCatalog::new())
        .unwrap();
    assert_eq!(definition.converter().precision(), 15);
}

#[test]
fn test_unknown_unit_in_definition() {
    let content = VEHICLE.replace("\"mi\"]", "\"furlong\"]");
    let err = ModelFile::parse(&content)
        .unwrap()
        .into_definition(&UnitCatalog::new())
        .unwrap_err();
    assert!(matches!(err, Error::InvalidConfig(msg) if msg.contains("furlong")));
}

#[test]
fn test_default_unit_must_be_supported() {
    let err = FieldConfig::new("height", km(), vec![mi()]).unwrap_err();
    assert!(matches!(err, Error::InvalidConfig(_)));
}

#[test]
fn test_supported_units_share_a_dimension() {
    let kg = find_unit("kg").unwrap();
    let err = FieldConfig::new("height", km(), vec![km(), kg]).unwrap_err();
    assert!(matches!(err, Error::InvalidConfig(msg) if msg.contains("mass")));
}

#[test]
fn test_duplicate_supported_unit_rejected() {
    let err = FieldConfig::new("height", km(), vec![km(), mi(), km()]).unwrap_err();
    assert!(matches!(err, Error::InvalidConfig(msg) if msg.contains("twice")));
}

#[test]
fn test_field_names_unique_per_record_type() {
    let field = FieldConfig::new("height", km(), vec![km(), mi()]).unwrap();
    let err = RecordType::builder("vehicle")
        .field(field.clone())
        .field(field)
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::InvalidConfig(msg) if msg.contains("declared twice")));
}

#[test]
fn test_field_cannot_shadow_derived_column() {
    let err = RecordType::builder("vehicle")
        .field(FieldConfig::new("height", km(), vec![km(), mi()]).unwrap())
        .field(FieldConfig::new("height_cache", km(), vec![km()]).unwrap())
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::InvalidConfig(msg) if msg.contains("derived column")));
}

#[test]
fn test_resolve_unit_is_case_insensitive() {
    let field = FieldConfig::new("height", km(), vec![km(), mi()]).unwrap();
    assert_eq!(field.resolve_unit("MI").unwrap().id, "mi");
    assert_eq!(field.resolve_unit(" Km ").unwrap().id, "km");

    let err = field.resolve_unit("ft").unwrap_err();
    assert!(matches!(
        err,
        Error::UnsupportedUnitForField { field, unit } if field == "height" && unit == "ft"
    ));
}

#[test]
fn test_unknown_field_is_unsupported() {
    let record_type = RecordType::builder("vehicle")
        .field(FieldConfig::new("height", km(), vec![km(), mi()]).unwrap())
        .build()
        .unwrap();
    assert!(matches!(
        record_type.field("abcd"),
        Err(Error::UnsupportedField(f)) if f == "abcd"
    ));
    assert!(!record_type.is_multi_unit_field("abcd"));
}

#[test]
fn test_derived_columns() {
    let definition = ModelFile::parse(VEHICLE)
        .unwrap()
        .into_definition(&UnitCatalog::new())
        .unwrap();
    let record_type = definition.record_type;

    assert_eq!(
        record_type.cache_columns(),
        vec!["height_cache", "fuel_consumption_city_cache"]
    );
    // fuel consumption opted out of the unit-input pseudo attribute
    assert_eq!(record_type.unit_input_columns(), vec!["height_unit_input"]);
    assert_eq!(
        record_type
            .field_for_unit_input("height_unit_input")
            .map(|f| f.name()),
        Some("height")
    );
    assert!(record_type
        .field_for_unit_input("fuel_consumption_city_unit_input")
        .is_none());
}

#[test]
fn test_custom_column_suffixes() {
    let content = format!("{}\n[columns]\ncache_suffix = \"_ucd\"\nunit_input_suffix = \"_units\"\n", VEHICLE);
    let definition = ModelFile::parse(&content)
        .unwrap()
        .into_definition(&UnitCatalog::new())
        .unwrap();
    let height = definition.record_type.field("height").unwrap();
    assert_eq!(definition.record_type.cache_column(height), "height_ucd");
    assert_eq!(definition.record_type.unit_input_column(height), "height_units");
}

#[test]
fn test_registry_supports_unit_validator() {
    let mut files = HashMap::new();
    files.insert("vehicle.toml".to_string(), VEHICLE.to_string());

    let mut registry = ModelRegistry::new();
    registry
        .load_from_files(files, &UnitCatalog::new())
        .unwrap();

    assert_eq!(registry.list_models(), vec!["vehicle"]);
    assert!(registry
        .supports_unit("vehicle", "fuel_consumption_city", "mpg")
        .unwrap());
    assert!(registry
        .supports_unit("vehicle", "fuel_consumption_city", "L/100 km")
        .unwrap());
    assert!(!registry
        .supports_unit("vehicle", "fuel_consumption_city", "e")
        .unwrap());
    assert!(matches!(
        registry.supports_unit("vehicle", "colour", "mpg"),
        Err(Error::UnsupportedField(_))
    ));
}

#[test]
fn test_registry_load_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("vehicle.toml"), VEHICLE).unwrap();
    std::fs::write(dir.path().join("notes.txt"), "not a model").unwrap();

    let mut registry = ModelRegistry::new();
    registry
        .load_directory(dir.path(), &UnitCatalog::new())
        .unwrap();
    assert!(registry.get("vehicle").is_some());

    // Loading the same definition twice is a configuration error
    let err = registry
        .load_directory(dir.path(), &UnitCatalog::new())
        .unwrap_err();
    assert!(matches!(err, Error::InvalidConfig(_)));
}
