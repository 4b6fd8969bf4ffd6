use clap::{Parser, Subcommand};
use multiunit::model::{self, ModelDefinition};
use multiunit::record::{MultiUnitRecord, Record};
use multiunit::store::JsonStore;
use multiunit::units::{self, Converter, Dimension, UnitCatalog};
use serde_json::{Map, Value};

#[derive(Parser)]
#[command(name = "multiunit")]
#[command(about = "Store and read record fields in multiple measurement units", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the units known to the converter
    Units {
        /// Only list units of this dimension (e.g. "length", "fuel_economy")
        #[arg(short, long)]
        dimension: Option<String>,
    },

    /// Convert a value between two units
    Convert {
        value: f64,
        from: String,
        to: String,

        /// Decimal places to round to
        #[arg(short, long)]
        precision: Option<u32>,
    },

    /// Show the multi-unit fields of a model definition
    Fields {
        /// Model definition file
        #[arg(short, long, default_value = "models/vehicle.toml")]
        model: String,
    },

    /// Create a record
    Create {
        /// Attribute assignments, e.g. --set height=0.5 --set "height=10 mi"
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        set: Vec<String>,

        /// Units values are written in, e.g. --select height=mi
        #[arg(long = "select", value_name = "FIELD=UNIT")]
        select: Vec<String>,

        #[arg(short, long, default_value = "models/vehicle.toml")]
        model: String,

        /// Record store file
        #[arg(short, long, default_value = "vehicles.json")]
        store: String,
    },

    /// Update a stored record
    Update {
        id: u64,

        #[arg(long = "set", value_name = "FIELD=VALUE")]
        set: Vec<String>,

        #[arg(long = "select", value_name = "FIELD=UNIT")]
        select: Vec<String>,

        #[arg(short, long, default_value = "models/vehicle.toml")]
        model: String,

        #[arg(short, long, default_value = "vehicles.json")]
        store: String,
    },

    /// Show a stored record
    Show {
        id: u64,

        /// Units to display fields in, e.g. --select height=mi
        #[arg(long = "select", value_name = "FIELD=UNIT")]
        select: Vec<String>,

        /// Read single fields in an explicit unit, e.g. --unit height=mi
        #[arg(long = "unit", value_name = "FIELD=UNIT")]
        unit: Vec<String>,

        #[arg(short, long, default_value = "models/vehicle.toml")]
        model: String,

        #[arg(short, long, default_value = "vehicles.json")]
        store: String,
    },

    /// Check whether a field accepts a unit (by id or symbol)
    CheckUnit {
        field: String,
        unit: String,

        #[arg(short, long, default_value = "models/vehicle.toml")]
        model: String,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Units { dimension } => list_units(dimension.as_deref()),
        Commands::Convert {
            value,
            from,
            to,
            precision,
        } => convert(value, &from, &to, precision),
        Commands::Fields { model } => list_fields(&model),
        Commands::Create {
            set,
            select,
            model,
            store,
        } => create_record(&model, &store, &set, &select),
        Commands::Update {
            id,
            set,
            select,
            model,
            store,
        } => update_record(&model, &store, id, &set, &select),
        Commands::Show {
            id,
            select,
            unit,
            model,
            store,
        } => show_record(&model, &store, id, &select, &unit),
        Commands::CheckUnit { field, unit, model } => check_unit(&model, &field, &unit),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn list_units(dimension: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let dimensions = match dimension {
        Some(name) => {
            vec![Dimension::parse(name).ok_or_else(|| format!("Unknown dimension '{}'", name))?]
        }
        None => Dimension::ALL.to_vec(),
    };

    for dimension in dimensions {
        println!("{}:", dimension);
        for unit in units::units_of(dimension) {
            println!("  - {} ({}) {}", unit.id, unit.symbol, unit.name);
        }
    }

    Ok(())
}

fn convert(
    value: f64,
    from: &str,
    to: &str,
    precision: Option<u32>,
) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = precision
        .map(UnitCatalog::with_precision)
        .unwrap_or_default();
    let converted = units::convert_by_name(&catalog, value, from, to)?;
    let to_unit = catalog
        .lookup(to)
        .ok_or_else(|| format!("Unknown unit '{}'", to))?;
    println!("{} {}", converted, to_unit.symbol);
    Ok(())
}

fn list_fields(model_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let definition = model::load_model(model_path)?;
    let record_type = &definition.record_type;

    println!("Model: {} (precision: {})", record_type.name(), definition.precision);
    println!("\nFields ({}):", record_type.fields().len());
    for field in record_type.fields() {
        let supported: Vec<_> = field.supported_units().iter().map(|u| u.id).collect();
        println!(
            "  - {} [default: {}] supports {} (cache: {}, input unit: {})",
            field.name(),
            field.default_unit().id,
            supported.join(", "),
            record_type.cache_column(field),
            if field.accepts_unit_input() {
                record_type.unit_input_column(field)
            } else {
                "-".to_string()
            }
        );
    }

    Ok(())
}

fn create_record(
    model_path: &str,
    store_path: &str,
    set: &[String],
    select: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    let definition = model::load_model(model_path)?;
    let catalog = definition.converter();
    let mut store = JsonStore::open(store_path)?;

    let selections = parse_pairs(select)?;
    let mut record = MultiUnitRecord::new(&definition.record_type, &catalog, Record::new())
        .with_selected_units(selections.iter().map(|(f, u)| (f.as_str(), u.as_str())))?;
    record.fill(parse_assignments(set)?)?;

    let id = store.create(&mut record)?;
    println!("Created {} {}", definition.record_type.name(), id);
    print_record(&definition, &record)?;
    Ok(())
}

fn update_record(
    model_path: &str,
    store_path: &str,
    id: u64,
    set: &[String],
    select: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    let definition = model::load_model(model_path)?;
    let catalog = definition.converter();
    let mut store = JsonStore::open(store_path)?;

    let selections = parse_pairs(select)?;
    let mut record = MultiUnitRecord::new(&definition.record_type, &catalog, store.find(id)?)
        .with_selected_units(selections.iter().map(|(f, u)| (f.as_str(), u.as_str())))?;
    record.fill(parse_assignments(set)?)?;

    if store.update(&mut record)? {
        println!("Updated {} {}", definition.record_type.name(), id);
    } else {
        println!("No changes to {} {}", definition.record_type.name(), id);
    }
    print_record(&definition, &record)?;
    Ok(())
}

fn show_record(
    model_path: &str,
    store_path: &str,
    id: u64,
    select: &[String],
    explicit: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    let definition = model::load_model(model_path)?;
    let catalog = definition.converter();
    let store = JsonStore::open(store_path)?;

    let selections = parse_pairs(select)?;
    let record = MultiUnitRecord::new(&definition.record_type, &catalog, store.find(id)?)
        .with_selected_units(selections.iter().map(|(f, u)| (f.as_str(), u.as_str())))?;

    println!("{} {}", definition.record_type.name(), id);
    print_record(&definition, &record)?;

    for (field, unit) in parse_pairs(explicit)? {
        let symbol = definition.record_type.field(&field)?.resolve_unit(&unit)?.symbol;
        match record.get_in(&field, &unit)? {
            Some(value) => println!("\n{} in {}: {} {}", field, unit, value, symbol),
            None => println!("\n{} in {}: null", field, unit),
        }
    }

    println!("\nAll units:");
    for field in definition.record_type.fields() {
        let mut values = Vec::new();
        for unit in field.supported_units() {
            if let Some(value) = record.get_in(field.name(), unit.id)? {
                values.push(format!("{} {}", value, unit.symbol));
            }
        }
        if !values.is_empty() {
            println!("  - {}: {}", field.name(), values.join(" = "));
        }
    }

    Ok(())
}

fn check_unit(model_path: &str, field: &str, unit: &str) -> Result<(), Box<dyn std::error::Error>> {
    let definition = model::load_model(model_path)?;
    let config = definition.record_type.field(field)?;

    if config.supports(unit) {
        println!("'{}' is a supported unit of {}", unit, field);
        Ok(())
    } else {
        Err(format!("'{}' is not a supported unit of {}", unit, field).into())
    }
}

fn print_record(
    definition: &ModelDefinition,
    record: &MultiUnitRecord<'_, Record>,
) -> Result<(), Box<dyn std::error::Error>> {
    for (key, value) in record.visible_attributes()? {
        match definition.record_type.field(&key) {
            Ok(_) if !value.is_null() => {
                println!("  {}: {} {}", key, value, record.selected_unit(&key)?.symbol)
            }
            _ => println!("  {}: {}", key, value),
        }
    }
    Ok(())
}

/// Parse `key=value` pairs.
fn parse_pairs(pairs: &[String]) -> Result<Vec<(String, String)>, Box<dyn std::error::Error>> {
    let mut parsed = Vec::new();
    for pair in pairs {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| format!("Expected KEY=VALUE, got '{}'", pair))?;
        parsed.push((key.trim().to_string(), value.trim().to_string()));
    }
    Ok(parsed)
}

/// Parse `--set` assignments; finite numbers become JSON numbers, anything else
/// (including "inf" and "NaN") stays text and is checked by the field it targets.
fn parse_assignments(pairs: &[String]) -> Result<Map<String, Value>, Box<dyn std::error::Error>> {
    let mut attributes = Map::new();
    for (key, raw) in parse_pairs(pairs)? {
        let value = match raw.parse::<f64>() {
            Ok(number) if number.is_finite() => Value::from(number),
            Err(_) if raw == "null" => Value::Null,
            _ => Value::String(raw),
        };
        attributes.insert(key, value);
    }
    Ok(attributes)
}
