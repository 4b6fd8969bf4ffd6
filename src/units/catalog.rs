use crate::units::types::{Dimension, Scale, Unit};

const fn unit(
    id: &'static str,
    symbol: &'static str,
    name: &'static str,
    dimension: Dimension,
    scale: Scale,
) -> Unit {
    Unit {
        id,
        symbol,
        name,
        dimension,
        scale,
    }
}

// Reference units: m, kg, K, L/100km, Pa, m³, m/s
pub static UNITS: &[Unit] = &[
    // Length
    unit("m", "m", "metre", Dimension::Length, Scale::Linear(1.0)),
    unit("km", "km", "kilometre", Dimension::Length, Scale::Linear(1000.0)),
    unit("cm", "cm", "centimetre", Dimension::Length, Scale::Linear(0.01)),
    unit("mm", "mm", "millimetre", Dimension::Length, Scale::Linear(0.001)),
    unit("mi", "mi", "mile", Dimension::Length, Scale::Linear(1609.344)),
    unit("yd", "yd", "yard", Dimension::Length, Scale::Linear(0.9144)),
    unit("ft", "ft", "foot", Dimension::Length, Scale::Linear(0.3048)),
    unit("in", "in", "inch", Dimension::Length, Scale::Linear(0.0254)),
    unit("nmi", "NM", "nautical mile", Dimension::Length, Scale::Linear(1852.0)),
    // Mass
    unit("kg", "kg", "kilogram", Dimension::Mass, Scale::Linear(1.0)),
    unit("g", "g", "gram", Dimension::Mass, Scale::Linear(0.001)),
    unit("t", "t", "tonne", Dimension::Mass, Scale::Linear(1000.0)),
    unit("lb", "lb", "pound", Dimension::Mass, Scale::Linear(0.453_592_37)),
    unit("oz", "oz", "ounce", Dimension::Mass, Scale::Linear(0.028_349_523_125)),
    // Temperature
    unit("K", "K", "kelvin", Dimension::Temperature, Scale::Linear(1.0)),
    unit(
        "C",
        "°C",
        "degree Celsius",
        Dimension::Temperature,
        Scale::Affine {
            factor: 1.0,
            offset: 273.15,
        },
    ),
    unit(
        "F",
        "°F",
        "degree Fahrenheit",
        Dimension::Temperature,
        Scale::Affine {
            factor: 5.0 / 9.0,
            offset: 273.15 - 32.0 * 5.0 / 9.0,
        },
    ),
    // Fuel economy: consumption and distance-per-volume are reciprocal
    unit(
        "L/100km",
        "L/100 km",
        "litres per 100 kilometres",
        Dimension::FuelEconomy,
        Scale::Linear(1.0),
    ),
    unit(
        "km/l",
        "km/L",
        "kilometres per litre",
        Dimension::FuelEconomy,
        Scale::Reciprocal(100.0),
    ),
    unit(
        "mpg",
        "MPG",
        "miles per US gallon",
        Dimension::FuelEconomy,
        Scale::Reciprocal(235.214_583_333_333),
    ),
    unit(
        "mi/l",
        "mi/L",
        "miles per litre",
        Dimension::FuelEconomy,
        Scale::Reciprocal(62.137_119_223_733_4),
    ),
    // Pressure
    unit("Pa", "Pa", "pascal", Dimension::Pressure, Scale::Linear(1.0)),
    unit("kPa", "kPa", "kilopascal", Dimension::Pressure, Scale::Linear(1000.0)),
    unit("bar", "bar", "bar", Dimension::Pressure, Scale::Linear(100_000.0)),
    unit(
        "psi",
        "psi",
        "pound per square inch",
        Dimension::Pressure,
        Scale::Linear(6_894.757_293_168),
    ),
    // Volume
    unit("m3", "m³", "cubic metre", Dimension::Volume, Scale::Linear(1.0)),
    unit("l", "L", "litre", Dimension::Volume, Scale::Linear(0.001)),
    unit("ml", "mL", "millilitre", Dimension::Volume, Scale::Linear(0.000_001)),
    unit(
        "gal",
        "gal",
        "US gallon",
        Dimension::Volume,
        Scale::Linear(0.003_785_411_784),
    ),
    // Speed
    unit("m/s", "m/s", "metre per second", Dimension::Speed, Scale::Linear(1.0)),
    unit(
        "km/h",
        "km/h",
        "kilometre per hour",
        Dimension::Speed,
        Scale::Linear(1000.0 / 3600.0),
    ),
    unit("mph", "mph", "mile per hour", Dimension::Speed, Scale::Linear(0.447_04)),
    unit("kn", "kt", "knot", Dimension::Speed, Scale::Linear(1852.0 / 3600.0)),
];

/// Find a catalog unit by identifier or symbol, ignoring case.
pub fn find_unit(id_or_symbol: &str) -> Option<&'static Unit> {
    // Exact identifier wins over a case-insensitive symbol match
    UNITS
        .iter()
        .find(|u| u.id == id_or_symbol.trim())
        .or_else(|| UNITS.iter().find(|u| u.matches(id_or_symbol)))
}

pub fn units_of(dimension: Dimension) -> impl Iterator<Item = &'static Unit> {
    UNITS.iter().filter(move |u| u.dimension == dimension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_identifiers_and_symbols_are_unambiguous() {
        let mut seen = HashSet::new();
        for unit in UNITS {
            assert!(seen.insert(unit.id.to_lowercase()), "duplicate id {}", unit.id);
            if !unit.symbol.eq_ignore_ascii_case(unit.id) {
                assert!(
                    seen.insert(unit.symbol.to_lowercase()),
                    "duplicate symbol {}",
                    unit.symbol
                );
            }
        }
    }

    #[test]
    fn test_find_unit_by_id_or_symbol() {
        assert_eq!(find_unit("km").map(|u| u.name), Some("kilometre"));
        assert_eq!(find_unit("KM").map(|u| u.name), Some("kilometre"));
        assert_eq!(find_unit("°C").map(|u| u.id), Some("C"));
        assert_eq!(find_unit("l/100 KM").map(|u| u.id), Some("L/100km"));
        assert_eq!(find_unit("kt").map(|u| u.id), Some("kn"));
        assert!(find_unit("parsec").is_none());
    }

    #[test]
    fn test_every_dimension_has_a_reference_unit() {
        for dimension in Dimension::ALL {
            let reference = units_of(dimension)
                .find(|u| u.scale == Scale::Linear(1.0))
                .map(|u| u.id);
            assert!(reference.is_some(), "{} has no reference unit", dimension);
        }
    }
}
