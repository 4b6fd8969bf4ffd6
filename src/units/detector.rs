use crate::units::types::Quantity;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex pattern to detect quantity strings
    /// Matches: number (optional decimal, optional scientific notation) + optional whitespace + unit token
    /// Examples: "10 mi", "0.5km", "5 L/100 km", "1e3 Pa", "-20 °C"
    static ref QUANTITY_PATTERN: Regex = Regex::new(
        r"^(-?\d+(?:\.\d+)?(?:[eE][+-]?\d+)?)\s*([a-zA-Z/°µ³][a-zA-Z0-9/°µ³ ]*)$"
    ).unwrap();
}

/// Split a quantity string into its number and unit token.
/// The unit token is returned as written; resolving it is up to the caller.
pub fn parse_quantity(s: &str) -> Option<Quantity> {
    let captures = QUANTITY_PATTERN.captures(s.trim())?;
    let value = captures.get(1)?.as_str().parse::<f64>().ok()?;
    let unit = captures.get(2)?.as_str().trim().to_string();
    Some(Quantity { value, unit })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantity_detection() {
        for s in ["10 mi", "0.5km", "5 L/100 km", "1e3 Pa", "-20 °C", "  47.04 mpg "] {
            assert!(parse_quantity(s).is_some(), "{} should be a quantity", s);
        }
        for s in ["100", "mi", "hello world", "", "inf km"] {
            assert!(parse_quantity(s).is_none(), "{} should not be a quantity", s);
        }
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(
            parse_quantity("10 mi"),
            Some(Quantity {
                value: 10.0,
                unit: "mi".to_string()
            })
        );
        assert_eq!(
            parse_quantity("5 L/100 km"),
            Some(Quantity {
                value: 5.0,
                unit: "L/100 km".to_string()
            })
        );
        assert_eq!(parse_quantity("1e3 Pa").map(|q| q.value), Some(1000.0));
        assert_eq!(parse_quantity("-3.5°C").map(|q| q.unit), Some("°C".to_string()));
        assert_eq!(parse_quantity("12"), None);
    }
}
