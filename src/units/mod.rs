// Unit descriptors and the conversion library the multi-unit engine treats as a black box.

pub mod catalog;
pub mod converter;
pub mod detector;
pub mod types;


pub use catalog::{find_unit, units_of, UNITS};
pub use converter::{convert_by_name, Converter, UnitCatalog, DEFAULT_PRECISION, MAX_PRECISION};
pub use detector::parse_quantity;
pub use types::{Dimension, Quantity, Unit};
