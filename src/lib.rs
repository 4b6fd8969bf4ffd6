pub mod engine;
pub mod error;
pub mod model;
pub mod record;
pub mod store;
pub mod units;

pub use error::{Error, Result};
