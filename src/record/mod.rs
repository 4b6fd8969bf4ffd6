// Host record collaborators: the attribute interface the engine relies on, an
// in-memory record with dirty tracking, and the multi-unit facade over them.

pub mod attributes;
pub mod memory;
pub mod multi_unit;


pub use attributes::{same_value, Attributes};
pub use memory::Record;
pub use multi_unit::MultiUnitRecord;
