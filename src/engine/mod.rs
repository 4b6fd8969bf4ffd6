// Multi-unit conversion cache and change detection.
//
// Pure functions over field configuration, a conversion cache and a converter,
// plus the two pre-persist hooks that keep the base column and its cache consistent.

pub mod cache;
pub mod change;
pub mod columns;
pub mod lifecycle;
pub mod read;
pub mod selection;


pub use cache::{build, build_from, ConversionCache};
pub use change::{resolve_write, WriteResolution};
pub use lifecycle::{before_create, before_update};
pub use read::{read_value, target_unit};
pub use selection::SelectedUnits;
