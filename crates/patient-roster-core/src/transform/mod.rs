//! Pure list transforms applied to fetched patients.

mod enrich;
mod sort;

pub use enrich::*;
pub use sort::*;
