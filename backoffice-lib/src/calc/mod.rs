//! Aggregate calculators
//!
//! Pure functions over rows that are already loaded. Missing numeric fields
//! count as zero and empty inputs give zero-valued aggregates; nothing here
//! returns an error. Aggregates are always derived from the rows, never read
//! back from stored totals.

mod bank;
mod hours;
mod payroll;
mod roster;
mod stats;

pub use bank::*;
pub use hours::*;
pub use payroll::*;
pub use roster::*;
pub use stats::*;
