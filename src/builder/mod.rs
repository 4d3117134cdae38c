//! Builder API for transition tables.
//!
//! This module provides a fluent table builder and the `states!`/`events!`
//! macros that declare tagged states and events with minimal boilerplate.

pub mod error;
pub mod macros;
pub mod table;

pub use error::{BuildError, Conflict};
pub use table::TableBuilder;
