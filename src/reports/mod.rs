//! Presentation of fetched reverse dependencies
//!
//! Results coming out of [`crate::providers`] are narrowed by
//! [`filter_dependencies`] and then rendered either as a colored terminal
//! listing or as a JSON document. Both generators write into any
//! [`core::fmt::Write`] so callers decide where the text goes.

mod console;
mod filter;
mod json;

pub use console::{ColorMode, generate as generate_console};
pub use filter::{FilterOptions, SortOrder, filter_dependencies};
pub use json::generate as generate_json;
