mod common;
mod query;

pub use query::{QueryArgs, process_query};
