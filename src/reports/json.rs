use crate::Result;
use crate::providers::Dependency;
use core::fmt::Write;
use serde::Serialize;

#[derive(Serialize)]
struct JsonReport<'a> {
    total: usize,
    packages: &'a [Dependency],
}

/// Write `dependencies` as a pretty-printed `{ "total", "packages" }` document.
pub fn generate<W: Write>(dependencies: &[Dependency], writer: &mut W) -> Result<()> {
    let report = JsonReport {
        total: dependencies.len(),
        packages: dependencies,
    };

    write!(writer, "{}", serde_json::to_string_pretty(&report)?)?;
    Ok(())
}
