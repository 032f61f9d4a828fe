//! Configuration for npm-revdeps
//!
//! Settings are read from `revdeps.toml`, `revdeps.yml`, `revdeps.yaml`, or
//! `revdeps.json` (first match wins), or from an explicitly named file. Every
//! field is optional; command-line flags override whatever the file provides.

#[expect(clippy::module_inception, reason = "the configuration type lives in its own file")]
mod config;

pub use config::{Config, DEFAULT_CONFIG_FILES};
