//! Find the npm packages that depend on a given package.
//!
//! # Overview
//!
//! `npm-revdeps` asks public registry aggregators which packages declare a dependency
//! on a given npm package. Two providers are supported:
//!
//! - **ecosyste.ms** (default): no credential required.
//! - **Libraries.io**: requires an API key, limited to 60 requests per minute.
//!
//! Each provider answers in its own JSON shape; both are normalized into the same
//! [`providers::Dependency`] record. When the selected provider fails, the other one is
//! tried once (unless fallback is disabled). When both fail, the error from the
//! selected provider is reported.
//!
//! # Installation
//!
//! ```bash
//! cargo install npm-revdeps
//! ```
//!
//! # Basic Usage
//!
//! ```bash
//! npm-revdeps express
//! npm-revdeps @babel/core --limit 20 --sort name
//! npm-revdeps lodash --min-downloads 100000 --json
//! ```
//!
//! **Using Libraries.io:**
//! ```bash
//! export LIBRARIESIO_API_KEY=xxxxxxxx
//! npm-revdeps express --provider librariesio
//! npm-revdeps express --provider librariesio --no-fallback
//! ```
//!
//! An API key can be created at <https://libraries.io/account>. Without a key and with
//! fallback disabled, the tool refuses to run rather than issue a request that cannot succeed.
//!
//! # Output Formats
//!
//! By default a colored listing is printed:
//!
//! ```text
//! 📦 Packages that depend on express:
//! ────────────────────────────────────────────────────────────
//!
//! Found 2 dependent packages:
//!
//!   1. express-session@1.17.3 (1,234,567 downloads)
//!      📂 https://github.com/expressjs/session
//!   2. body-parser@1.20.2 (987,654 downloads)
//!
//! ────────────────────────────────────────────────────────────
//! Total: 2 packages
//! ```
//!
//! With `--json`, a document of the form `{"total": N, "packages": [...]}` is printed instead.
//!
//! # Configuration
//!
//! Defaults can be stored in a configuration file. When `--config` is not given, the
//! first of `revdeps.toml`, `revdeps.yml`, `revdeps.yaml` or `revdeps.json` found in
//! the current directory is used. Command-line options override file settings.
//!
//! ```toml
//! provider = "librariesio"
//! enable_fallback = true
//! timeout_secs = 30
//! sort = "downloads"
//! min_downloads = 1000
//! limit = 50
//! ```
//!
//! # Library Use
//!
//! ```no_run
//! use npm_revdeps::providers::{FetchOptions, fetch_reverse_dependencies};
//!
//! # async fn example() -> Result<(), npm_revdeps::providers::FetchError> {
//! let dependents = fetch_reverse_dependencies("express", &FetchOptions::default()).await?;
//! for dep in &dependents {
//!     println!("{}@{}", dep.name, dep.version);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Filtering and rendering are available through [`reports`]:
//!
//! ```no_run
//! use npm_revdeps::providers::{FetchOptions, ProviderKind, get_reverse_dependencies};
//! use npm_revdeps::reports::{ColorMode, FilterOptions, SortOrder, generate_console};
//!
//! # async fn example() -> npm_revdeps::Result<()> {
//! let options = FetchOptions {
//!     provider: ProviderKind::LibrariesIo,
//!     credential: Some("my-api-key".to_string()),
//!     enable_fallback: true,
//! };
//! let filter = FilterOptions {
//!     min_downloads: Some(1000),
//!     sort: Some(SortOrder::Downloads),
//!     max_results: Some(10),
//! };
//!
//! let dependents = get_reverse_dependencies("express", &options, &filter).await?;
//!
//! let mut output = String::new();
//! generate_console("express", &dependents, ColorMode::Auto, &mut output)?;
//! print!("{output}");
//! # Ok(())
//! # }
//! ```

/// Result type alias using `ohno::AppError` as the default error type.
pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

pub mod providers;

#[doc(hidden)]
pub mod config;

pub mod reports;
