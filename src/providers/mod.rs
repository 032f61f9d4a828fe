//! Reverse-dependency lookup against the upstream registry aggregators
//!
//! This module talks to two independently shaped HTTP APIs and turns their
//! answers into one ordered list of [`Dependency`] records.
//!
//! # Implementation Model
//!
//! - [`ecosystems`]: adapter for the ecosyste.ms packages API (no credential).
//! - [`libraries_io`]: adapter for the Libraries.io API (API key in the query string).
//!
//! Each adapter builds its request URL with the package name percent-encoded as a
//! single path segment, classifies the HTTP outcome into a [`FetchError`], and maps
//! the provider-specific JSON fields onto [`Dependency`] through a static field
//! table (see `normalize`).
//!
//! The [`Fetcher`] coordinates a call: it invokes the configured primary provider
//! and, when that fails and fallback is enabled, tries the other provider once.
//! When both fail, the primary failure is the one reported. Requests can be
//! aborted through a [`CancelToken`].

mod cancel;
mod dependency;
pub mod ecosystems;
mod encoding;
mod fetch_error;
mod fetcher;
mod http;
pub mod libraries_io;
mod normalize;
mod provider_kind;

pub use cancel::CancelToken;
pub use dependency::{Dependency, UNKNOWN_VERSION};
pub use encoding::encode_component;
pub use fetch_error::{FetchError, FetchErrorKind};
pub use fetcher::{DEFAULT_USER_AGENT, FetchOptions, Fetcher, FetcherSettings, fetch_reverse_dependencies, get_reverse_dependencies, resolve_with_fallback};
pub use provider_kind::ProviderKind;
