//! Adapter for the Libraries.io API.
//!
//! Every request carries the caller's API key as a query parameter, so URLs are
//! only ever logged in redacted form.

use super::encoding::encode_component;
use super::http::{read_json, send, upstream_error};
use super::normalize::{BodyShape, FieldTable, extract_entries, normalize_entries};
use super::{CancelToken, Dependency, FetchError, ProviderKind};
use reqwest::{Client, StatusCode};

const LOG_TARGET: &str = "librariesio";
const PROVIDER: ProviderKind = ProviderKind::LibrariesIo;

/// Default base URL for Libraries.io
pub const DEFAULT_BASE_URL: &str = "https://libraries.io";

/// Platform name Libraries.io uses for the npm registry
pub const DEFAULT_PLATFORM: &str = "NPM";

/// Documented request ceiling for an API key.
pub const RATE_LIMIT_PER_MINUTE: u32 = 60;

const FIELDS: FieldTable = FieldTable {
    name: &["name"],
    version: &["latest_stable_release_number", "latest_release_number"],
    downloads: &["downloads_count"],
    repository: &["repository_url"],
    homepage: &["homepage"],
};

const SHAPE: BodyShape = BodyShape::Array;

#[derive(Debug, Clone)]
pub struct Provider {
    client: Client,
    base_url: String,
    platform: String,
}

impl Provider {
    /// Create a provider talking to `base_url` (no trailing path).
    #[must_use]
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            platform: DEFAULT_PLATFORM.to_string(),
        }
    }

    /// Query a platform other than npm.
    #[must_use]
    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = platform.into();
        self
    }

    /// The URL listing the dependents of `package`, authenticated with `api_key`.
    #[must_use]
    pub fn dependents_url(&self, package: &str, api_key: &str) -> String {
        format!("{}?api_key={}", self.dependents_path(package), encode_component(api_key))
    }

    fn dependents_path(&self, package: &str) -> String {
        format!(
            "{}/api/{}/{}/dependents",
            self.base_url,
            encode_component(&self.platform),
            encode_component(package)
        )
    }

    /// Fetch and normalize the packages that depend on `package`.
    ///
    /// Fails without touching the network when `package` is blank
    /// ([`FetchError::InvalidPackage`]) or `api_key` is absent or blank
    /// ([`FetchError::MissingCredential`]).
    pub async fn fetch(&self, package: &str, api_key: Option<&str>, cancel: &CancelToken) -> Result<Vec<Dependency>, FetchError> {
        FetchError::check_package(PROVIDER, package)?;

        let Some(api_key) = api_key.filter(|key| !key.trim().is_empty()) else {
            return Err(FetchError::MissingCredential { provider: PROVIDER });
        };

        let url = self.dependents_url(package, api_key);
        log::info!(
            target: LOG_TARGET,
            "Querying Libraries.io for dependents of '{package}': {}?api_key=<redacted>",
            self.dependents_path(package)
        );

        let response = send(&self.client, &url, PROVIDER, cancel).await?;
        let status = response.status();
        log::debug!(target: LOG_TARGET, "Libraries.io answered {status} for '{package}'");

        classify_status(status, package)?;

        let body = read_json(response, PROVIDER, cancel).await?;
        let entries = extract_entries(PROVIDER, SHAPE, body)?;
        let dependencies = normalize_entries(PROVIDER, &FIELDS, &entries)?;

        log::debug!(target: LOG_TARGET, "Found {} dependents of '{package}'", dependencies.len());
        Ok(dependencies)
    }
}

fn classify_status(status: StatusCode, package: &str) -> Result<(), FetchError> {
    match status {
        s if s.is_success() => Ok(()),
        StatusCode::UNAUTHORIZED => Err(FetchError::InvalidCredential { provider: PROVIDER }),
        StatusCode::TOO_MANY_REQUESTS => Err(FetchError::RateLimited {
            provider: PROVIDER,
            limit_per_minute: Some(RATE_LIMIT_PER_MINUTE),
        }),
        StatusCode::NOT_FOUND => Err(FetchError::NotFound {
            provider: PROVIDER,
            package: package.to_string(),
        }),
        s => Err(upstream_error(PROVIDER, s)),
    }
}
