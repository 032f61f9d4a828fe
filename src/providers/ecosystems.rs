//! Adapter for the ecosyste.ms packages API.

use super::encoding::encode_component;
use super::http::{read_json, send, upstream_error};
use super::normalize::{BodyShape, FieldTable, extract_entries, normalize_entries};
use super::{CancelToken, Dependency, FetchError, ProviderKind};
use reqwest::{Client, StatusCode};

const LOG_TARGET: &str = "ecosystems";
const PROVIDER: ProviderKind = ProviderKind::Ecosystems;

/// Default base URL for ecosyste.ms
pub const DEFAULT_BASE_URL: &str = "https://packages.ecosyste.ms";

/// Registry queried on ecosyste.ms
pub const DEFAULT_REGISTRY: &str = "npmjs.org";

const FIELDS: FieldTable = FieldTable {
    name: &["name"],
    version: &["latest_release_number", "latest_version"],
    downloads: &["downloads"],
    repository: &["repository_url"],
    homepage: &["homepage", "homepage_url"],
};

/// Both a bare array and a `dependent_packages` wrapper have been served by this API.
const SHAPE: BodyShape = BodyShape::ArrayOrField("dependent_packages");

#[derive(Debug, Clone)]
pub struct Provider {
    client: Client,
    base_url: String,
    registry: String,
}

impl Provider {
    /// Create a provider talking to `base_url` (no trailing path).
    #[must_use]
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            registry: DEFAULT_REGISTRY.to_string(),
        }
    }

    /// Query a registry other than npm.
    #[must_use]
    pub fn with_registry(mut self, registry: impl Into<String>) -> Self {
        self.registry = registry.into();
        self
    }

    /// The URL listing the dependents of `package`.
    #[must_use]
    pub fn dependents_url(&self, package: &str) -> String {
        format!(
            "{}/api/v1/registries/{}/packages/{}/dependent_packages",
            self.base_url,
            encode_component(&self.registry),
            encode_component(package)
        )
    }

    /// Fetch and normalize the packages that depend on `package`.
    pub async fn fetch(&self, package: &str, cancel: &CancelToken) -> Result<Vec<Dependency>, FetchError> {
        FetchError::check_package(PROVIDER, package)?;

        let url = self.dependents_url(package);
        log::info!(target: LOG_TARGET, "Querying ecosyste.ms for dependents of '{package}': {url}");

        let response = send(&self.client, &url, PROVIDER, cancel).await?;
        let status = response.status();
        log::debug!(target: LOG_TARGET, "ecosyste.ms answered {status} for '{package}'");

        classify_status(status, package)?;

        let body = read_json(response, PROVIDER, cancel).await?;
        let entries = extract_entries(PROVIDER, SHAPE, body)?;
        let dependencies = normalize_entries(PROVIDER, &FIELDS, &entries)?;

        log::debug!(target: LOG_TARGET, "Found {} dependents of '{package}'", dependencies.len());
        Ok(dependencies)
    }
}

fn classify_status(status: StatusCode, package: &str) -> Result<(), FetchError> {
    if status.is_success() {
        return Ok(());
    }

    if status == StatusCode::NOT_FOUND {
        return Err(FetchError::NotFound {
            provider: PROVIDER,
            package: package.to_string(),
        });
    }

    Err(upstream_error(PROVIDER, status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::FetchErrorKind;

    fn provider(base_url: &str) -> Provider {
        Provider::new(Client::new(), base_url)
    }

    #[test]
    fn test_dependents_url() {
        assert_eq!(
            provider("https://packages.ecosyste.ms").dependents_url("express"),
            "https://packages.ecosyste.ms/api/v1/registries/npmjs.org/packages/express/dependent_packages"
        );
    }

    #[test]
    fn test_dependents_url_encodes_scoped_name() {
        assert_eq!(
            provider("https://packages.ecosyste.ms/").dependents_url("@scope/package"),
            "https://packages.ecosyste.ms/api/v1/registries/npmjs.org/packages/%40scope%2Fpackage/dependent_packages"
        );
    }

    #[test]
    fn test_dependents_url_other_registry() {
        let provider = provider("http://localhost:1234").with_registry("pypi.org");
        assert_eq!(
            provider.dependents_url("requests"),
            "http://localhost:1234/api/v1/registries/pypi.org/packages/requests/dependent_packages"
        );
    }

    #[test]
    fn test_classify_status() {
        classify_status(StatusCode::OK, "express").unwrap();

        let err = classify_status(StatusCode::NOT_FOUND, "nonexistent-pkg").unwrap_err();
        assert_eq!(err.kind(), FetchErrorKind::NotFound);
        assert!(err.to_string().contains("nonexistent-pkg"));

        // no credential-specific handling for this provider
        for status in [StatusCode::UNAUTHORIZED, StatusCode::TOO_MANY_REQUESTS, StatusCode::INTERNAL_SERVER_ERROR] {
            let err = classify_status(status, "express").unwrap_err();
            assert_eq!(err.kind(), FetchErrorKind::Upstream);
        }
    }
}
