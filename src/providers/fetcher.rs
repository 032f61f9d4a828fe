use super::{CancelToken, Dependency, FetchError, ProviderKind, ecosystems, libraries_io};
use crate::reports::{FilterOptions, filter_dependencies};
use core::time::Duration;
use ohno::IntoAppError;
use reqwest::Client;

const LOG_TARGET: &str = "   fetcher";

/// Default `User-Agent` sent to both providers
pub const DEFAULT_USER_AGENT: &str = concat!("npm-revdeps/", env!("CARGO_PKG_VERSION"));

/// Per-call options: which provider goes first, its credential, and whether to fall back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions {
    pub provider: ProviderKind,

    /// API key for Libraries.io; unused by ecosyste.ms.
    pub credential: Option<String>,

    pub enable_fallback: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Ecosystems,
            credential: None,
            enable_fallback: true,
        }
    }
}

/// Transport settings shared by both providers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetcherSettings {
    pub user_agent: String,

    /// Overall request timeout; `None` leaves the HTTP client's default in place.
    pub timeout: Option<Duration>,

    pub ecosystems_base_url: String,
    pub libraries_io_base_url: String,
    pub libraries_io_platform: String,
}

impl Default for FetcherSettings {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: None,
            ecosystems_base_url: ecosystems::DEFAULT_BASE_URL.to_string(),
            libraries_io_base_url: libraries_io::DEFAULT_BASE_URL.to_string(),
            libraries_io_platform: libraries_io::DEFAULT_PLATFORM.to_string(),
        }
    }
}

impl FetcherSettings {
    fn build_client(&self) -> Result<Client, reqwest::Error> {
        let mut builder = Client::builder().user_agent(&self.user_agent);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        builder.build()
    }
}

/// Resolves reverse dependencies through a primary provider with a one-hop fallback.
///
/// Holds no state between calls: every [`fetch`](Self::fetch) is independent and
/// the two provider requests of a single call are issued strictly one after the other.
#[derive(Debug, Clone)]
pub struct Fetcher {
    ecosystems: ecosystems::Provider,
    libraries_io: libraries_io::Provider,
}

impl Fetcher {
    /// Create a fetcher with its own HTTP client.
    pub fn new(settings: &FetcherSettings) -> crate::Result<Self> {
        let client = settings.build_client().into_app_err("could not create HTTP client")?;
        Ok(Self::with_client(client, settings))
    }

    /// Create a fetcher sharing an existing HTTP client.
    ///
    /// The client's own timeout and user agent are used as-is.
    #[must_use]
    pub fn with_client(client: Client, settings: &FetcherSettings) -> Self {
        Self {
            ecosystems: ecosystems::Provider::new(client.clone(), &settings.ecosystems_base_url),
            libraries_io: libraries_io::Provider::new(client, &settings.libraries_io_base_url)
                .with_platform(settings.libraries_io_platform.clone()),
        }
    }

    /// Fetch the dependents of `package`.
    pub async fn fetch(&self, package: &str, options: &FetchOptions) -> Result<Vec<Dependency>, FetchError> {
        self.fetch_with_cancel(package, options, &CancelToken::new()).await
    }

    /// Fetch the dependents of `package`, aborting when `cancel` fires.
    ///
    /// On a primary failure the other provider is tried once if fallback is enabled
    /// and the token has not been cancelled. If both fail, the primary failure is returned.
    /// A blank `package` fails with [`FetchError::InvalidPackage`] before any request.
    pub async fn fetch_with_cancel(
        &self,
        package: &str,
        options: &FetchOptions,
        cancel: &CancelToken,
    ) -> Result<Vec<Dependency>, FetchError> {
        let primary = options.provider;
        let credential = options.credential.as_deref();

        FetchError::check_package(primary, package)?;

        log::debug!(target: LOG_TARGET, "Fetching dependents of '{package}' from {primary} (fallback {})",
            if options.enable_fallback { "enabled" } else { "disabled" });

        let primary_result = self.fetch_from(primary, package, credential, cancel).await;

        resolve_with_fallback(primary_result, options.enable_fallback, cancel, || {
            let fallback = primary.other();
            log::info!(target: LOG_TARGET, "Falling back to {fallback} for '{package}'");
            self.fetch_from(fallback, package, credential, cancel)
        })
        .await
    }

    /// Fetch the dependents of `package` and narrow them with `filter`.
    pub async fn fetch_filtered(
        &self,
        package: &str,
        options: &FetchOptions,
        filter: &FilterOptions,
    ) -> Result<Vec<Dependency>, FetchError> {
        let dependencies = self.fetch(package, options).await?;
        Ok(filter_dependencies(&dependencies, filter))
    }

    async fn fetch_from(
        &self,
        provider: ProviderKind,
        package: &str,
        credential: Option<&str>,
        cancel: &CancelToken,
    ) -> Result<Vec<Dependency>, FetchError> {
        match provider {
            ProviderKind::Ecosystems => self.ecosystems.fetch(package, cancel).await,
            ProviderKind::LibrariesIo => self.libraries_io.fetch(package, credential, cancel).await,
        }
    }
}

/// Decide the outcome of a call from the primary result and an optional fallback.
///
/// - primary success is returned as-is and `fallback` is never invoked;
/// - with fallback disabled, or once cancelled, the primary failure is returned unchanged;
/// - otherwise `fallback` runs once: its success wins, its failure is discarded in
///   favor of the primary failure.
pub async fn resolve_with_fallback<T, F, Fut>(
    primary: Result<T, FetchError>,
    enable_fallback: bool,
    cancel: &CancelToken,
    fallback: F,
) -> Result<T, FetchError>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let primary_error = match primary {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };

    if !enable_fallback {
        return Err(primary_error);
    }

    if cancel.is_cancelled() {
        log::debug!(target: LOG_TARGET, "Not falling back after cancellation");
        return Err(primary_error);
    }

    log::warn!(target: LOG_TARGET, "{} failed: {primary_error}", primary_error.provider());

    match fallback().await {
        Ok(value) => Ok(value),
        Err(fallback_error) => {
            log::warn!(target: LOG_TARGET, "{} fallback also failed: {fallback_error}", fallback_error.provider());
            Err(primary_error)
        }
    }
}

/// Fetch the dependents of `package` with default transport settings.
pub async fn fetch_reverse_dependencies(package: &str, options: &FetchOptions) -> Result<Vec<Dependency>, FetchError> {
    let settings = FetcherSettings::default();
    let client = settings
        .build_client()
        .map_err(|e| FetchError::transport(options.provider, &e))?;

    Fetcher::with_client(client, &settings).fetch(package, options).await
}

/// Fetch the dependents of `package` with default transport settings, then apply `filter`.
pub async fn get_reverse_dependencies(
    package: &str,
    options: &FetchOptions,
    filter: &FilterOptions,
) -> Result<Vec<Dependency>, FetchError> {
    let dependencies = fetch_reverse_dependencies(package, options).await?;
    Ok(filter_dependencies(&dependencies, filter))
}
