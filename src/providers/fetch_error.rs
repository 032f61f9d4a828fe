use super::ProviderKind;
use strum::{Display, IntoStaticStr};
use thiserror::Error;

/// Why a single provider could not produce reverse dependencies.
///
/// Every failure path in an adapter yields exactly one of these. Each variant
/// remembers which provider produced it so that the coordinator can report the
/// original failure after a fallback attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The registry does not know the package (HTTP 404).
    #[error("package \"{package}\" not found on {}", .provider.display_name())]
    NotFound { provider: ProviderKind, package: String },

    /// Any unsuccessful HTTP status without a dedicated classification.
    #[error("{} API request failed: {status} {status_text}", .provider.display_name())]
    Upstream {
        provider: ProviderKind,
        status: u16,
        status_text: String,
    },

    /// The credential was rejected (HTTP 401).
    #[error("invalid {} API key", .provider.display_name())]
    InvalidCredential { provider: ProviderKind },

    /// Too many requests (HTTP 429).
    #[error("{} rate limit exceeded{}", .provider.display_name(), rate_limit_suffix(.limit_per_minute))]
    RateLimited {
        provider: ProviderKind,
        limit_per_minute: Option<u32>,
    },

    /// The provider needs a credential and none was supplied; raised before any I/O.
    #[error("{} API key required for this provider", .provider.display_name())]
    MissingCredential { provider: ProviderKind },

    /// A successful response whose body is not the expected shape.
    #[error("unexpected {} API response format: {detail}", .provider.display_name())]
    Schema { provider: ProviderKind, detail: String },

    /// Network failure below the HTTP layer; the message is the transport's own.
    #[error("{message}")]
    Transport { provider: ProviderKind, message: String },

    /// The caller cancelled the request while it was in flight.
    #[error("{} request cancelled", .provider.display_name())]
    Cancelled { provider: ProviderKind },

    /// The package name is empty or blank; raised before any I/O.
    #[error("package name is required")]
    InvalidPackage { provider: ProviderKind },
}

/// Stable classification of a [`FetchError`], independent of its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum FetchErrorKind {
    NotFound,
    Upstream,
    InvalidCredential,
    RateLimited,
    MissingCredential,
    Schema,
    Transport,
    Cancelled,
    InvalidPackage,
}

impl FetchError {
    /// The classification of this failure.
    #[must_use]
    pub const fn kind(&self) -> FetchErrorKind {
        match self {
            Self::NotFound { .. } => FetchErrorKind::NotFound,
            Self::Upstream { .. } => FetchErrorKind::Upstream,
            Self::InvalidCredential { .. } => FetchErrorKind::InvalidCredential,
            Self::RateLimited { .. } => FetchErrorKind::RateLimited,
            Self::MissingCredential { .. } => FetchErrorKind::MissingCredential,
            Self::Schema { .. } => FetchErrorKind::Schema,
            Self::Transport { .. } => FetchErrorKind::Transport,
            Self::Cancelled { .. } => FetchErrorKind::Cancelled,
            Self::InvalidPackage { .. } => FetchErrorKind::InvalidPackage,
        }
    }

    /// The provider that produced this failure.
    #[must_use]
    pub const fn provider(&self) -> ProviderKind {
        match self {
            Self::NotFound { provider, .. }
            | Self::Upstream { provider, .. }
            | Self::InvalidCredential { provider }
            | Self::RateLimited { provider, .. }
            | Self::MissingCredential { provider }
            | Self::Schema { provider, .. }
            | Self::Transport { provider, .. }
            | Self::Cancelled { provider }
            | Self::InvalidPackage { provider } => *provider,
        }
    }

    /// Reject a blank package name, which would otherwise encode to an empty path segment.
    pub(crate) fn check_package(provider: ProviderKind, package: &str) -> Result<(), Self> {
        if package.trim().is_empty() {
            return Err(Self::InvalidPackage { provider });
        }
        Ok(())
    }

    pub(crate) fn schema(provider: ProviderKind, detail: impl Into<String>) -> Self {
        Self::Schema {
            provider,
            detail: detail.into(),
        }
    }

    /// Wrap a transport failure, keeping the message of every error in its source chain.
    pub(crate) fn transport(provider: ProviderKind, error: &(dyn core::error::Error + 'static)) -> Self {
        let mut message = error.to_string();
        let mut source = error.source();
        while let Some(cause) = source {
            let cause_text = cause.to_string();
            if !message.contains(&cause_text) {
                message.push_str(": ");
                message.push_str(&cause_text);
            }
            source = cause.source();
        }

        Self::Transport { provider, message }
    }
}

fn rate_limit_suffix(limit_per_minute: &Option<u32>) -> String {
    limit_per_minute.map_or_else(String::new, |limit| format!(" (limit is {limit} requests per minute)"))
}
