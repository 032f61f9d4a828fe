use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

/// The upstream registry aggregators that can answer reverse-dependency queries.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum, Display, EnumString, IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ProviderKind {
    /// ecosyste.ms packages API (no credential needed)
    #[default]
    Ecosystems,

    /// Libraries.io API (requires an API key)
    #[value(name = "librariesio")]
    LibrariesIo,
}

impl ProviderKind {
    /// The provider tried when this one fails.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Ecosystems => Self::LibrariesIo,
            Self::LibrariesIo => Self::Ecosystems,
        }
    }

    /// Human-facing service name used in messages.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Ecosystems => "ecosyste.ms",
            Self::LibrariesIo => "Libraries.io",
        }
    }

    /// Whether requests to this provider need a caller-supplied credential.
    #[must_use]
    pub const fn requires_credential(self) -> bool {
        matches!(self, Self::LibrariesIo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn test_other_is_symmetric() {
        assert_eq!(ProviderKind::Ecosystems.other(), ProviderKind::LibrariesIo);
        assert_eq!(ProviderKind::LibrariesIo.other(), ProviderKind::Ecosystems);
    }

    #[test]
    fn test_string_forms() {
        assert_eq!(ProviderKind::LibrariesIo.to_string(), "librariesio");
        assert_eq!("ecosystems".parse::<ProviderKind>().unwrap(), ProviderKind::Ecosystems);
        assert!("npm".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn test_serde_names() {
        let kind: ProviderKind = serde_json::from_str(r#""librariesio""#).unwrap();
        assert_eq!(kind, ProviderKind::LibrariesIo);
        assert_eq!(serde_json::to_string(&ProviderKind::Ecosystems).unwrap(), r#""ecosystems""#);
    }
}
