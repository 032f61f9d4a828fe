use serde::{Deserialize, Serialize};

/// Version reported when the upstream registry does not know the latest release.
pub const UNKNOWN_VERSION: &str = "unknown";

/// A package that declares a dependency on the queried package.
///
/// Optional fields are either meaningful or absent: they are never empty strings,
/// and they are omitted entirely when serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    /// Registry identifier of the dependent package.
    pub name: String,

    /// Latest known release of the dependent package, or [`UNKNOWN_VERSION`].
    pub version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downloads: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
}

impl Dependency {
    /// Create a record with the given name and an unknown version.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: UNKNOWN_VERSION.to_string(),
            downloads: None,
            repository: None,
            homepage: None,
        }
    }

    /// Downloads, counting an unreported figure as zero.
    #[must_use]
    pub fn downloads_or_zero(&self) -> u64 {
        self.downloads.unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_defaults_version() {
        let dep = Dependency::new("left-pad");
        assert_eq!(dep.name, "left-pad");
        assert_eq!(dep.version, "unknown");
        assert_eq!(dep.downloads_or_zero(), 0);
    }

    #[test]
    fn test_serialize_omits_absent_fields() {
        let dep = Dependency {
            downloads: Some(42),
            ..Dependency::new("left-pad")
        };

        let json = serde_json::to_value(&dep).unwrap();
        assert_eq!(json, serde_json::json!({ "name": "left-pad", "version": "unknown", "downloads": 42 }));
    }
}
