use crate::Result;
use crate::providers::{DEFAULT_USER_AGENT, FetcherSettings, ProviderKind, ecosystems, libraries_io};
use crate::reports::SortOrder;
use camino::{Utf8Path, Utf8PathBuf};
use core::time::Duration;
use ohno::{IntoAppError, app_err};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use url::Url;

/// File names probed, in order, when no configuration path is given.
pub const DEFAULT_CONFIG_FILES: [&str; 4] = ["revdeps.toml", "revdeps.yml", "revdeps.yaml", "revdeps.json"];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Provider tried first.
    pub provider: ProviderKind,

    /// Whether a failed lookup is retried once against the other provider.
    pub enable_fallback: bool,

    /// Request timeout in seconds; unset means the HTTP client default.
    pub timeout_secs: Option<u64>,

    pub user_agent: String,
    pub ecosystems_base_url: String,
    pub libraries_io_base_url: String,
    pub libraries_io_platform: String,

    pub sort: SortOrder,
    pub min_downloads: Option<u64>,
    pub limit: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            enable_fallback: true,
            timeout_secs: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            ecosystems_base_url: ecosystems::DEFAULT_BASE_URL.to_string(),
            libraries_io_base_url: libraries_io::DEFAULT_BASE_URL.to_string(),
            libraries_io_platform: libraries_io::DEFAULT_PLATFORM.to_string(),
            sort: SortOrder::default(),
            min_downloads: None,
            limit: None,
        }
    }
}

impl Config {
    /// Load configuration from `config_path`, or from the first default file found in `base_dir`.
    ///
    /// Returns the configuration along with any validation warnings. A missing default
    /// file yields the default configuration; a missing explicit file is an error.
    pub fn load(base_dir: &Utf8Path, config_path: Option<&Utf8PathBuf>) -> Result<(Self, Vec<String>)> {
        let (final_path, text) = if let Some(path) = config_path {
            let text = fs::read_to_string(path).into_app_err_with(|| format!("reading npm-revdeps configuration from {path}"))?;
            (path.clone(), text)
        } else {
            let mut found = None;
            for name in DEFAULT_CONFIG_FILES {
                let path = base_dir.join(name);
                match fs::read_to_string(&path) {
                    Ok(text) => {
                        found = Some((path, text));
                        break;
                    }
                    Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                    Err(e) => return Err(e).into_app_err_with(|| format!("reading npm-revdeps configuration from {path}")),
                }
            }

            let Some(result) = found else {
                return Ok((Self::default(), Vec::new()));
            };
            result
        };

        log::debug!("Loading configuration from {final_path}");

        let config = Self::parse(&final_path, &text)?;
        let warnings = config.validate();
        Ok((config, warnings))
    }

    /// Parse configuration text, choosing the format from the file extension.
    pub fn parse(path: &Utf8Path, text: &str) -> Result<Self> {
        let extension = path.extension().unwrap_or_default();
        let config = match extension {
            "toml" => toml::from_str(text).into_app_err_with(|| format!("parsing TOML configuration from {path}"))?,
            "yml" | "yaml" => serde_yaml::from_str(text).into_app_err_with(|| format!("parsing YAML configuration from {path}"))?,
            "json" => serde_json::from_str(text).into_app_err_with(|| format!("parsing JSON configuration from {path}"))?,
            _ => return Err(app_err!("unsupported configuration file extension: {extension}")),
        };

        Ok(config)
    }

    /// Report settings that are accepted but probably not what the user meant.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.timeout_secs == Some(0) {
            warnings.push("timeout_secs is 0, every request will time out immediately".to_string());
        }

        if self.limit == Some(0) {
            warnings.push("limit is 0, no packages will be shown".to_string());
        }

        if self.user_agent.trim().is_empty() {
            warnings.push("user_agent is empty".to_string());
        }

        for (field, value) in [
            ("ecosystems_base_url", &self.ecosystems_base_url),
            ("libraries_io_base_url", &self.libraries_io_base_url),
        ] {
            match Url::parse(value) {
                Ok(url) if matches!(url.scheme(), "http" | "https") => {}
                Ok(url) => warnings.push(format!("{field} uses unsupported scheme '{}'", url.scheme())),
                Err(e) => warnings.push(format!("{field} '{value}' is not a valid URL: {e}")),
            }
        }

        warnings
    }

    /// Transport settings for a [`crate::providers::Fetcher`].
    #[must_use]
    pub fn fetcher_settings(&self) -> FetcherSettings {
        FetcherSettings {
            user_agent: self.user_agent.clone(),
            timeout: self.timeout_secs.map(Duration::from_secs),
            ecosystems_base_url: self.ecosystems_base_url.clone(),
            libraries_io_base_url: self.libraries_io_base_url.clone(),
            libraries_io_platform: self.libraries_io_platform.clone(),
        }
    }
}
