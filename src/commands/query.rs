use super::common::{LogLevel, Spinner, init_logging};
use camino::{Utf8Path, Utf8PathBuf};
use clap::Args;
use npm_revdeps::Result;
use npm_revdeps::config::Config;
use npm_revdeps::providers::{CancelToken, FetchOptions, Fetcher, ProviderKind};
use npm_revdeps::reports::{ColorMode, FilterOptions, SortOrder, filter_dependencies, generate_console, generate_json};
use ohno::bail;
use std::io::{IsTerminal, stderr};

const LOG_TARGET: &str = "     query";

const LIBRARIES_IO_ACCOUNT_URL: &str = "https://libraries.io/account";

/// Arguments for a reverse-dependency query
#[derive(Args, Debug)]
pub struct QueryArgs {
    /// npm package name to query
    #[arg(value_name = "PACKAGE")]
    pub package: String,

    /// Output as JSON
    #[arg(long, short = 'j')]
    pub json: bool,

    /// Only show packages with at least this many downloads
    #[arg(long, short = 'm', value_name = "COUNT")]
    pub min_downloads: Option<u64>,

    /// Limit the number of results
    #[arg(long, short = 'l', value_name = "COUNT")]
    pub limit: Option<usize>,

    /// Sort results [default: downloads]
    #[arg(long, short = 's', value_name = "ORDER")]
    pub sort: Option<SortOrder>,

    /// API provider to query first [default: ecosystems]
    #[arg(long, short = 'p', value_name = "PROVIDER")]
    pub provider: Option<ProviderKind>,

    /// Libraries.io API key (required for the librariesio provider)
    #[arg(long, short = 'k', value_name = "KEY", env = "LIBRARIESIO_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Disable automatic fallback to the other API provider
    #[arg(long)]
    pub no_fallback: bool,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Path to configuration file [default: one of revdeps.[toml|yml|yaml|json] ]
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    /// Control when to use colored output
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    pub color: ColorMode,

    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "none")]
    pub log_level: LogLevel,
}

impl QueryArgs {
    /// Overlay command-line options on top of file configuration.
    fn apply_to(&self, config: &mut Config) {
        if let Some(provider) = self.provider {
            config.provider = provider;
        }
        if self.no_fallback {
            config.enable_fallback = false;
        }
        if let Some(timeout) = self.timeout {
            config.timeout_secs = Some(timeout);
        }
        if let Some(sort) = self.sort {
            config.sort = sort;
        }
        if let Some(min_downloads) = self.min_downloads {
            config.min_downloads = Some(min_downloads);
        }
        if let Some(limit) = self.limit {
            config.limit = Some(limit);
        }
    }

    fn credential(&self) -> Option<String> {
        self.api_key.as_ref().filter(|key| !key.trim().is_empty()).cloned()
    }
}

pub async fn process_query(args: &QueryArgs) -> Result<()> {
    init_logging(args.log_level);

    if args.package.trim().is_empty() {
        bail!("package name is required\nUsage: npm-revdeps <PACKAGE>");
    }

    let (mut config, warnings) = Config::load(Utf8Path::new("."), args.config.as_ref())?;
    if !warnings.is_empty() {
        eprintln!("\n⚠️  Configuration validation warnings:");
        for warning in &warnings {
            eprintln!("   {warning}");
        }
        eprintln!();
    }

    args.apply_to(&mut config);

    let options = FetchOptions {
        provider: config.provider,
        credential: args.credential(),
        enable_fallback: config.enable_fallback,
    };
    check_credential(&options)?;

    let fetcher = Fetcher::new(&config.fetcher_settings())?;

    let cancel = CancelToken::new();
    let interrupt = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                log::warn!(target: LOG_TARGET, "Interrupted, cancelling request");
                cancel.cancel();
            }
        }
    });

    let show_spinner = !args.json && args.log_level == LogLevel::None && stderr().is_terminal();
    let use_colors = match args.color {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => stderr().is_terminal(),
    };
    let spinner = Spinner::start("Fetching reverse dependencies...", show_spinner, use_colors)?;

    let result = fetcher.fetch_with_cancel(&args.package, &options, &cancel).await;
    interrupt.abort();

    let dependencies = match result {
        Ok(dependencies) => {
            spinner.succeed(format!("Found {} dependent packages", dependencies.len()));
            dependencies
        }
        Err(e) => {
            spinner.clear();
            return Err(e.into());
        }
    };

    let filter = FilterOptions {
        min_downloads: config.min_downloads,
        sort: Some(config.sort),
        max_results: config.limit,
    };
    let filtered = filter_dependencies(&dependencies, &filter);
    log::debug!(target: LOG_TARGET, "{} of {} dependents left after filtering", filtered.len(), dependencies.len());

    let mut output = String::new();
    if args.json {
        generate_json(&filtered, &mut output)?;
        println!("{output}");
    } else {
        generate_console(&args.package, &filtered, args.color, &mut output)?;
        print!("{output}");
    }

    Ok(())
}

/// Refuse to start a Libraries.io-only lookup that has no API key.
fn check_credential(options: &FetchOptions) -> Result<()> {
    if options.provider.requires_credential() && options.credential.is_none() && !options.enable_fallback {
        bail!(
            "Libraries.io API key required. Provide via --api-key or LIBRARIESIO_API_KEY env variable\nGet your free API key from: {LIBRARIES_IO_ACCOUNT_URL}"
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(flatten)]
        query: QueryArgs,
    }

    fn parse(args: &[&str]) -> QueryArgs {
        TestCli::try_parse_from(std::iter::once("npm-revdeps").chain(args.iter().copied()))
            .unwrap()
            .query
    }

    #[test]
    fn test_parse_defaults() {
        let args = parse(&["express"]);
        assert_eq!(args.package, "express");
        assert!(!args.json);
        assert!(!args.no_fallback);
        assert_eq!(args.color, ColorMode::Auto);
        assert_eq!(args.log_level, LogLevel::None);
        assert!(args.provider.is_none());
        assert!(args.sort.is_none());
    }

    #[test]
    fn test_parse_short_flags() {
        let args = parse(&["@babel/core", "-j", "-m", "500", "-l", "10", "-s", "name", "-p", "librariesio", "-k", "key"]);
        assert_eq!(args.package, "@babel/core");
        assert!(args.json);
        assert_eq!(args.min_downloads, Some(500));
        assert_eq!(args.limit, Some(10));
        assert_eq!(args.sort, Some(SortOrder::Name));
        assert_eq!(args.provider, Some(ProviderKind::LibrariesIo));
        assert_eq!(args.api_key.as_deref(), Some("key"));
    }

    #[test]
    fn test_invalid_provider_is_rejected() {
        let cli = TestCli::try_parse_from(["npm-revdeps", "express", "--provider", "npmjs"]);
        assert!(cli.is_err());
    }

    #[test]
    fn test_package_is_required() {
        let cli = TestCli::try_parse_from(["npm-revdeps"]);
        assert!(cli.is_err());
    }

    #[tokio::test]
    async fn test_blank_package_is_rejected() {
        let err = process_query(&parse(&["  ", "--no-fallback"])).await.unwrap_err();
        assert!(err.to_string().contains("package name is required"));
    }

    #[test]
    fn test_apply_to_overrides_config() {
        let args = parse(&["express", "--no-fallback", "--timeout", "5", "-s", "name", "-l", "3"]);
        let mut config = Config {
            min_downloads: Some(42),
            ..Config::default()
        };

        args.apply_to(&mut config);
        assert!(!config.enable_fallback);
        assert_eq!(config.timeout_secs, Some(5));
        assert_eq!(config.sort, SortOrder::Name);
        assert_eq!(config.limit, Some(3));
        assert_eq!(config.min_downloads, Some(42));
        assert_eq!(config.provider, ProviderKind::Ecosystems);
    }

    #[test]
    fn test_blank_api_key_is_no_credential() {
        let args = parse(&["express", "-k", "  "]);
        assert!(args.credential().is_none());
    }

    #[test]
    fn test_check_credential() {
        let mut options = FetchOptions {
            provider: ProviderKind::LibrariesIo,
            credential: None,
            enable_fallback: false,
        };
        let err = check_credential(&options).unwrap_err();
        assert!(err.to_string().contains("https://libraries.io/account"));

        options.enable_fallback = true;
        check_credential(&options).unwrap();

        options.enable_fallback = false;
        options.credential = Some("key".to_string());
        check_credential(&options).unwrap();

        check_credential(&FetchOptions {
            enable_fallback: false,
            ..FetchOptions::default()
        })
        .unwrap();
    }
}
