//! Logging and progress plumbing shared by commands.

use clap::ValueEnum;
use core::time::Duration;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use npm_revdeps::Result;
use ohno::IntoAppError;

/// Refresh rate for the spinner (10 Hz).
const REFRESH_INTERVAL_MS: u64 = 100;

const SPINNER_TEMPLATE: &str = "{spinner:.cyan} {msg}";
const SPINNER_TEMPLATE_NO_COLOR: &str = "{spinner} {msg}";

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    None,

    /// Only error messages
    Error,

    /// Warning and error messages
    Warn,

    /// Info, warning, and error messages
    Info,

    /// Debug, info, warning, and error messages
    Debug,

    /// Trace, debug, info, warning, and error messages
    Trace,
}

/// Initialize logger based on log level
pub fn init_logging(log_level: LogLevel) {
    let level = match log_level {
        LogLevel::None => return,
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    };

    let env = env_logger::Env::default().filter_or("RUST_LOG", level);

    env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(matches!(log_level, LogLevel::Debug | LogLevel::Trace))
        .init();
}

/// Spinner shown on stderr while a lookup is in flight.
#[derive(Debug)]
pub struct Spinner {
    bar: ProgressBar,
}

impl Spinner {
    /// Start a spinner, or a hidden one when `visible` is false.
    ///
    /// Log output and the spinner would interleave, so callers hide it whenever logging is on.
    pub fn start(message: &'static str, visible: bool, use_colors: bool) -> Result<Self> {
        let bar = ProgressBar::new_spinner();
        if !visible {
            bar.set_draw_target(ProgressDrawTarget::hidden());
            return Ok(Self { bar });
        }

        bar.set_draw_target(ProgressDrawTarget::stderr_with_hz(10));
        let template = if use_colors { SPINNER_TEMPLATE } else { SPINNER_TEMPLATE_NO_COLOR };
        bar.set_style(
            ProgressStyle::default_spinner()
                .template(template)
                .into_app_err("could not create progress spinner style")?,
        );
        bar.set_message(message);
        bar.enable_steady_tick(Duration::from_millis(REFRESH_INTERVAL_MS));
        Ok(Self { bar })
    }

    /// Replace the spinner with a final message.
    pub fn succeed(&self, message: String) {
        self.bar.disable_steady_tick();
        if self.bar.is_hidden() {
            return;
        }
        self.bar.set_style(ProgressStyle::with_template("✔ {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()));
        self.bar.finish_with_message(message);
    }

    /// Remove the spinner without a trace.
    pub fn clear(&self) {
        self.bar.disable_steady_tick();
        self.bar.finish_and_clear();
    }
}
