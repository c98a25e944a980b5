//! Logging initialization.
//!
//! Logs always go to stderr; stdout carries reports.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Level directive for our own crates, from config plus the `--verbose` flag.
fn directive(level: &str, verbose: bool) -> String {
    let level = match (verbose, level) {
        (true, "trace") => "trace",
        (true, _) => "debug",
        (false, "error" | "warn" | "info" | "debug" | "trace") => level,
        (false, _) => "info",
    };
    format!("warn,cutcheck={level},cutcheck_core={level}")
}

/// Initialize the logging subsystem.
///
/// `RUST_LOG`, when set, replaces the configured filter entirely.
pub fn init(level: &str, verbose: bool, json_format: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(directive(level, verbose)));

    if json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(console::colors_enabled_stderr()),
            )
            .init();
    }
}

/// Initialize logging from the `[logging]` config section, with CLI overrides.
pub fn init_from_config(config: &cutcheck_core::Config, verbose: bool, json_logs: bool) {
    let json_format = json_logs || config.logging.format == "json";
    init(&config.logging.level, verbose, json_format);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directive_levels() {
        assert_eq!(directive("info", false), "warn,cutcheck=info,cutcheck_core=info");
        assert_eq!(directive("error", false), "warn,cutcheck=error,cutcheck_core=error");
        assert_eq!(directive("nonsense", false), "warn,cutcheck=info,cutcheck_core=info");
    }

    #[test]
    fn test_verbose_raises_to_debug() {
        assert_eq!(directive("warn", true), "warn,cutcheck=debug,cutcheck_core=debug");
        assert_eq!(directive("trace", true), "warn,cutcheck=trace,cutcheck_core=trace");
    }
}
