//! Tracing subscriber setup for applications embedding the harvester

use tracing_subscriber::EnvFilter;

/// Builds the log filter for a verbosity level
///
/// `RUST_LOG`, when set, takes precedence over the verbosity flags.
pub fn log_filter(verbose: u8, quiet: bool) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    if quiet {
        return EnvFilter::new("error");
    }
    match verbose {
        0 => EnvFilter::new("novel_harvest=info,warn"),
        1 => EnvFilter::new("novel_harvest=debug,info"),
        2 => EnvFilter::new("novel_harvest=trace,debug"),
        _ => EnvFilter::new("trace"),
    }
}

/// Installs a formatting subscriber as the global default
///
/// Does nothing when a subscriber is already installed, so embedders and
/// tests may call it more than once.
pub fn init_logging(verbose: u8, quiet: bool) {
    let result = tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbose, quiet))
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .try_init();

    if result.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_is_repeatable() {
        init_logging(1, false);
        init_logging(0, true);
    }

    #[test]
    fn test_filter_levels() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        assert_eq!(log_filter(0, true).to_string(), "error");
        assert!(log_filter(0, false).to_string().contains("novel_harvest=info"));
        assert!(log_filter(2, false).to_string().contains("novel_harvest=trace"));
    }
}
