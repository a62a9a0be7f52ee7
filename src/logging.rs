//! Logging initialization for the binary.

use tracing::{debug, trace};

/// Filter for the given verbosity, unless `override_level` is set.
pub fn log_level(verbose: u8, override_level: Option<&str>) -> String {
    if let Some(level) = override_level {
        return level.to_string();
    }
    match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    }
    .to_string()
}

/// Initialize tracing, writing to stderr so the conversation owns stdout.
pub fn init_logging(verbose: u8, override_level: Option<&str>) {
    tracing_subscriber::fmt()
        .with_env_filter(log_level(verbose, override_level))
        .with_writer(std::io::stderr)
        .with_target(verbose >= 2)
        .with_line_number(verbose >= 3)
        .init();

    debug!("chatform started with verbosity level: {}", verbose);
    trace!("Full CLI args: {:?}", std::env::args().collect::<Vec<_>>());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_maps_to_filter() {
        assert_eq!(log_level(0, None), "warn");
        assert_eq!(log_level(1, None), "debug");
        assert_eq!(log_level(4, None), "trace");
    }

    #[test]
    fn configured_level_wins() {
        assert_eq!(log_level(2, Some("chatform=info")), "chatform=info");
    }
}
