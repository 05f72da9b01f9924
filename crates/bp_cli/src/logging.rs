use std::sync::Once;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Installs the fmt subscriber on stderr. `RUST_LOG` wins over `default_level`.
pub fn init_logging(default_level: &str) {
    if tracing::dispatcher::has_been_set() {
        return;
    }
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    });
}

/// Level for a `-v` count, starting from `base` when none are given.
pub fn level_for(verbose: u8, base: &'static str) -> &'static str {
    match (verbose, base) {
        (0, base) => base,
        (1, "warn") => "info",
        (1, _) => "debug",
        _ => "trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for() {
        assert_eq!(level_for(0, "info"), "info");
        assert_eq!(level_for(1, "info"), "debug");
        assert_eq!(level_for(1, "warn"), "info");
        assert_eq!(level_for(3, "warn"), "trace");
    }
}
