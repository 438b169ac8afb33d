//! Diagnostic tracing for the runner
//!
//! Results go to stdout; everything logged here goes to stderr so piping
//! answers stays clean.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` wins when set. Otherwise the level defaults to `warn` and each
/// `-v` raises this workspace's crates one level.
pub fn init(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}

fn default_directives(verbose: u8) -> String {
    let level = match verbose {
        0 => return "warn".to_string(),
        1 => "debug",
        _ => "trace",
    };
    ["aoc", "aoc_puzzle", "aoc_http_client", "aoc_solutions"]
        .iter()
        .fold("warn".to_string(), |acc, target| {
            format!("{},{}={}", acc, target, level)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives() {
        assert_eq!(default_directives(0), "warn");
        assert_eq!(
            default_directives(1),
            "warn,aoc=debug,aoc_puzzle=debug,aoc_http_client=debug,aoc_solutions=debug"
        );
        assert!(default_directives(3).ends_with("aoc_solutions=trace"));
    }

    #[test]
    fn test_directives_parse() {
        for verbose in 0..3 {
            assert!(EnvFilter::try_new(default_directives(verbose)).is_ok());
        }
    }
}
