// Verbosity levels mapped onto tracing filters
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{ProxyError, Result};

/// 0 = quiet (warnings and errors), 1 = basic, 2+ = full request trace
pub fn filter_for_level(level: u8) -> &'static str {
    match level {
        0 => "warn",
        1 => "spacetraders_graph=info,warn",
        _ => "spacetraders_graph=debug,info",
    }
}

/// Initialise the global subscriber. `RUST_LOG` wins over the verbosity level.
pub fn init(level: u8) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_for_level(level)));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .try_init()
        .map_err(|e| ProxyError::Config(format!("Failed to initialize tracing: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_widen_the_filter() {
        assert_eq!(filter_for_level(0), "warn");
        assert!(filter_for_level(1).contains("info"));
        assert!(filter_for_level(7).contains("debug"));
    }
}
