//! Logging setup for the Snap Tools binary and tests

use tracing_subscriber::{EnvFilter, fmt};

/// Filter used when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "snap_tools=info,snap_platform=info,warn";

/// Install a fmt subscriber filtered by `RUST_LOG`, falling back to [`DEFAULT_FILTER`].
///
/// Returns `false` if a global subscriber was already installed.
pub fn init_tracing() -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());
    install(filter)
}

fn install(filter: EnvFilter) -> bool {
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_initialization_is_harmless() {
        let _ = init_tracing();
        assert!(!init_tracing());
        assert!(!install(EnvFilter::new(DEFAULT_FILTER)));
    }
}
