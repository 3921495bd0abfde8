//! Tracing setup for host applications
//!
//! The crate itself only emits `tracing` events; hosts that have no
//! subscriber of their own can install this one. Verbosity comes from
//! `RUST_LOG`, defaulting to `info`. Output goes to stderr so a ratatui
//! screen on stdout stays intact.

use tracing_subscriber::EnvFilter;

/// Install a stderr `tracing` subscriber filtered by `RUST_LOG`.
///
/// Safe to call more than once; only the first call installs anything.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        init_tracing();
        init_tracing();
    }
}
