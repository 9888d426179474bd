//! Tracing setup.
//!
//! The library only emits events through `tracing`; installing a subscriber
//! is the consumer's call. [`setup_tracing`] is a ready-made one:
//!
//! ```bash
//! RUST_LOG=propmodel=debug cargo test
//! ```
//!
//! | Level | Events |
//! |-------|--------|
//! | `warn` | deprecated accessor forms degraded to a read |
//! | `debug` | declarations, overrides, identity overrides, sets and resets |
//! | `trace` | identity and state computation |

/// Install a compact `fmt` subscriber filtered by `RUST_LOG`.
///
/// Safe to call more than once; only the first call installs anything.
pub fn setup_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .try_init();
}
