#![forbid(unsafe_code)]

//! Structured logging setup for applications embedding Tether.
//!
//! Library code only emits `tracing` spans and events; installing a
//! subscriber is the application's job. With the `tracing-json` feature this
//! module offers a one-call JSON subscriber filtered by `RUST_LOG` (or the
//! supplied default directive).
//!
//! Span and event names used across the workspace:
//!
//! | Name              | Kind  | Level | Emitted by                        |
//! |-------------------|-------|-------|-----------------------------------|
//! | `tether.notify`   | span  | info  | observable write with listeners   |
//! | `tether.reverse`  | event | trace | reverse sync skip / short-circuit |
//! | `tether.rollback` | event | warn  | setter failure rollback           |
//! | `tether.parse`    | event | debug | recovered text parse failure      |
//! | `tether.teardown` | event | debug | owned binding released on destroy |
//!
//! Events carry their name in the `event` field so filters and test
//! capture layers can match on it.

/// Install a global JSON subscriber.
///
/// `default_directive` applies when `RUST_LOG` is unset, e.g. `"tether=debug"`.
/// Returns `false` if a global subscriber was already installed.
#[cfg(feature = "tracing-json")]
pub fn init_json_logging(default_directive: &str) -> bool {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .try_init()
        .is_ok()
}
