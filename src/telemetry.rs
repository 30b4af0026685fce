//! Telemetry helpers for hosts embedding `emblab`.
//!
//! Events are emitted under the module targets `emblab::api` (message
//! application, dataset loads), `emblab::interaction` (gesture start, commit
//! and cancel), `emblab::protocol` (requests sent, inbound decoding) and
//! `emblab::render` (reconciliation counts, at `trace`).
//! Hosts either call one of the initializers below or install their own
//! `tracing` subscriber.

/// Filter used when `RUST_LOG` is unset: crate events at `info`, everything
/// else at `warn`.
pub const DEFAULT_FILTER: &str = "warn,emblab=info";

/// Installs a compact `tracing` subscriber filtered by `RUST_LOG`, falling
/// back to [`DEFAULT_FILTER`].
///
/// Returns `false` when the `telemetry` feature is disabled or the host
/// already set a global subscriber.
#[must_use]
pub fn init_default_tracing() -> bool {
    init_tracing(DEFAULT_FILTER)
}

/// Like [`init_default_tracing`] with a caller-chosen fallback directive,
/// e.g. `"emblab::interaction=debug"` to follow gestures.
#[must_use]
pub fn init_tracing(fallback: &str) -> bool {
    #[cfg(feature = "telemetry")]
    {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .or_else(|_| tracing_subscriber::EnvFilter::try_new(fallback))
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_FILTER));

        return tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .compact()
            .try_init()
            .is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = fallback;
        false
    }
}
