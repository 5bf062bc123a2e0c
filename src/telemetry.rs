//! Tracing setup for the CLI binaries and embedding applications.
//!
//! The library only emits events; installing a subscriber stays opt-in so a
//! host application can wire its own filters instead.

/// Installs a compact fmt subscriber honoring `RUST_LOG` when the `telemetry`
/// feature is enabled. Returns `true` when a subscriber was installed.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        let builder = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .with_target(false)
            .compact();

        return builder.try_init().is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        false
    }
}
