#![forbid(unsafe_code)]

//! Logging macros and subscriber setup.
//!
//! The picker reports every rejected operation through `tracing`. Embedders
//! that do not install a subscriber get silence; those that want structured
//! output can enable the `tracing-json` feature and call
//! [`init_json_logging`].

pub use tracing::{debug, error, info, trace, warn};

/// Install a global JSON subscriber filtered by `RUST_LOG` (default `info`).
///
/// Fails if a global subscriber is already set.
#[cfg(feature = "tracing-json")]
pub fn init_json_logging() -> Result<(), tracing_subscriber::util::TryInitError> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json())
        .try_init()
}

#[cfg(all(test, feature = "tracing-json"))]
mod tests {
    #[test]
    fn second_init_fails() {
        let _ = super::init_json_logging();
        assert!(super::init_json_logging().is_err());
    }
}
