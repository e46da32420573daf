use crate::error::AppError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global JSON subscriber.
///
/// `RUST_LOG` wins over `log_level` when set. Returns an error instead of
/// panicking if a subscriber is already installed, so hosts and test
/// harnesses can call this more than once.
pub fn init_tracing(service_name: &str, log_level: &str) -> Result<(), AppError> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_file(true)
                .with_line_number(true)
                .json()
                .flatten_event(true),
        )
        .try_init()
        .map_err(|e| {
            AppError::InternalError(anyhow::anyhow!(
                "Failed to initialize tracing for service '{}': {}",
                service_name,
                e
            ))
        })?;

    tracing::debug!(service = %service_name, "Tracing initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_an_error_not_a_panic() {
        let _first = init_tracing("service-core-test", "debug");
        let second = init_tracing("service-core-test", "debug");
        assert!(matches!(second, Err(AppError::InternalError(_))));
    }
}
