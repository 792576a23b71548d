use faultline_core::constants::FAULTLINE_LOG_VAR;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// Re-export tracing macros for convenience
pub use tracing::{debug, error, info, instrument, span, trace, warn, Level, Span};

/// Initialize the tracing system
///
/// The filter is read from `FAULTLINE_LOG`, then `RUST_LOG`, and defaults to
/// `info`. Output goes to stderr in compact form. Returns an error if a
/// global subscriber is already installed.
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let filter = build_filter()?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(is_tty())
        .compact()
        .with_target(true)
        .with_thread_ids(false)
        .with_level(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

fn build_filter() -> Result<EnvFilter, Box<dyn std::error::Error + Send + Sync + 'static>> {
    if let Ok(directives) = std::env::var(FAULTLINE_LOG_VAR) {
        return Ok(EnvFilter::try_new(directives)?);
    }
    Ok(EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?)
}

/// Check if we're running in a TTY environment
fn is_tty() -> bool {
    std::io::IsTerminal::is_terminal(&std::io::stderr())
}

/// Create a span covering one recovery of a resource
pub fn recovery_span(service_id: &str, error_kind: &str) -> Span {
    span!(Level::INFO, "recovery", service_id = %service_id, error_kind = %error_kind)
}

/// Create a span for a multi-service orchestration run
pub fn orchestration_span(total_services: usize) -> Span {
    span!(Level::INFO, "orchestration", total_services = %total_services)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_fails_instead_of_panicking() {
        // The first call may lose to another test installing a subscriber.
        let _ = init();
        assert!(init().is_err());
    }
}
