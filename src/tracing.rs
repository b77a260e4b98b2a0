//! Tracing initialization.
//!
//! Logs go to stderr; stdout carries response envelopes.

use crate::config::LogFormat;
use std::sync::Once;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

static INIT: Once = Once::new();

/// Initialize tracing at INFO unless `RUST_LOG` says otherwise.
/// Safe to call multiple times; only the first call takes effect.
pub fn init(format: LogFormat) {
    INIT.call_once(|| {
        let filter = EnvFilter::builder()
            .with_default_directive(tracing::Level::INFO.into())
            .from_env_lossy();

        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_target(true)
            .with_span_events(FmtSpan::NONE);

        let result = match format {
            LogFormat::Compact => builder.compact().with_writer(std::io::stderr).try_init(),
            LogFormat::Json => builder.json().with_writer(std::io::stderr).try_init(),
        };

        if let Err(e) = result {
            eprintln!("Failed to initialize tracing: {}", e)
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;

    #[test]
    fn repeated_init_is_harmless() {
        init(LogFormat::Json);
        init(LogFormat::Compact);
        tracing::info!("logging after repeated init");
        check!(INIT.is_completed());
    }
}
