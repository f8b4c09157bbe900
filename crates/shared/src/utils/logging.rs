use std::sync::Once;

use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::fmt::format::FmtSpan;

pub fn configure_tracing() -> Result<(), SetGlobalDefaultError> {
    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_max_level(tracing::Level::TRACE)
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_line_number(true)
            .with_file(true)
            //.with_span_events(FmtSpan::ENTER | FmtSpan::CLOSE)
            .with_span_events(FmtSpan::CLOSE)
            .finish(),
    )
}

/// Configures tracing inside a Once block so multiple calls (e.g. from tests)
/// don't fail
pub fn configure_tracing_once() {
    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        // Another subscriber may already be installed by the test harness
        let _ = configure_tracing();
    });
}
