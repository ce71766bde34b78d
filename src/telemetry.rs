//! Tracing setup for the service.
//!
//! `LOG_LEVEL` takes EnvFilter directives and falls back to [`DEFAULT_FILTER`].
//! `LOG_FORMAT` picks the output: `pretty` (default), `compact` or `json`.
//!
//! Game events log under the `trivia` target, service plumbing under `roampedia_trivia`.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,trivia=debug,roampedia_trivia=debug,tower_http=info,axum=info";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LogFormat {
    Pretty,
    Compact,
    Json,
}

impl LogFormat {
    /// Unknown values fall back to pretty output.
    fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("json") => LogFormat::Json,
            Some("compact") => LogFormat::Compact,
            _ => LogFormat::Pretty,
        }
    }
}

fn env_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

pub fn init_tracing() {
    let level = std::env::var("LOG_LEVEL").ok();
    let format = LogFormat::parse(std::env::var("LOG_FORMAT").ok().as_deref());

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(level.as_deref()))
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Compact => builder.compact().init(),
        LogFormat::Pretty => builder.init(),
    }
    tracing::debug!(target: "roampedia_trivia", ?format, "Tracing initialized");
}
