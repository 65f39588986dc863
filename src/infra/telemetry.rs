use std::sync::Once;

use metrics::{Unit, describe_counter, describe_histogram};
use tracing::level_filters::LevelFilter;
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::cache::{
    METRIC_CACHE_ERROR, METRIC_CACHE_EVICT, METRIC_CACHE_HIT, METRIC_CACHE_INVALIDATE_MS,
    METRIC_CACHE_MISS,
};
use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;

static METRIC_DESCRIPTIONS: Once = Once::new();

/// Driver crates that log every statement or command at info.
const CHATTY_TARGETS: &[&str] = &["sqlx", "redis", "hyper", "tower"];

/// Install a global tracing subscriber using the provided logging settings.
/// A non-empty `RUST_LOG` replaces the configured directives entirely.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    describe_metrics();

    let env_filter = build_filter(logging.level, std::env::var("RUST_LOG").ok().as_deref())?;

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer().compact().with_target(true).boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| {
            InfraError::telemetry(format!("failed to install tracing subscriber: {err}"))
        })
}

pub fn build_filter(level: LevelFilter, env: Option<&str>) -> Result<EnvFilter, InfraError> {
    let directives = match env.map(str::trim) {
        Some(raw) if !raw.is_empty() => raw.to_string(),
        _ => default_directives(level),
    };
    EnvFilter::builder()
        .parse(&directives)
        .map_err(|err| InfraError::telemetry(format!("invalid log filter `{directives}`: {err}")))
}

/// The configured level for carta, capped at warn for driver crates.
fn default_directives(level: LevelFilter) -> String {
    let chatty = level.min(LevelFilter::WARN);
    let mut directives = vec![lower(level)];
    directives.extend(
        CHATTY_TARGETS
            .iter()
            .map(|target| format!("{target}={}", lower(chatty))),
    );
    directives.join(",")
}

fn lower(level: LevelFilter) -> String {
    level.to_string().to_ascii_lowercase()
}

fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            METRIC_CACHE_HIT,
            Unit::Count,
            "Total number of catalog cache hits."
        );
        describe_counter!(
            METRIC_CACHE_MISS,
            Unit::Count,
            "Total number of catalog cache misses, including reads degraded by backend errors."
        );
        describe_counter!(
            METRIC_CACHE_ERROR,
            Unit::Count,
            "Total number of cache backend or payload errors that were swallowed."
        );
        describe_counter!(
            METRIC_CACHE_EVICT,
            Unit::Count,
            "Total number of in-memory cache evictions due to capacity."
        );
        describe_histogram!(
            METRIC_CACHE_INVALIDATE_MS,
            Unit::Milliseconds,
            "Latency of applying one catalog mutation to the cache in milliseconds."
        );
    });
}
