use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use storefront::shop::SortKey;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Accepts the same snake_case names the HTTP filters use.
pub(crate) fn parse_sort_key(raw: &str) -> Result<SortKey, String> {
    serde_json::from_value(serde_json::Value::String(raw.trim().to_ascii_lowercase())).map_err(
        |_| {
            format!(
                "unknown sort '{raw}' (expected recommended, delivery_time, rating or delivery_fee)"
            )
        },
    )
}
