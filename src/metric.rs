use opentelemetry::{KeyValue, metrics::UpDownCounter};
use std::sync::LazyLock;

static STATDS: LazyLock<UpDownCounter<i64>> = LazyLock::new(|| {
    logfire::i64_up_down_counter("wa_autoreply_statds")
        .with_description("WhatsApp auto-reply webhook statistics")
        .with_unit("event")
        .build()
});

fn incr_statds(metric: &'static str, value: &str) {
    STATDS.add(1, &[KeyValue::new(metric, value.to_string())]);
}

/// Outcome of an inbound webhook request: "acknowledged", "rejected", "misconfigured", ...
pub fn incr_webhook_statds(outcome: &str) {
    incr_statds("webhook", outcome)
}

/// Outcome of an outbound reply: "sent", "failed", "skipped"
pub fn incr_reply_statds(outcome: &str) {
    incr_statds("reply", outcome)
}
