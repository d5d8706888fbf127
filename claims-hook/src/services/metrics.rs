use prometheus::IntCounterVec;
use service_core::observability::metrics::register_counter_vec;
use std::sync::OnceLock;

static HOOK_INVOCATIONS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

fn hook_invocations_total() -> &'static IntCounterVec {
    HOOK_INVOCATIONS_TOTAL.get_or_init(|| {
        register_counter_vec(
            "claims_hook_invocations_total",
            "Post-login hook invocations by outcome",
            &["outcome"],
        )
    })
}

pub fn init_metrics() {
    service_core::observability::metrics::init_metrics();
    hook_invocations_total();
}

pub fn record_outcome(outcome: &str) {
    hook_invocations_total().with_label_values(&[outcome]).inc();
}
