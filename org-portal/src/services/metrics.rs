use prometheus::IntCounterVec;
use service_core::observability::metrics::register_counter_vec;
use std::sync::OnceLock;

static ORG_SWITCH_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

fn org_switch_total() -> &'static IntCounterVec {
    ORG_SWITCH_TOTAL.get_or_init(|| {
        register_counter_vec(
            "org_portal_switch_total",
            "Organization switch attempts by outcome",
            &["outcome"],
        )
    })
}

pub fn init_metrics() {
    service_core::observability::metrics::init_metrics();
    org_switch_total();
}

pub fn record_switch(outcome: &str) {
    org_switch_total().with_label_values(&[outcome]).inc();
}
