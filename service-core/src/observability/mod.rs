pub mod logging;
pub mod metrics;
pub mod trace_context;

pub use logging::init_tracing;
pub use trace_context::{PropagateTrace, TRACEPARENT_HEADER, TRACESTATE_HEADER, inject_trace_context};
