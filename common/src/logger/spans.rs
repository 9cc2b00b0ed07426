use tracing::Span;

use super::TraceId;

/// Create a root span for one inbound request.
pub fn root_span(name: &'static str, trace_id: &TraceId) -> Span {
    tracing::info_span!("root", name = %name, trace_id = %trace_id)
}
