//! Observability - request ids on top of the tracing spans.

mod request_id;

pub use request_id::{REQUEST_ID_HEADER, RequestId, propagate_request_id};
