//! Backend library modules.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
/// Request-scoped trace identifier shared by middleware and error payloads.
pub use domain::TraceId;
/// Tracing middleware that attaches a trace identifier to every request.
pub use middleware::Trace;
