//! Request middleware.
//!
//! Currently just the tracing layer; session handling lives with the HTTP
//! adapter because it owns the cookie configuration.

pub mod trace;

pub use trace::Trace;
