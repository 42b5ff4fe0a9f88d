//! Inbound adapters that translate external requests
//! into domain service calls while keeping framework details at the edge.
//!
//! HTTP handlers live under [`http`], additional transports can sit
//! alongside it as the surface grows.

pub mod http;
