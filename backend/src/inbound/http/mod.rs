//! HTTP inbound adapter exposing REST endpoints.

pub mod accounts;
pub mod admin;
pub mod auth;
pub mod bookings;
pub mod cache_control;
pub mod catalogue;
pub mod dashboards;
pub mod engagement;
pub mod error;
pub mod health;
pub mod notifications;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod tours;

pub use error::ApiResult;
