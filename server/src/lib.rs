// storefront_server/src/lib.rs

//! HTTP surface for the order lifecycle engine: actix-web handlers,
//! JSON error mapping, environment configuration, and state wiring.
//! Exposed as a library so the HTTP tests can assemble the same App
//! the binary serves.

pub mod config;
pub mod errors;
pub mod state;
pub mod web;
