//! Folio API server library.
//!
//! Exposes the core building blocks (config, state, error handling, routes,
//! mirror sync) so integration tests and the binary entrypoint can both
//! access them.

pub mod config;
pub mod error;
pub mod handlers;
pub mod mirror;
pub mod query;
pub mod routes;
pub mod state;
