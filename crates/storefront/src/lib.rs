//! Cafe Rencontre storefront library.
//!
//! The binary in `main.rs` wires these modules to a listener; tests and
//! the integration-tests crate build the same routers over in-memory
//! sessions.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
