//! Cafe Rencontre back-office library.
//!
//! Staff log in here to work the order queue, browse the menu and look up
//! customers.
//!
//! # Security
//!
//! Admin accounts can change the status of any order. Sessions are
//! SameSite=Strict, expire after 24 hours of inactivity, and login attempts
//! are rate limited per client IP.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
