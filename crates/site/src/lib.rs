//! Medassist site library.
//!
//! Exposes the server internals to the `medassist` binary and to the
//! integration tests.

pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod session;
pub mod state;
pub mod theme;
