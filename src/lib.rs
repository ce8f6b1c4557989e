//! fireeye-digest library interface
//!
//! Exposes core modules for use by the binary and tests.

pub mod collector;
pub mod config;
pub mod digest;
pub mod enrich;
pub mod models;
pub mod parser;
pub mod sink;
