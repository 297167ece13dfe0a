//! Unit tests, one module per harness module.

pub mod board;
pub mod common;
pub mod components;
pub mod config;
pub mod profiles;
pub mod sim;
