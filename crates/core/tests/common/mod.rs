//! Shared helpers for the harness tests.

pub mod mocks;
