//! Shared test utilities for inquiry-desk integration tests.
//!
//! This module provides:
//! - `TestHarness`: a service over a file-backed database in a temp directory,
//!   driven by a manual clock
//! - `FlakyStore`: a store wrapper that reports number collisions on demand
//! - Builders for intake payloads and configurations

pub mod builders;
pub mod harness;

pub use builders::*;
pub use harness::{start_instant, FlakyStore, TestHarness};
