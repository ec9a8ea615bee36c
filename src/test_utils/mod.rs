//! Test utilities for unit and HTTP-level testing.
//!
//! This module provides:
//! - Test data factories for creating valid test fixtures
//! - In-memory store implementations for mocking persistence and redis
//! - Helper builders for constructing use case instances with test dependencies

mod auth_mocks;
mod use_case_builder;

pub use auth_mocks::*;
pub use factories::*;
pub use use_case_builder::*;
