//! Common test utilities for API integration tests
//!
//! This module provides shared test infrastructure: a seeded in-memory
//! store and helpers for executing GraphQL against it.

#![allow(dead_code, unused_imports)]

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
