//! Shared setup for the integration tests
#![allow(dead_code)]

pub mod database;
pub mod fixtures;

pub use database::*;
pub use fixtures::*;
