//! Persistence primitives.
//!
//! Every function is generic over [`sea_orm::ConnectionTrait`] so the same
//! query runs on the pool or inside a transaction opened by a service.

pub mod questions;
pub mod responses;
pub mod surveys;
pub mod users;
