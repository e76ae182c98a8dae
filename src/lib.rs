pub mod app_config;
pub mod auth;
pub mod db;
pub mod error;
pub mod ip;
pub mod middleware;
pub mod orm;
pub mod responses;
pub mod store;
pub mod surveys;
pub mod web;

pub use error::{ApiError, ApiResult};
