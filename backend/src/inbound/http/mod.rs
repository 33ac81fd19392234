//! HTTP inbound adapter exposing the REST endpoints.

pub mod error;
pub mod health;
pub mod ingredients;
pub mod recipes;
pub mod schemas;
pub mod session;
pub mod short_links;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;

pub use error::ApiResult;
