pub mod auth;

pub mod task;

pub mod user;

use serde::Deserialize;

/// Every service payload arrives wrapped as `{"response": ...}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub response: T,
}
