// src/types/mod.rs
pub mod models;
pub mod response;

pub use models::*;
pub use response::{normalize_response, ApiResponse};
