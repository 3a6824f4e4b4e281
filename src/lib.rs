//! Client library for the Bixo recruitment marketplace API.
//!
//! [`core::ApiClient`] performs authenticated JSON calls and folds every
//! outcome into an [`types::ApiResponse`]; [`services`] layers the typed
//! endpoints on top of it.

pub mod capabilities;
pub mod cli;
pub mod core;
pub mod environment;
pub mod services;
pub mod types;
pub mod utils;

pub use crate::core::{ApiClient, AuthSession, Session};
pub use crate::environment::ClientConfig;
pub use crate::types::ApiResponse;
