//! Rescache Resource Store
//!
//! This crate provides the in-memory resource services that sit behind
//! the cache: users and products, each with its own validation rules.

pub mod error;
pub mod models;
pub mod products;
pub mod users;

pub use error::StoreError;
pub use models::*;
pub use products::ProductService;
pub use users::UserService;
