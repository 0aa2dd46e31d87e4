//! Core error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid cache algorithm: {0}")]
    InvalidAlgorithm(String),
}
