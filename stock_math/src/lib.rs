//! # Stock Math
//!
//! Numeric building blocks used to turn a sales history into model features
//! and stocking quantities:
//! - Lagged series (`lag`)
//! - Trailing window mean and sample standard deviation (`rolling`)
//! - Half-to-even rounding of stock quantities (`rounding`)

use thiserror::Error;

pub mod lag;
pub mod rolling;
pub mod rounding;

pub use lag::lagged;
pub use rolling::{trailing_window_stats, TrailingWindow, WindowStats};
pub use rounding::round_half_even;

/// Errors that can occur in stock-related calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for stock math operations
pub type Result<T> = std::result::Result<T, MathError>;
