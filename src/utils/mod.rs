//! Shared utilities
//!
//! - Months: circular month arithmetic and planting windows
//! - Stats: mean / population σ / CV and score clamping

pub mod months;
pub mod stats;

// Re-export commonly used types
pub use months::{Month, MonthWindow};
