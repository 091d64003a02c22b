//! Dashboard summary and activity types.
//!
//! This module provides types for dashboard data:
//! - Letter counts per status
//! - Recent activity entries

pub mod types;

pub use types::*;
