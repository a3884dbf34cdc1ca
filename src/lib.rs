//! Yearly SOTA "unwrapped" statistics: aggregation of activator and chaser
//! logs and percentile ranking against the honor rolls.

pub mod aggregate;
pub mod config;
pub mod elevation;
pub mod error;
pub mod identity;
pub mod models;
pub mod normalize;
pub mod ranking;
pub mod report;
pub mod summary;

pub use error::{Result, UnwrappedError};
