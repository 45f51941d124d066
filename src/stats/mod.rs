//! Read-time ranking over already-persisted records.
//!
//! Nothing in this module touches the database or the network: the comment
//! analyzer and the trending ranker are pure functions over rows the caller
//! already loaded, producing transient results for display.

mod analyzer;
mod trending;

pub use analyzer::{analyze, CommentAnalyzer};
pub use trending::trending;
