//! Machine-readable endpoints: JSON results and file exports.

pub mod export;
pub mod results;
