//! HTML page handlers.

pub mod dashboard;
pub mod matches;
pub mod teams;
pub mod users;
