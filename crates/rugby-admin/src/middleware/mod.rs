//! Request middleware.

mod timing;

pub use timing::timing_layer;
