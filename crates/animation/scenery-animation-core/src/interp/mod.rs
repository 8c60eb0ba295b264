//! Interpolation helpers used by track sampling.

pub mod functions;

pub use functions::{bezier_ease_t, bezier_value, linear_value, step_value};
