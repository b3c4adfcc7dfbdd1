//! Multicurve Core
//!
//! Logging, profiling, collection and math utilities shared by the multicurve crates.

pub mod alloc;
pub mod logging;
pub mod math;
pub mod profiling;
