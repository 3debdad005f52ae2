//! # tithe-core
//! Foundation types and trait seams for the Tithe protocol.

pub mod constants;
pub mod error;
pub mod math;
pub mod params;
pub mod types;
pub mod vault;
