//! Small generic helpers shared across the crate.

pub mod math;
pub mod registered;
pub mod registry;
