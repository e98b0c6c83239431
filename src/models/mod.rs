//! Data models for the assistant console.
//!
//! Field names serialize in camelCase to match the stored document shape.

mod assistant;
mod console;

pub use assistant::*;
pub use console::*;
