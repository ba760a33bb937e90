//! CLI command implementations.

pub mod info;
pub mod plan;
pub mod process;
