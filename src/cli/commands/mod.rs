//! CLI command implementations

pub mod calc;
pub mod columns;
pub mod completions;
pub mod config;
pub mod session;
