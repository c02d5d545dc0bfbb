//! BFT: Bayes Factory Toolkit
//!
//! Tracks how much of total production each factory contributes and how
//! often it ships defects, then inverts those figures with Bayes' theorem
//! to tell you where a defective (or sound) part most likely came from.

pub mod cli;
pub mod core;
pub mod entities;
pub mod logging;
pub mod yaml;
