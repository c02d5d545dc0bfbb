//! Entity type definitions
//!
//! - [`FactoryRow`] - one factory with its production share, defect rate
//!   and derived probabilities
//! - [`Scenario`] - a set of factories read from a YAML or CSV file

pub mod factory;
pub mod scenario;

pub use factory::{Column, DerivedValues, FactoryRow, InputField};
pub use scenario::{Scenario, ScenarioFactory};
