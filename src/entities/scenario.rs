//! Scenario entity - a set of factories read from a file
//!
//! ```yaml
//! factories:
//!   - name: Plant A
//!     share: 60%
//!     defect: 5
//!   - name: Plant B
//!     share: 40
//!     defect: "10%"
//! ```

use serde::{Deserialize, Serialize};

use crate::core::percent::{check_range, parse_percent_strict};
use crate::core::table::ValidationError;

/// A percentage written either as a number or as text (`"60%"`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PercentValue {
    Number(f64),
    Text(String),
}

impl PercentValue {
    /// The percentage in [0, 100], or why it is not one
    pub fn resolve(&self) -> Result<f64, ValidationError> {
        match self {
            PercentValue::Number(value) => {
                check_range(*value)?;
                Ok(*value)
            }
            PercentValue::Text(text) => parse_percent_strict(text),
        }
    }
}

impl std::fmt::Display for PercentValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PercentValue::Number(value) => write!(f, "{}", value),
            PercentValue::Text(text) => write!(f, "{}", text),
        }
    }
}

/// One factory as written in a scenario file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioFactory {
    pub name: String,

    /// P(Factory)
    #[serde(alias = "production_share")]
    pub share: PercentValue,

    /// P(Defect|Factory)
    #[serde(alias = "defect_rate")]
    pub defect: PercentValue,
}

/// Factories to load into a session, in table order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub factories: Vec<ScenarioFactory>,
}
