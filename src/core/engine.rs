//! Recalculation engine - Bayes inversion over the whole factory table
//!
//! Given P(F) (production share) and P(D|F) (defect rate) for every factory,
//! the engine derives for each row:
//!
//! - `P(ND|F) = 1 - P(D|F)`
//! - `P(F|D)  = P(F) * P(D|F) / P(D)`
//! - `P(F|ND) = P(F) * (1 - P(D|F)) / P(ND)`
//!
//! where `P(D) = Σ P(F) * P(D|F)` and `P(ND) = 1 - P(D)` are computed once
//! per pass and shared by every row.
//!
//! Nothing is derived unless the production shares add up to 100%. The
//! engine is a pure function of the rows; writing the results back into the
//! table is the session's job.

use serde::{Deserialize, Serialize};

use crate::entities::factory::{DerivedValues, FactoryRow};

/// Allowed distance between the share total and 100%
pub const SHARE_TOLERANCE: f64 = 1e-6;

/// Status message shown while the shares do not add up
pub const INVALID_SUM_MESSAGE: &str = "shares must sum to 100%";

/// Outcome of a recomputation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecalcStatus {
    /// Shares add up to 100%; every row has derived values
    Ok,
    /// Shares do not add up to 100%; every derived value is blank
    InvalidSum,
}

impl RecalcStatus {
    /// Message for the status line, if any
    pub fn message(self) -> Option<&'static str> {
        match self {
            RecalcStatus::Ok => None,
            RecalcStatus::InvalidSum => Some(INVALID_SUM_MESSAGE),
        }
    }
}

impl std::fmt::Display for RecalcStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecalcStatus::Ok => write!(f, "ok"),
            RecalcStatus::InvalidSum => write!(f, "invalid_sum"),
        }
    }
}

/// Result of one pass over the table
#[derive(Debug, Clone, PartialEq)]
pub struct Recalculation {
    pub status: RecalcStatus,

    /// Sum of all production shares, in percent
    pub total_share: f64,

    /// Marginal defect probability P(D) in [0, 1]; `None` when invalid
    pub p_defect: Option<f64>,

    /// Derived values per row, in row order; all `None` when invalid
    pub derived: Vec<Option<DerivedValues>>,
}

impl Recalculation {
    pub fn is_valid(&self) -> bool {
        self.status == RecalcStatus::Ok
    }

    /// Marginal probability of a sound part, P(ND) = 1 - P(D)
    pub fn p_non_defect(&self) -> Option<f64> {
        self.p_defect.map(|p| 1.0 - p)
    }
}

/// Sum of the production shares, in percent (unusable cells count as 0)
pub fn total_share(rows: &[FactoryRow]) -> f64 {
    rows.iter().map(|row| row.production_share.value()).sum()
}

/// Whether a share total counts as 100%
pub fn shares_are_complete(total: f64) -> bool {
    (total - 100.0).abs() <= SHARE_TOLERANCE
}

/// Run one full pass over `rows`
pub fn recalculate(rows: &[FactoryRow]) -> Recalculation {
    let total = total_share(rows);

    if !shares_are_complete(total) {
        return Recalculation {
            status: RecalcStatus::InvalidSum,
            total_share: total,
            p_defect: None,
            derived: vec![None; rows.len()],
        };
    }

    let probabilities: Vec<(f64, f64)> = rows
        .iter()
        .map(|row| {
            (
                row.production_share.probability(),
                row.defect_rate.probability(),
            )
        })
        .collect();

    let p_defect: f64 = probabilities.iter().map(|(p_f, p_d)| p_f * p_d).sum();
    let p_non_defect = 1.0 - p_defect;

    let derived = probabilities
        .iter()
        .map(|&(p_f, p_d)| {
            let given_defect = if p_defect > 0.0 {
                p_f * p_d / p_defect * 100.0
            } else {
                0.0
            };
            let given_non_defect = if p_non_defect > 0.0 {
                p_f * (1.0 - p_d) / p_non_defect * 100.0
            } else {
                0.0
            };
            Some(DerivedValues {
                non_defect_rate: (1.0 - p_d) * 100.0,
                prob_factory_given_defect: given_defect,
                prob_factory_given_non_defect: given_non_defect,
            })
        })
        .collect();

    Recalculation {
        status: RecalcStatus::Ok,
        total_share: total,
        p_defect: Some(p_defect),
        derived,
    }
}
