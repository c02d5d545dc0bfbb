//! Factory entity - one row of the production table

use serde::{Deserialize, Serialize};

use crate::core::percent::{format_percent, PercentText};

/// One of the two user-editable percentage inputs of a row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputField {
    /// P(Factory): share of total production
    ProductionShare,
    /// P(D|Factory): defect rate of this factory
    DefectRate,
}

impl std::fmt::Display for InputField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputField::ProductionShare => write!(f, "production_share"),
            InputField::DefectRate => write!(f, "defect_rate"),
        }
    }
}

impl std::str::FromStr for InputField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production_share" | "share" | "p(f)" => Ok(InputField::ProductionShare),
            "defect_rate" | "defect" | "p(d|f)" => Ok(InputField::DefectRate),
            _ => Err(format!(
                "Invalid input field: {}. Use production_share or defect_rate",
                s
            )),
        }
    }
}

/// Table column, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Name,
    ProductionShare,
    DefectRate,
    NonDefectRate,
    FactoryGivenDefect,
    FactoryGivenNonDefect,
}

impl Column {
    pub const ALL: [Column; 6] = [
        Column::Name,
        Column::ProductionShare,
        Column::DefectRate,
        Column::NonDefectRate,
        Column::FactoryGivenDefect,
        Column::FactoryGivenNonDefect,
    ];

    /// Columns written by the recalculation engine
    pub const DERIVED: [Column; 3] = [
        Column::NonDefectRate,
        Column::FactoryGivenDefect,
        Column::FactoryGivenNonDefect,
    ];

    /// Edits to these columns require a recomputation pass
    pub fn is_input(self) -> bool {
        matches!(self, Column::ProductionShare | Column::DefectRate)
    }

    pub fn is_derived(self) -> bool {
        Self::DERIVED.contains(&self)
    }

    /// Short header label
    pub fn header(self) -> &'static str {
        match self {
            Column::Name => "FACTORY",
            Column::ProductionShare => "P(F)",
            Column::DefectRate => "P(D|F)",
            Column::NonDefectRate => "P(ND|F)",
            Column::FactoryGivenDefect => "P(F|D)",
            Column::FactoryGivenNonDefect => "P(F|ND)",
        }
    }

    /// Long description shown by `bft columns` and the session help
    pub fn description(self) -> &'static str {
        match self {
            Column::Name => "Name of the factory (identifier of the plant)",
            Column::ProductionShare => {
                "Share of total production assigned to this factory; \
                 all shares must add up to 100% before anything is calculated"
            }
            Column::DefectRate => "Percentage of defective parts produced by this factory",
            Column::NonDefectRate => "Percentage of sound parts produced by this factory",
            Column::FactoryGivenDefect => {
                "Probability that a defective part came from this factory"
            }
            Column::FactoryGivenNonDefect => {
                "Probability that a sound part came from this factory"
            }
        }
    }
}

impl From<InputField> for Column {
    fn from(field: InputField) -> Self {
        match field {
            InputField::ProductionShare => Column::ProductionShare,
            InputField::DefectRate => Column::DefectRate,
        }
    }
}

/// Values the engine derives for one row, as percentages in [0, 100]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedValues {
    /// P(ND|F)
    pub non_defect_rate: f64,
    /// P(F|D)
    pub prob_factory_given_defect: f64,
    /// P(F|ND)
    pub prob_factory_given_non_defect: f64,
}

impl DerivedValues {
    /// Value held in a derived column, or `None` for input columns
    pub fn get(&self, column: Column) -> Option<f64> {
        match column {
            Column::NonDefectRate => Some(self.non_defect_rate),
            Column::FactoryGivenDefect => Some(self.prob_factory_given_defect),
            Column::FactoryGivenNonDefect => Some(self.prob_factory_given_non_defect),
            _ => None,
        }
    }

    /// The three values formatted as display text (`95.00%`, ...)
    pub fn formatted(&self) -> [String; 3] {
        [
            format_percent(self.non_defect_rate),
            format_percent(self.prob_factory_given_defect),
            format_percent(self.prob_factory_given_non_defect),
        ]
    }
}

/// A factory: name, the two input cells, and the engine-owned results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactoryRow {
    /// Display name (non-empty, not necessarily unique)
    pub name: String,

    /// P(Factory) cell text
    pub production_share: PercentText,

    /// P(Defect|Factory) cell text
    pub defect_rate: PercentText,

    /// Derived values; `None` while the table is invalid
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) derived: Option<DerivedValues>,
}

impl FactoryRow {
    pub(crate) fn new(name: String, production_share: f64, defect_rate: f64) -> Self {
        Self {
            name,
            production_share: PercentText::from_value(production_share),
            defect_rate: PercentText::from_value(defect_rate),
            derived: None,
        }
    }

    /// Cell text of one input field
    pub fn input(&self, field: InputField) -> &PercentText {
        match field {
            InputField::ProductionShare => &self.production_share,
            InputField::DefectRate => &self.defect_rate,
        }
    }

    pub(crate) fn input_mut(&mut self, field: InputField) -> &mut PercentText {
        match field {
            InputField::ProductionShare => &mut self.production_share,
            InputField::DefectRate => &mut self.defect_rate,
        }
    }

    /// Derived values, if the last pass produced any
    pub fn derived(&self) -> Option<&DerivedValues> {
        self.derived.as_ref()
    }

    /// Display text of a cell; derived cells are blank while invalid
    pub fn cell_text(&self, column: Column) -> String {
        match column {
            Column::Name => self.name.clone(),
            Column::ProductionShare => self.production_share.to_string(),
            Column::DefectRate => self.defect_rate.to_string(),
            derived => self
                .derived
                .and_then(|d| d.get(derived))
                .map(format_percent)
                .unwrap_or_default(),
        }
    }
}
