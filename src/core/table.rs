//! Factory table - the ordered rows that everything else reads from

use miette::Diagnostic;
use thiserror::Error;

use crate::core::percent::{check_range, unsigned_zero, PercentText};
use crate::entities::factory::{Column, DerivedValues, FactoryRow, InputField};

/// User-facing validation failures; the table is left untouched
#[derive(Debug, Error, Diagnostic, Clone, PartialEq)]
pub enum ValidationError {
    #[error("factory name cannot be empty")]
    #[diagnostic(
        code(bft::table::empty_name),
        help("give the factory a name, e.g. \"Plant A\"")
    )]
    EmptyName,

    #[error("no factory at row {index} (table has {len} row(s))")]
    #[diagnostic(
        code(bft::table::index_out_of_range),
        help("rows are numbered from 1; use `show` to list them")
    )]
    IndexOutOfRange { index: usize, len: usize },

    #[error("percentage {value} is outside 0-100")]
    #[diagnostic(code(bft::table::percent_out_of_range))]
    PercentOutOfRange { value: f64 },

    #[error("'{text}' is not a percentage")]
    #[diagnostic(
        code(bft::table::malformed_percent),
        help("use a number between 0 and 100, optionally followed by '%'")
    )]
    MalformedPercent { text: String },
}

/// Ordered factory rows; the row index is the only identity
#[derive(Debug, Clone, Default)]
pub struct FactoryTable {
    rows: Vec<FactoryRow>,
}

impl FactoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a factory and return its index
    ///
    /// The name is trimmed and must be non-empty; both percentages must be
    /// in [0, 100]. Derived values start blank.
    pub fn add_row(
        &mut self,
        name: &str,
        production_share: f64,
        defect_rate: f64,
    ) -> Result<usize, ValidationError> {
        let name = validate_name(name)?;
        check_range(production_share)?;
        check_range(defect_rate)?;

        self.rows.push(FactoryRow::new(
            name,
            unsigned_zero(production_share),
            unsigned_zero(defect_rate),
        ));
        Ok(self.rows.len() - 1)
    }

    /// Delete the row at `index`; following rows shift down by one
    pub fn remove_row(&mut self, index: usize) -> Result<FactoryRow, ValidationError> {
        self.check_index(index)?;
        Ok(self.rows.remove(index))
    }

    /// Overwrite the text of one input cell
    ///
    /// The text is stored as typed; it is only interpreted when read.
    pub fn set_input(
        &mut self,
        index: usize,
        field: InputField,
        raw: &str,
    ) -> Result<(), ValidationError> {
        self.check_index(index)?;
        *self.rows[index].input_mut(field) = PercentText::from_raw(raw);
        Ok(())
    }

    /// Change a factory's name
    pub fn rename(&mut self, index: usize, name: &str) -> Result<(), ValidationError> {
        self.check_index(index)?;
        self.rows[index].name = validate_name(name)?;
        Ok(())
    }

    pub fn get_row(&self, index: usize) -> Option<&FactoryRow> {
        self.rows.get(index)
    }

    pub fn all_rows(&self) -> &[FactoryRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Store the derived values of one row, returning the derived columns
    /// whose text changed
    pub(crate) fn set_derived(
        &mut self,
        index: usize,
        derived: Option<DerivedValues>,
    ) -> Vec<Column> {
        let Some(row) = self.rows.get_mut(index) else {
            return Vec::new();
        };
        let before: Vec<String> = Column::DERIVED.iter().map(|c| row.cell_text(*c)).collect();
        row.derived = derived;
        Column::DERIVED
            .iter()
            .zip(before)
            .filter(|(column, old)| row.cell_text(**column) != *old)
            .map(|(column, _)| *column)
            .collect()
    }

    fn check_index(&self, index: usize) -> Result<(), ValidationError> {
        if index < self.rows.len() {
            Ok(())
        } else {
            Err(ValidationError::IndexOutOfRange {
                index: index + 1,
                len: self.rows.len(),
            })
        }
    }
}

fn validate_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        Err(ValidationError::EmptyName)
    } else {
        Ok(trimmed.to_string())
    }
}
