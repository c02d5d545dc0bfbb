//! Session - owns the factory table and drives the engine
//!
//! The presentation layer talks to a [`Session`] through event handlers
//! (`on_add_factory`, `on_remove_factory`, `on_input_edited`, ...) and hears
//! back through a [`SessionObserver`]. Every mutating event runs one full
//! recomputation pass before the handler returns.
//!
//! Writing derived values back into the table raises cell-change
//! notifications just like a user edit would. Those arrive while an
//! [`UpdateScope`] is held and are dropped, so the engine never re-enters
//! itself.

use std::cell::Cell;
use std::rc::Rc;

use tracing::{debug, trace, warn};

use crate::core::engine::{self, RecalcStatus, Recalculation};
use crate::core::table::{FactoryTable, ValidationError};
use crate::entities::factory::{Column, DerivedValues, FactoryRow, InputField};

/// Receives the session's outbound notifications
///
/// Every method has an empty default so observers only implement what they
/// display.
pub trait SessionObserver {
    /// A row was appended at `index`
    fn on_row_added(&mut self, _index: usize) {}

    /// The row at `index` was deleted; later rows moved up by one
    fn on_row_removed(&mut self, _index: usize) {}

    /// A recomputation pass finished
    fn on_recomputed(&mut self, _status: RecalcStatus, _derived: &[Option<DerivedValues>]) {}
}

/// Observer that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl SessionObserver for NullObserver {}

/// Flag marking that the engine is writing its own output
#[derive(Debug, Default, Clone)]
pub struct UpdateFlag(Rc<Cell<bool>>);

impl UpdateFlag {
    pub fn is_active(&self) -> bool {
        self.0.get()
    }

    /// Raise the flag until the returned scope is dropped
    pub fn enter(&self) -> UpdateScope {
        let previous = self.0.replace(true);
        UpdateScope {
            flag: Rc::clone(&self.0),
            previous,
        }
    }
}

/// Holds the update flag raised; restores it on drop, whatever the exit path
#[derive(Debug)]
#[must_use = "the update flag drops as soon as the scope does"]
pub struct UpdateScope {
    flag: Rc<Cell<bool>>,
    previous: bool,
}

impl Drop for UpdateScope {
    fn drop(&mut self) {
        self.flag.set(self.previous);
    }
}

/// Counters describing the work a session has done
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SessionStats {
    /// Recomputation passes run
    pub passes: u64,
    /// Cell-change notifications dropped because the engine raised them
    pub suppressed: u64,
}

/// One editing session over one factory table
pub struct Session<O: SessionObserver = NullObserver> {
    table: FactoryTable,
    observer: O,
    updating: UpdateFlag,
    last: Option<Recalculation>,
    stats: SessionStats,
}

impl Session<NullObserver> {
    /// A session nobody is listening to
    pub fn new() -> Self {
        Self::with_observer(NullObserver)
    }
}

impl Default for Session<NullObserver> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: SessionObserver> Session<O> {
    pub fn with_observer(observer: O) -> Self {
        Self {
            table: FactoryTable::new(),
            observer,
            updating: UpdateFlag::default(),
            last: None,
            stats: SessionStats::default(),
        }
    }

    /// Add a factory; on success the new row's index is returned after the
    /// table has been recomputed
    pub fn on_add_factory(
        &mut self,
        name: &str,
        production_share: f64,
        defect_rate: f64,
    ) -> Result<usize, ValidationError> {
        let index = self
            .table
            .add_row(name, production_share, defect_rate)
            .inspect_err(|e| warn!(error = %e, "factory not added"))?;

        debug!(index, name = name.trim(), production_share, defect_rate, "factory added");
        self.observer.on_row_added(index);
        self.recompute();
        Ok(index)
    }

    /// Delete the factory at `index` and recompute over the remaining rows
    pub fn on_remove_factory(&mut self, index: usize) -> Result<FactoryRow, ValidationError> {
        let removed = self
            .table
            .remove_row(index)
            .inspect_err(|e| warn!(error = %e, "factory not removed"))?;

        debug!(index, name = %removed.name, "factory removed");
        self.observer.on_row_removed(index);
        self.recompute();
        Ok(removed)
    }

    /// Store edited cell text for one input field, then recompute
    ///
    /// The text is never rejected; unusable text reads as 0%.
    pub fn on_input_edited(
        &mut self,
        index: usize,
        field: InputField,
        raw: &str,
    ) -> Result<(), ValidationError> {
        self.table.set_input(index, field, raw)?;
        debug!(index, %field, raw, "input edited");
        self.on_cell_changed(index, field.into());
        Ok(())
    }

    /// Rename a factory; names take no part in the calculation
    pub fn on_name_edited(&mut self, index: usize, name: &str) -> Result<(), ValidationError> {
        self.table.rename(index, name)?;
        self.on_cell_changed(index, Column::Name);
        Ok(())
    }

    /// Cell-change notification channel
    ///
    /// Returns whether the change triggered a recomputation pass. Changes
    /// raised while the engine writes its own output are dropped, as are
    /// changes to columns that do not feed the engine.
    pub fn on_cell_changed(&mut self, index: usize, column: Column) -> bool {
        if self.updating.is_active() {
            self.stats.suppressed += 1;
            trace!(index, ?column, "change notification suppressed during update");
            return false;
        }
        if !column.is_input() {
            return false;
        }
        self.recompute();
        true
    }

    /// Run one full recomputation pass and write the results back
    pub fn recompute(&mut self) -> RecalcStatus {
        let _scope = self.updating.enter();

        let result = engine::recalculate(self.table.all_rows());
        self.stats.passes += 1;
        debug!(
            pass = self.stats.passes,
            status = %result.status,
            total_share = result.total_share,
            p_defect = ?result.p_defect,
            "recomputed"
        );

        for (index, derived) in result.derived.iter().enumerate() {
            for column in self.table.set_derived(index, *derived) {
                self.on_cell_changed(index, column);
            }
        }

        let status = result.status;
        self.observer.on_recomputed(status, &result.derived);
        self.last = Some(result);
        status
    }

    pub fn table(&self) -> &FactoryTable {
        &self.table
    }

    pub fn row(&self, index: usize) -> Option<&FactoryRow> {
        self.table.get_row(index)
    }

    pub fn rows(&self) -> &[FactoryRow] {
        self.table.all_rows()
    }

    /// Result of the most recent pass, if any pass has run
    pub fn last_recalculation(&self) -> Option<&Recalculation> {
        self.last.as_ref()
    }

    /// Status of the most recent pass; an untouched session is invalid
    pub fn status(&self) -> RecalcStatus {
        self.last
            .as_ref()
            .map_or(RecalcStatus::InvalidSum, |r| r.status)
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// Whether the engine is currently writing its output
    pub fn is_updating(&self) -> bool {
        self.updating.is_active()
    }
}
