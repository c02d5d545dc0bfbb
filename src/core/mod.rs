//! Core module - table, engine and session

pub mod config;
pub mod engine;
pub mod loader;
pub mod percent;
pub mod session;
pub mod table;

pub use config::Config;
pub use engine::{recalculate, RecalcStatus, Recalculation};
pub use loader::{load_scenario, ScenarioError};
pub use percent::{format_percent, parse_percent, PercentText};
pub use session::{NullObserver, Session, SessionObserver, SessionStats, UpdateFlag, UpdateScope};
pub use table::{FactoryTable, ValidationError};
