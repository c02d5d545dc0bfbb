//! Scenario loading
//!
//! Reads a set of factories from a YAML or CSV file and feeds them into a
//! session as ordinary add events. Files are only ever read.

use miette::Diagnostic;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::core::session::{Session, SessionObserver};
use crate::core::table::ValidationError;
use crate::entities::scenario::{PercentValue, Scenario, ScenarioFactory};
use crate::yaml::{parse_yaml, YamlError};

/// Errors raised while reading or applying a scenario file
#[derive(Debug, Error, Diagnostic)]
pub enum ScenarioError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Yaml(#[from] YamlError),

    #[error("cannot read {}: {source}", path.display())]
    #[diagnostic(code(bft::scenario::io))]
    Io {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[error("invalid CSV scenario: {0}")]
    #[diagnostic(
        code(bft::scenario::csv),
        help("expected a header row `name,share,defect` followed by one factory per line")
    )]
    Csv(#[from] csv::Error),

    #[error("factory #{row} ({name}) rejected")]
    #[diagnostic(code(bft::scenario::invalid_factory))]
    InvalidFactory {
        row: usize,
        name: String,
        #[diagnostic_source]
        source: ValidationError,
    },
}

/// CSV rows carry every field as text
#[derive(Debug, Deserialize)]
struct CsvFactory {
    name: String,
    #[serde(alias = "production_share")]
    share: String,
    #[serde(alias = "defect_rate")]
    defect: String,
}

/// Load a scenario; `.csv` files are read as CSV, everything else as YAML
pub fn load_scenario(path: &Path) -> Result<Scenario, ScenarioError> {
    let content = std::fs::read_to_string(path).map_err(|source| ScenarioError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let is_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    if is_csv {
        parse_csv_scenario(&content)
    } else {
        Ok(parse_yaml(&content, &path.display().to_string())?)
    }
}

/// Parse CSV text with a `name,share,defect` header
pub fn parse_csv_scenario(content: &str) -> Result<Scenario, ScenarioError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let factories = reader
        .deserialize::<CsvFactory>()
        .map(|record| {
            record.map(|r| ScenarioFactory {
                name: r.name,
                share: PercentValue::Text(r.share),
                defect: PercentValue::Text(r.defect),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Scenario { factories })
}

/// Add every factory of `scenario` to `session`, in order
///
/// Stops at the first factory the table rejects; rows added before it stay.
pub fn seed_session<O: SessionObserver>(
    session: &mut Session<O>,
    scenario: &Scenario,
) -> Result<(), ScenarioError> {
    for (i, factory) in scenario.factories.iter().enumerate() {
        let invalid = |source| ScenarioError::InvalidFactory {
            row: i + 1,
            name: factory.name.clone(),
            source,
        };
        let share = factory.share.resolve().map_err(invalid)?;
        let defect = factory.defect.resolve().map_err(invalid)?;
        session
            .on_add_factory(&factory.name, share, defect)
            .map_err(invalid)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::engine::RecalcStatus;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_load_yaml_scenario() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("plants.yaml");
        fs::write(
            &path,
            "factories:\n  - name: F1\n    share: 60\n    defect: 5\n  - name: F2\n    share: 40%\n    defect: 10%\n",
        )
        .unwrap();

        let scenario = load_scenario(&path).unwrap();
        assert_eq!(scenario.factories.len(), 2);

        let mut session = Session::new();
        seed_session(&mut session, &scenario).unwrap();
        assert_eq!(session.status(), RecalcStatus::Ok);
        assert_eq!(session.rows().len(), 2);
    }

    #[test]
    fn test_load_csv_scenario() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("plants.CSV");
        fs::write(&path, "name,share,defect\nF1, 60%, 5\nF2,40,10%\n").unwrap();

        let scenario = load_scenario(&path).unwrap();
        assert_eq!(scenario.factories[0].name, "F1");
        assert_eq!(scenario.factories[0].share.resolve().unwrap(), 60.0);
        assert_eq!(scenario.factories[1].defect.resolve().unwrap(), 10.0);
    }

    #[test]
    fn test_csv_with_missing_column_fails() {
        let err = parse_csv_scenario("name,share\nF1,60\n").unwrap_err();
        assert!(matches!(err, ScenarioError::Csv(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_scenario(Path::new("/nonexistent/plants.yaml")).unwrap_err();
        assert!(matches!(err, ScenarioError::Io { .. }));
    }

    #[test]
    fn test_seed_stops_at_rejected_factory() {
        let scenario = parse_csv_scenario("name,share,defect\nF1,60,5\n,40,10\nF3,0,0\n").unwrap();
        let mut session = Session::new();

        let err = seed_session(&mut session, &scenario).unwrap_err();
        match err {
            ScenarioError::InvalidFactory { row, source, .. } => {
                assert_eq!(row, 2);
                assert_eq!(source, ValidationError::EmptyName);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(session.rows().len(), 1);
    }

    #[test]
    fn test_seed_rejects_malformed_percent() {
        let scenario = parse_csv_scenario("name,share,defect\nF1,sixty,5\n").unwrap();
        let mut session = Session::new();
        let err = seed_session(&mut session, &scenario).unwrap_err();
        assert!(matches!(
            err,
            ScenarioError::InvalidFactory {
                source: ValidationError::MalformedPercent { .. },
                ..
            }
        ));
        assert!(session.rows().is_empty());
    }
}
