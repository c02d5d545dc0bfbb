//! Shared helper functions for CLI commands

use miette::Result;
use std::path::PathBuf;

use crate::core::loader::{load_scenario, seed_session};
use crate::core::session::{Session, SessionObserver};
use crate::entities::scenario::{PercentValue, Scenario, ScenarioFactory};

/// Factories given on the command line, from a file and/or `--factory` flags
#[derive(clap::Args, Debug, Clone, Default)]
pub struct FactoryInputArgs {
    /// Factory as NAME=SHARE,DEFECT (percentages, '%' optional); repeatable
    #[arg(long = "factory", short = 'F', value_name = "NAME=SHARE,DEFECT", value_parser = parse_factory_arg)]
    pub factories: Vec<ScenarioFactory>,

    /// Read factories from a YAML or CSV scenario file (loaded before --factory)
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,
}

impl FactoryInputArgs {
    /// Whether any factory source was given
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty() && self.file.is_none()
    }

    /// Feed the file's factories, then the flag factories, into `session`
    pub fn seed<O: SessionObserver>(&self, session: &mut Session<O>) -> Result<()> {
        if let Some(path) = &self.file {
            let scenario = load_scenario(path)?;
            seed_session(session, &scenario)?;
        }
        let flags = Scenario {
            factories: self.factories.clone(),
        };
        seed_session(session, &flags)?;
        Ok(())
    }
}

/// Parse `NAME=SHARE,DEFECT`, e.g. `Plant A=60%,5`
///
/// Only the shape is checked here; the numbers are validated when the
/// factory is added to the table.
pub fn parse_factory_arg(s: &str) -> std::result::Result<ScenarioFactory, String> {
    let (name, values) = s
        .rsplit_once('=')
        .ok_or_else(|| format!("expected NAME=SHARE,DEFECT, got '{}'", s))?;
    let (share, defect) = values
        .split_once(',')
        .ok_or_else(|| format!("expected SHARE,DEFECT after '=', got '{}'", values))?;

    if name.trim().is_empty() {
        return Err("factory name cannot be empty".to_string());
    }

    Ok(ScenarioFactory {
        name: name.trim().to_string(),
        share: PercentValue::Text(share.trim().to_string()),
        defect: PercentValue::Text(defect.trim().to_string()),
    })
}

/// Truncate a string to max_len characters, adding "..." if truncated
///
/// Widths below 4 leave no room for the ellipsis and cut hard instead.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len < 4 {
        s.chars().take(max_len).collect()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
