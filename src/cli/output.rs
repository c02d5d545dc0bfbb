//! Output formatting for the factory table
//!
//! Every command renders through a [`Report`]: a snapshot of the table with
//! all cells already formatted, plus the status of the last pass.

use clap::ValueEnum;
use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::truncate_str;
use crate::cli::OutputFormat;
use crate::core::engine::{self, RecalcStatus};
use crate::core::percent::format_percent;
use crate::core::session::{Session, SessionObserver};
use crate::core::Config;
use crate::entities::factory::Column;

/// Determine the effective output format
///
/// `auto` resolves to the configured `default_format`, then to TSV.
pub fn effective_format(format: OutputFormat, config: &Config) -> OutputFormat {
    match format {
        OutputFormat::Auto => config
            .default_format
            .as_deref()
            .and_then(|name| OutputFormat::from_str(name, true).ok())
            .filter(|f| *f != OutputFormat::Auto)
            .unwrap_or(OutputFormat::Tsv),
        other => other,
    }
}

/// One table row with every cell as display text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    /// 1-based row number
    pub row: usize,
    pub name: String,
    pub production_share: String,
    pub defect_rate: String,
    pub non_defect_rate: Option<String>,
    pub factory_given_defect: Option<String>,
    pub factory_given_non_defect: Option<String>,
}

impl ReportRow {
    fn cells(&self) -> [String; 7] {
        let blank = |v: &Option<String>| v.clone().unwrap_or_default();
        [
            self.row.to_string(),
            self.name.clone(),
            self.production_share.clone(),
            self.defect_rate.clone(),
            blank(&self.non_defect_rate),
            blank(&self.factory_given_defect),
            blank(&self.factory_given_non_defect),
        ]
    }
}

/// Snapshot of a session for output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub status: RecalcStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    /// Sum of production shares, formatted
    pub total_share: String,
    /// P(D), formatted; absent while invalid
    pub p_defect: Option<String>,
    /// P(ND), formatted; absent while invalid
    pub p_non_defect: Option<String>,
    pub factories: Vec<ReportRow>,
}

impl Report {
    pub fn from_session<O: SessionObserver>(session: &Session<O>) -> Self {
        let status = session.status();
        let (total, p_defect) = match session.last_recalculation() {
            Some(r) => (r.total_share, r.p_defect),
            None => (engine::total_share(session.rows()), None),
        };

        let factories = session
            .rows()
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let derived = |column: Column| {
                    row.derived()
                        .and_then(|d| d.get(column))
                        .map(format_percent)
                };
                ReportRow {
                    row: i + 1,
                    name: row.name.clone(),
                    production_share: row.production_share.to_string(),
                    defect_rate: row.defect_rate.to_string(),
                    non_defect_rate: derived(Column::NonDefectRate),
                    factory_given_defect: derived(Column::FactoryGivenDefect),
                    factory_given_non_defect: derived(Column::FactoryGivenNonDefect),
                }
            })
            .collect();

        Self {
            status,
            message: status.message(),
            total_share: format_percent(total),
            p_defect: p_defect.map(|p| format_percent(p * 100.0)),
            p_non_defect: p_defect.map(|p| format_percent((1.0 - p) * 100.0)),
            factories,
        }
    }

    fn headers() -> [&'static str; 7] {
        let mut headers = ["#"; 7];
        for (slot, column) in headers[1..].iter_mut().zip(Column::ALL) {
            *slot = column.header();
        }
        headers
    }
}

/// Render a report in the given (already resolved) format
pub fn render(report: &Report, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(report).into_diagnostic()?;
            json.push('\n');
            Ok(json)
        }
        OutputFormat::Yaml => serde_yml::to_string(report).into_diagnostic(),
        OutputFormat::Csv => render_csv(report),
        OutputFormat::Md => Ok(render_markdown(report)),
        OutputFormat::Tsv | OutputFormat::Auto => Ok(render_tsv(report)),
    }
}

fn render_csv(report: &Report) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record([
            "row",
            "name",
            "production_share",
            "defect_rate",
            "non_defect_rate",
            "factory_given_defect",
            "factory_given_non_defect",
        ])
        .into_diagnostic()?;
    for row in &report.factories {
        writer.write_record(row.cells()).into_diagnostic()?;
    }
    let bytes = writer.into_inner().into_diagnostic()?;
    String::from_utf8(bytes).into_diagnostic()
}

fn render_markdown(report: &Report) -> String {
    let mut builder = Builder::default();
    builder.push_record(Report::headers());
    for row in &report.factories {
        builder.push_record(row.cells());
    }

    let mut output = builder.build().with(Style::markdown()).to_string();
    output.push_str("\n\n");
    output.push_str(&summary_line(report));
    output.push('\n');
    output
}

fn render_tsv(report: &Report) -> String {
    let mut output = String::new();
    let headers = Report::headers();

    output.push_str(&format!(
        "{:<4} {:<20} {:<9} {:<9} {:<9} {:<9} {:<9}\n",
        style(headers[0]).bold().dim(),
        style(headers[1]).bold(),
        style(headers[2]).bold(),
        style(headers[3]).bold(),
        style(headers[4]).bold(),
        style(headers[5]).bold(),
        style(headers[6]).bold(),
    ));
    output.push_str(&"-".repeat(75));
    output.push('\n');

    for row in &report.factories {
        let cells = row.cells();
        output.push_str(&format!(
            "{:<4} {:<20} {:<9} {:<9} {:<9} {:<9} {:<9}\n",
            style(&cells[0]).cyan(),
            truncate_str(&cells[1], 20),
            cells[2],
            cells[3],
            cells[4],
            style(&cells[5]).green(),
            cells[6],
        ));
    }

    output.push('\n');
    output.push_str(&summary_line(report));
    output.push('\n');
    output
}

/// One-line status summary shown under tables
pub fn summary_line(report: &Report) -> String {
    match report.status {
        RecalcStatus::Ok => format!(
            "{} factory(ies), P(D) = {}, P(ND) = {}",
            report.factories.len(),
            report.p_defect.as_deref().unwrap_or("-"),
            report.p_non_defect.as_deref().unwrap_or("-"),
        ),
        RecalcStatus::InvalidSum => format!(
            "{} {} (currently {})",
            style("!").yellow().bold(),
            style(report.message.unwrap_or(engine::INVALID_SUM_MESSAGE)).yellow(),
            report.total_share
        ),
    }
}

/// Descriptions of every table column
pub fn render_columns() -> String {
    let mut output = String::new();
    for column in Column::ALL {
        output.push_str(&format!(
            "{:<8} {}\n",
            style(column.header()).cyan().bold(),
            column.description()
        ));
    }
    output
}
