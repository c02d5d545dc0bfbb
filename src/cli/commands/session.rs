//! `bft session` command - interactive factory table editor
//!
//! Every add, delete or percentage edit recalculates the whole table and
//! prints it again. Bad percentage text is accepted and counts as 0%.

use console::{style, Term};
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::FactoryInputArgs;
use crate::cli::output::{effective_format, render, render_columns, Report};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::engine::RecalcStatus;
use crate::core::percent::parse_percent_strict;
use crate::core::session::{Session, SessionObserver};
use crate::core::Config;
use crate::entities::factory::{DerivedValues, InputField};

#[derive(clap::Args, Debug)]
pub struct SessionArgs {
    #[command(flatten)]
    pub input: FactoryInputArgs,
}

/// Prints session notifications to the terminal
#[derive(Debug, Default)]
pub struct ConsoleObserver {
    quiet: bool,
}

impl ConsoleObserver {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl SessionObserver for ConsoleObserver {
    fn on_row_added(&mut self, index: usize) {
        if !self.quiet {
            println!("{} Added factory #{}", style("✓").green(), index + 1);
        }
    }

    fn on_row_removed(&mut self, index: usize) {
        if !self.quiet {
            println!("{} Removed factory #{}", style("✓").green(), index + 1);
        }
    }

    fn on_recomputed(&mut self, status: RecalcStatus, derived: &[Option<DerivedValues>]) {
        tracing::debug!(%status, rows = derived.len(), "table refreshed");
    }
}

const ACTIONS: [&str; 8] = [
    "Show table",
    "Add factory",
    "Remove factory",
    "Edit production share P(F)",
    "Edit defect rate P(D|F)",
    "Rename factory",
    "Column help",
    "Quit",
];

pub fn run(args: SessionArgs, global: &GlobalOpts) -> Result<()> {
    if !Term::stdout().is_term() {
        return Err(miette::miette!(
            help = "use `bft calc` for non-interactive use",
            "bft session needs an interactive terminal"
        ));
    }

    let config = Config::load();
    let format = match effective_format(global.format, &config) {
        // Structured formats make no sense between prompts
        OutputFormat::Json | OutputFormat::Yaml | OutputFormat::Csv => OutputFormat::Tsv,
        other => other,
    };
    let theme = ColorfulTheme::default();

    let mut session = Session::with_observer(ConsoleObserver::new(global.quiet));
    args.input.seed(&mut session)?;
    show(&session, format)?;

    loop {
        let action = Select::with_theme(&theme)
            .with_prompt("Action")
            .items(&ACTIONS)
            .default(0)
            .interact()
            .into_diagnostic()?;

        let outcome = match action {
            0 => show(&session, format),
            1 => add(&mut session, &theme),
            2 => remove(&mut session, &theme, config.confirm_delete()),
            3 => edit(&mut session, &theme, InputField::ProductionShare),
            4 => edit(&mut session, &theme, InputField::DefectRate),
            5 => rename(&mut session, &theme),
            6 => {
                print!("{}", render_columns());
                Ok(Changed::No)
            }
            _ => break,
        };

        match outcome {
            Ok(Changed::Yes) => {
                show(&session, format)?;
            }
            Ok(Changed::No) => {}
            Err(e) => eprintln!("{} {}", style("✗").red(), e),
        }
    }

    Ok(())
}

/// Whether an action modified the table
enum Changed {
    Yes,
    No,
}

fn show<O: SessionObserver>(session: &Session<O>, format: OutputFormat) -> Result<Changed> {
    let report = Report::from_session(session);
    println!();
    print!("{}", render(&report, format)?);
    println!();
    Ok(Changed::No)
}

fn add(session: &mut Session<ConsoleObserver>, theme: &ColorfulTheme) -> Result<Changed> {
    let name: String = Input::with_theme(theme)
        .with_prompt("Factory name")
        .allow_empty(true)
        .interact_text()
        .into_diagnostic()?;

    let share = prompt_percent(theme, "Production share P(F) %")?;
    let defect = prompt_percent(theme, "Defect rate P(D|F) %")?;

    session.on_add_factory(&name, share, defect)?;
    Ok(Changed::Yes)
}

fn remove(
    session: &mut Session<ConsoleObserver>,
    theme: &ColorfulTheme,
    confirm: bool,
) -> Result<Changed> {
    let Some(index) = pick_row(session, theme, "Factory to remove")? else {
        return Ok(Changed::No);
    };

    if confirm {
        let name = session.row(index).map(|r| r.name.clone()).unwrap_or_default();
        let proceed = Confirm::with_theme(theme)
            .with_prompt(format!("Remove factory '{}'?", name))
            .default(false)
            .interact()
            .into_diagnostic()?;
        if !proceed {
            return Ok(Changed::No);
        }
    }

    session.on_remove_factory(index)?;
    Ok(Changed::Yes)
}

fn edit(
    session: &mut Session<ConsoleObserver>,
    theme: &ColorfulTheme,
    field: InputField,
) -> Result<Changed> {
    let prompt = match field {
        InputField::ProductionShare => "Factory whose share to edit",
        InputField::DefectRate => "Factory whose defect rate to edit",
    };
    let Some(index) = pick_row(session, theme, prompt)? else {
        return Ok(Changed::No);
    };

    let current = session
        .row(index)
        .map(|r| r.input(field).as_str().trim_end_matches('%').to_string())
        .unwrap_or_default();

    let raw: String = Input::with_theme(theme)
        .with_prompt(format!("New {} %", field))
        .with_initial_text(current)
        .allow_empty(true)
        .interact_text()
        .into_diagnostic()?;

    // Stored with a trailing '%' like every other percentage cell
    let text = if raw.trim().ends_with('%') {
        raw.trim().to_string()
    } else {
        format!("{}%", raw.trim())
    };
    session.on_input_edited(index, field, &text)?;
    Ok(Changed::Yes)
}

fn rename(session: &mut Session<ConsoleObserver>, theme: &ColorfulTheme) -> Result<Changed> {
    let Some(index) = pick_row(session, theme, "Factory to rename")? else {
        return Ok(Changed::No);
    };
    let current = session.row(index).map(|r| r.name.clone()).unwrap_or_default();

    let name: String = Input::with_theme(theme)
        .with_prompt("New name")
        .with_initial_text(current)
        .allow_empty(true)
        .interact_text()
        .into_diagnostic()?;

    session.on_name_edited(index, &name)?;
    Ok(Changed::Yes)
}

/// Let the user choose a row; `None` when the table is empty
fn pick_row<O: SessionObserver>(
    session: &Session<O>,
    theme: &ColorfulTheme,
    prompt: &str,
) -> Result<Option<usize>> {
    if session.rows().is_empty() {
        println!("{}", style("No factories yet. Add one first.").dim());
        return Ok(None);
    }

    let items: Vec<String> = session
        .rows()
        .iter()
        .enumerate()
        .map(|(i, row)| format!("#{} {}", i + 1, row.name))
        .collect();

    let index = Select::with_theme(theme)
        .with_prompt(prompt)
        .items(&items)
        .default(0)
        .interact()
        .into_diagnostic()?;
    Ok(Some(index))
}

/// Ask for a percentage, re-prompting until it is valid
fn prompt_percent(theme: &ColorfulTheme, prompt: &str) -> Result<f64> {
    let text = Input::<String>::with_theme(theme)
        .with_prompt(prompt)
        .validate_with(|text: &String| -> std::result::Result<(), String> {
            parse_percent_strict(text)
                .map(|_| ())
                .map_err(|e| e.to_string())
        })
        .interact_text()
        .into_diagnostic()?;
    parse_percent_strict(&text).map_err(Into::into)
}
