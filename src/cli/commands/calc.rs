//! `bft calc` command - one-shot calculation
//!
//! Factories are added one by one through a session, exactly as the
//! interactive editor would, and the final table is printed.

use miette::Result;
use tracing::info;

use crate::cli::helpers::FactoryInputArgs;
use crate::cli::output::{effective_format, render, Report};
use crate::cli::GlobalOpts;
use crate::core::engine::RecalcStatus;
use crate::core::session::Session;
use crate::core::Config;

#[derive(clap::Args, Debug)]
pub struct CalcArgs {
    #[command(flatten)]
    pub input: FactoryInputArgs,

    /// Fail if the production shares do not add up to 100%
    #[arg(long)]
    pub strict: bool,
}

pub fn run(args: CalcArgs, global: &GlobalOpts) -> Result<()> {
    if args.input.is_empty() {
        return Err(miette::miette!(
            help = "e.g. bft calc -F \"Plant A=60,5\" -F \"Plant B=40,10\"",
            "No factories given (use --factory or --file)"
        ));
    }

    let config = Config::load();
    let format = effective_format(global.format, &config);

    let mut session = Session::new();
    args.input.seed(&mut session)?;
    info!(rows = session.rows().len(), status = %session.status(), "calculation finished");

    let report = Report::from_session(&session);
    print!("{}", render(&report, format)?);

    if args.strict && session.status() == RecalcStatus::InvalidSum {
        return Err(miette::miette!(
            "production shares add up to {}, not 100%",
            report.total_share
        ));
    }

    Ok(())
}
