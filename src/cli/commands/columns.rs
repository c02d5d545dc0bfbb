//! `bft columns` command - describe the table columns

use miette::Result;

use crate::cli::output::render_columns;

pub fn run() -> Result<()> {
    print!("{}", render_columns());
    Ok(())
}
