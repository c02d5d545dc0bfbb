use clap::Parser;
use miette::Result;
use bft::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, piping to `head`, `grep -q`, etc. causes a panic on broken pipe.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    // Install miette's fancy error handler for beautiful diagnostics
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;

    bft::logging::init(global.verbose, global.quiet);

    match cli.command {
        Commands::Calc(args) => bft::cli::commands::calc::run(args, &global),
        Commands::Session(args) => bft::cli::commands::session::run(args, &global),
        Commands::Columns => bft::cli::commands::columns::run(),
        Commands::Config(cmd) => bft::cli::commands::config::run(cmd, &global),
        Commands::Completions(args) => bft::cli::commands::completions::run(args),
    }
}
