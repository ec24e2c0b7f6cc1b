mod cli;

use std::error::Error;

use clap::Parser;
use cli::Cli;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        cli::Command::Read(args) => cli::read::handle_read_command(args)?,
        cli::Command::Diff(args) => cli::diff::handle_diff_command(args)?,
        cli::Command::Explain(args) => cli::explain::handle_explain_command(args)?,
    }

    Ok(())
}
