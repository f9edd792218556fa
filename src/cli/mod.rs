mod commands;
pub mod exit_codes;
pub mod output;

pub use commands::{Cli, Commands, ConfigCommands, LinkKeyCommands};

use anyhow::Result;

/// errors that escape a command are reported in the active output mode with exit code 1
pub fn run(cli: Cli) -> Result<()> {
    let mode = output::OutputMode::from_flags(cli.json, cli.no_json, cli.quiet);
    if let Err(e) = commands::execute(cli) {
        output::exit_with_error(mode, exit_codes::ERROR, &format!("{:#}", e), vec![]);
    }
    Ok(())
}
