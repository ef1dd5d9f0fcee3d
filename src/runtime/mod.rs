use clap::Parser;

mod cli;
mod commands;
mod import;
mod logging;
mod settings;

#[cfg(test)]
mod tests;

pub use cli::{Cli, Command};
pub use import::{record_outcome, submit_import};
pub use settings::load_settings;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init();
    let settings = load_settings();

    commands::execute(cli.command, &settings)
}
