pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "catalog",
    about = "Catalog operator CLI",
    long_about = "Apply catalog migrations, load the demo fixture, and inspect effective configuration.",
    after_help = "Examples:\n  catalog migrate\n  catalog seed\n  catalog config"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(about = "Load the deterministic catalog fixture and verify every seeded row")]
    Seed,
    #[command(
        about = "Inspect effective configuration values and discount rules with source attribution"
    )]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Migrate => commands::migrate::run(),
        Command::Seed => commands::seed::run(),
        Command::Config => commands::config::run(),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
