pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "storefront",
    about = "Storefront operator CLI",
    long_about = "Operate the storefront catalog store: migrations, seeding, config inspection, and readiness checks.",
    after_help = "Examples:\n  storefront doctor --json\n  storefront seed\n  storefront products"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(about = "Insert the bootstrap catalog when the store is empty")]
    Seed,
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
    #[command(about = "Validate config, DB connectivity, and catalog readiness")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Print the stored catalog as JSON")]
    Products,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Migrate => commands::migrate::run(),
        Command::Seed => commands::seed::run(),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
        Command::Products => commands::products::run(),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
