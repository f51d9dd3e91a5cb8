use clap::{Parser, Subcommand};
use std::process;
use tracing::error;

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Simulate a play and print its performance breakdown.
    Simulate(cmd::simulate::SimulateArgs),
    /// Print a map's difficulty and attributes under a modifier set.
    Info(cmd::info::InfoArgs),
}

fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Simulate(args) => cmd::simulate::run(args),
        Commands::Info(args) => cmd::info::run(args),
    };

    if let Err(e) = result {
        error!("{e}");
        process::exit(1);
    }
}
