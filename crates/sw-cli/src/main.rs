//! Stepwise CLI - versioned schema migrations across SQL dialects

use clap::Parser;

mod cli;
mod commands;
mod context;

use cli::Cli;
use commands::common::ExitCode;
use commands::{init, list, migrate, validate};
use sw_runner::Direction;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match &cli.command {
        cli::Commands::Init(args) => init::execute(args).await,
        cli::Commands::Up(args) => migrate::execute(Direction::Up, args, &cli.global).await,
        cli::Commands::Down(args) => migrate::execute(Direction::Down, args, &cli.global).await,
        cli::Commands::List(args) => list::execute(args, &cli.global).await,
        cli::Commands::Validate(args) => validate::execute(args, &cli.global).await,
    };

    if let Err(err) = result {
        if let Some(ExitCode(code)) = err.downcast_ref::<ExitCode>() {
            std::process::exit(*code);
        }
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
