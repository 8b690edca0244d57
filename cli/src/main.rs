use clap::{Parser, Subcommand};

mod commands;
mod logger;

#[derive(Parser, Debug)]
#[command(version, about = "Minesweeper field engine and deduction solver", long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play the server role: load a map, then apply `row column action` turns from stdin
    Serve(commands::serve::ServeArgs),
    /// Play the client role for one turn: read a masked view from stdin and print an action
    Decide(commands::decide::DecideArgs),
    /// Let the solver play a whole game against the engine
    Play(commands::play::PlayArgs),
    /// Print a random map in loader format
    Generate(commands::generate::GenerateArgs),
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init(args.verbose.log_level_filter())?;
    log::debug!("{args:?}");

    match args.command {
        Command::Serve(args) => commands::serve::run(args),
        Command::Decide(args) => commands::decide::run(args),
        Command::Play(args) => commands::play::run(args),
        Command::Generate(args) => commands::generate::run(args),
    }
}
