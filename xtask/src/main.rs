mod findup;
mod matrix;

use clap::{Parser, Subcommand};

/// xtask command-line interface
#[derive(Parser)]
#[command(name = "xtask", version, about = "platform-flags auxiliary tasks")]
struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    command: Command,
}

/// Supported subcommands
#[derive(Subcommand)]
enum Command {
    /// Configure every combination listed in `matrix.yaml`
    Matrix(matrix::MatrixArgs),
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Command::Matrix(args) => {
            if let Err(e) = matrix::run(args) {
                eprintln!("Error: {:#}", e);
                std::process::exit(1);
            }
        }
    }
}
