use clap::{Parser, Subcommand};
use miette::Result;
use std::path::PathBuf;

use condlet_rs::cli;

#[derive(Parser)]
#[command(name = "condlet")]
#[command(about = "Desugars declarations in if/while conditions into standard JavaScript")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Desugar the conditionals described in a JSON request
    Transform {
        /// Input JSON file (one conditional or an array)
        input: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Emit desugared loops without the surrounding block
        #[arg(long)]
        unwrapped_loops: bool,

        /// Keep block loop bodies nested instead of splicing them after the guard
        #[arg(long)]
        nested_loop_body: bool,
    },

    /// Validate the conditionals in a JSON request
    Check {
        /// Input JSON file (one conditional or an array)
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Transform {
            input,
            output,
            unwrapped_loops,
            nested_loop_body,
        } => {
            let args = cli::transform::TransformArgs {
                input_path: input,
                output_path: output,
                unwrapped_loops,
                nested_loop_body,
            };
            cli::transform::transform(&args)
        }
        Commands::Check { input } => cli::check::check(&input),
    }
}
