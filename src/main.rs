use clap::Parser;
use gridslice::cli::{Cli, Commands};
use gridslice::output::Printer;
use miette::Result;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let printer = Printer::new().with_verbose(cli.verbose);

    match cli.command {
        Commands::Slice(args) => {
            gridslice::cli::slice::run(args, &printer)?;
        }
        Commands::Batch(args) => {
            gridslice::cli::batch::run(args, &printer)?;
        }
        Commands::Validate(args) => {
            gridslice::cli::validate::run(args, &printer)?;
        }
        Commands::Init(args) => {
            gridslice::cli::init::run(args, &printer)?;
        }
        Commands::Completions(args) => gridslice::cli::completions::run(args)?,
    }

    Ok(())
}
