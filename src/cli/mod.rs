pub mod batch;
pub mod completions;
pub mod init;
pub mod slice;
pub mod validate;

use clap::{Parser, Subcommand};

/// gridslice - overlay grids on images and export every cell as a PNG
#[derive(Parser, Debug)]
#[command(name = "gridslice")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Print extra detail while working
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Slice one image with one grid
    Slice(slice::SliceArgs),

    /// Slice every grid in a slice.yaml project against every image
    Batch(batch::BatchArgs),

    /// Check a slice.yaml project without writing anything
    Validate(validate::ValidateArgs),

    /// Write a starter slice.yaml
    Init(init::InitArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}
