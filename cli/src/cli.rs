//! Command-line interface for alteris

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "alteris")]
#[command(about = "Compare two versions of a tabular dataset and find the differences")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a difference report between a base and a current dataset
    Diff {
        /// Base (old) dataset file
        base: PathBuf,

        /// Current (new) dataset file
        current: PathBuf,

        /// Key column(s) that uniquely identify a row, comma-separated
        #[arg(long, value_delimiter = ',', required = true)]
        keys: Vec<String>,

        /// Export the report as workbook sheets into this directory
        #[arg(long)]
        export: Option<PathBuf>,

        /// Overwrite an existing export directory
        #[arg(long)]
        force: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compare the schemas of two datasets
    Schema {
        /// Base (old) dataset file
        base: PathBuf,

        /// Current (new) dataset file
        current: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Profile one column across both dataset versions
    Profile {
        /// Base (old) dataset file
        base: PathBuf,

        /// Current (new) dataset file
        current: PathBuf,

        /// Column to profile (must exist in both datasets)
        column: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
