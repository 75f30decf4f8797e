//! CLI argument parsing for buildlens

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "buildlens")]
#[command(version)]
#[command(about = "Build-performance analysis and optimization suggestions for C/C++ build traces", long_about = None)]
pub struct Cli {
    /// Enable debug tracing output to stderr
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate ranked optimization suggestions
    Suggest {
        /// Normalized build trace (JSON)
        #[arg(short, long, value_name = "FILE")]
        trace: PathBuf,

        /// Analysis configuration (TOML)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Source tree used to inspect header symbols for split proposals
        #[arg(long = "source-root", value_name = "DIR")]
        source_root: Option<PathBuf>,

        /// Seed for header split clustering (overrides the config)
        #[arg(long, value_name = "N")]
        seed: Option<u64>,

        /// Output format (text or json)
        #[arg(long = "format", value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Plan changes to the precompiled header
    Pch {
        /// Normalized build trace (JSON)
        #[arg(short, long, value_name = "FILE")]
        trace: PathBuf,

        /// Headers currently in the PCH
        #[arg(long = "current", value_name = "HEADER", num_args = 1..)]
        current: Vec<String>,

        /// Maximum number of headers to add
        #[arg(long = "top", value_name = "N", default_value = "10")]
        top: usize,

        /// Minimum share of units including a header (0-1)
        #[arg(long = "min-ratio", value_name = "RATIO", default_value = "0.3")]
        min_ratio: f64,

        /// Output format (text or json)
        #[arg(long = "format", value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Report the most expensive template instantiations
    Templates {
        /// Normalized build trace (JSON)
        #[arg(short, long, value_name = "FILE")]
        trace: PathBuf,

        /// Number of templates to report
        #[arg(long = "top", value_name = "N", default_value = "20")]
        top: usize,

        /// Minimum accumulated time in milliseconds
        #[arg(long = "threshold", value_name = "MS", default_value = "0")]
        threshold: f64,

        /// Output format (text or json)
        #[arg(long = "format", value_enum, default_value = "text")]
        format: OutputFormat,
    },
}
