use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::models::NamePolicy;
use crate::utils::constants::{DEFAULT_ALIGNMENT_LOOKAHEAD, DEFAULT_BUFFER_SIZE, DEFAULT_WORKERS};
use crate::writers::OutputFormat;

#[derive(Parser)]
#[command(name = "station-stats")]
#[command(about = "Parallel per-station min/mean/max over large measurement files")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Aggregate every station in a `<name>;<value>` file
    Process {
        #[arg(short, long, help = "Input measurements file")]
        input_file: PathBuf,

        #[arg(short, long, default_value_t = DEFAULT_WORKERS)]
        workers: usize,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        #[arg(short, long, help = "Write the result here instead of stdout")]
        output_file: Option<PathBuf>,

        #[arg(long, help = "Scan through a memory map instead of buffered reads")]
        use_mmap: bool,

        #[arg(long, value_enum, default_value_t = NamePolicy::UppercaseInitial)]
        name_policy: NamePolicy,

        #[arg(long, default_value_t = DEFAULT_BUFFER_SIZE)]
        buffer_size: usize,

        #[arg(
            long,
            default_value_t = DEFAULT_ALIGNMENT_LOOKAHEAD,
            help = "Maximum bytes searched for a line start at each range boundary"
        )]
        lookahead: u64,

        #[arg(long, help = "Disable the progress bar")]
        no_progress: bool,
    },

    /// Show how a file would be split into byte ranges
    Plan {
        #[arg(short, long, help = "Input measurements file")]
        input_file: PathBuf,

        #[arg(short, long, default_value_t = DEFAULT_WORKERS)]
        workers: usize,

        #[arg(long, default_value_t = DEFAULT_ALIGNMENT_LOOKAHEAD)]
        lookahead: u64,
    },
}
