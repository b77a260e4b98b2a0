use clap::Parser;
use std::path::PathBuf;

/// Reads one action event per line on stdin and writes one response envelope per line on stdout.
#[derive(Debug, Parser)]
#[command(name = "course-search", version)]
#[command(about = "Course search action server over stdio", long_about = None)]
pub struct Cli {
    /// Configuration file (default: $COURSE_SEARCH_CONFIG, then the user config directory)
    #[arg(long)]
    pub config: Option<String>,

    /// JSON file of course records, overriding `store.records_path`
    #[arg(long)]
    pub records: Option<PathBuf>,
}
