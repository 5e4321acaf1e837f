use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "streamtag")]
#[command(
    author,
    version,
    about = "Rewrite media stream titles and languages in place"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Probe a media file and list its streams
    Probe {
        /// File to probe
        #[arg(required = true)]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Set the title of every stream and keep language tags
    Retag {
        /// Files to rewrite
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Title written to the container and every kept stream
        #[arg(short, long)]
        title: String,

        /// Show the ffmpeg command without running it
        #[arg(long)]
        dry_run: bool,

        /// Number of files edited concurrently (defaults to config)
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Output results as JSON lines
        #[arg(long)]
        json: bool,
    },

    /// Attach a file (e.g. cover art) to a media container
    Attach {
        /// Media file to modify
        #[arg(required = true)]
        file: PathBuf,

        /// File to embed
        #[arg(required = true)]
        attachment: PathBuf,
    },

    /// Check that required external tools are available
    CheckTools,

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },
}
