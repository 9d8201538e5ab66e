// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand, ValueEnum};
use mollycam::{ExportRequest, Facing};
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "mollycam")]
#[command(about = "Take a photo and share, download, or print it")]
#[command(version)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
    /// Synthetic gradient, one per facing
    TestPattern,
    /// Video4Linux capture devices
    V4l2,
    /// A still image file standing in for the camera
    Image,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ShareKind {
    /// No share target; share requests fall back to download
    None,
    /// Hand the photo to the desktop's default handler
    System,
}

#[derive(Subcommand)]
enum Commands {
    /// Capture one photo and export it
    Snap {
        /// Frame source
        #[arg(short, long, value_enum, default_value = "test-pattern")]
        source: SourceKind,

        /// Image file for the `image` source
        #[arg(long, required_if_eq("source", "image"))]
        image: Option<PathBuf>,

        /// Camera to start with (front or rear)
        #[arg(short, long)]
        facing: Option<Facing>,

        /// Flip to the other camera before capturing
        #[arg(long)]
        flip: bool,

        /// Export channel: best, share, download, or document
        #[arg(short, long, default_value = "best")]
        export: ExportRequest,

        /// Output directory for downloads and documents
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Share target
        #[arg(long, value_enum, default_value = "none")]
        share: ShareKind,

        /// Print the export report as JSON
        #[arg(long)]
        json: bool,
    },

    /// List export channels usable with the given share target
    Channels {
        /// Share target
        #[arg(long, value_enum, default_value = "none")]
        share: ShareKind,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=mollycam=debug, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();
    let config = cli::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Snap {
            source,
            image,
            facing,
            flip,
            export,
            out,
            share,
            json,
        } => cli::snap(
            config,
            cli::SnapOptions {
                source,
                image,
                facing,
                flip,
                export,
                out,
                share,
                json,
            },
        ),
        Commands::Channels { share } => cli::list_channels(config, share),
    }
}
