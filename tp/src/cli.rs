//! Command-line interface

use clap::Parser;
use std::path::PathBuf;

/// RAG-backed travel itinerary planning service
#[derive(Debug, Parser)]
#[command(name = "tp", version, about)]
pub struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the configured listen port
    #[arg(short, long)]
    pub port: Option<u16>,
}
