//! CLI module - Command-line interface for Tsundoku
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};

use crate::domain::MediaKind;

/// Tsundoku - personal anime and manga tracker
#[derive(Parser)]
#[command(name = "tsundoku")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server (default)
    #[command(alias = "web")]
    Serve,

    /// Create default config file
    #[command(alias = "--init")]
    Init,

    /// List tracked entries
    #[command(alias = "ls", alias = "l")]
    List {
        /// anime or manga
        kind: MediaKind,
    },

    /// List year sections with their entries
    Sections {
        /// anime or manga
        kind: MediaKind,
    },

    /// Look up a title and add it
    #[command(alias = "a")]
    Add {
        /// anime or manga
        kind: MediaKind,
        /// Title to add
        #[arg(required = true)]
        title: Vec<String>,
        /// Year section to file the entry under
        #[arg(long)]
        section: Option<String>,
        /// Episodes watched or chapters read so far
        #[arg(long, default_value_t = 0)]
        progress: u32,
    },
}

pub use commands::*;
