//! CLI argument parsing with clap.
//!
//! This module handles parsing command-line arguments and converting them
//! to the core `Command` type.

use clap::{Parser, Subcommand};
use doxsearch_core::{Command, Section};
use std::io::{self, ErrorKind};
use std::path::PathBuf;

const CLI_AFTER_HELP: &str = "\
Examples:
  doxsearch query forw                 Prefix search across all sections
  doxsearch query set_ -s functions    Only the functions section
  doxsearch show Orbit                 Exact key lookup
  doxsearch --dir html/search check    Validate every shard file

Configuration is read from --config, $DOXSEARCH_CONFIG or ./doxsearch.toml.";

/// doxsearch - Prefix search over generated documentation search data
#[derive(Parser, Debug)]
#[command(
    name = "doxsearch",
    version,
    about = "Prefix search over generated documentation search data",
    after_help = CLI_AFTER_HELP
)]
pub struct Cli {
    /// Search directory holding the shard files (overrides config)
    #[arg(short = 'd', long = "dir", value_name = "DIR", global = true)]
    pub dir: Option<PathBuf>,

    /// Config file (default: $DOXSEARCH_CONFIG, then ./doxsearch.toml)
    #[arg(long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Emit one JSON object per line instead of text
    #[arg(long = "json", global = true)]
    pub json: bool,

    /// Skip malformed shards instead of failing
    #[arg(long = "lenient", global = true)]
    pub lenient: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    /// Find symbols whose name starts with PREFIX
    Query {
        /// Prefix to search for (case-insensitive)
        prefix: String,

        /// Restrict results to one section (all, classes, functions, ...)
        #[arg(short = 's', long = "section", value_name = "SECTION")]
        section: Option<String>,

        /// Maximum matches to show (0 = unlimited)
        #[arg(short = 'n', long = "limit", value_name = "N")]
        limit: Option<usize>,
    },
    /// Show every entry whose key is exactly KEY
    Show { key: String },
    /// Print index statistics
    Stats,
    /// Parse every shard file and report malformed ones
    Check,
    /// List loaded sections with entry counts
    Sections,
}

impl Cli {
    /// Convert to the core command.
    pub fn to_command(&self) -> io::Result<Command> {
        Ok(match &self.command {
            CliCommand::Query {
                prefix,
                section,
                limit,
            } => Command::Query {
                prefix: prefix.clone(),
                section: section.as_deref().map(parse_section).transpose()?,
                limit: *limit,
            },
            CliCommand::Show { key } => Command::Show { key: key.clone() },
            CliCommand::Stats => Command::Stats,
            CliCommand::Check => Command::Check,
            CliCommand::Sections => Command::Sections,
        })
    }

    /// Log level filter implied by -v flags.
    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        }
    }
}

fn parse_section(name: &str) -> io::Result<Section> {
    Section::from_name(name).map_err(|e| io::Error::new(ErrorKind::InvalidInput, e))
}
