//! # Lineage CLI Module
//!
//! This module implements the CLI interface for Lineage.
//!
//! ## Available Commands
//!
//! - `status` - Show corpus metrics (default)
//! - `resolve` - Resolve a name and explain the choice
//! - `chain` - Show the inheritance chain of a profile
//! - `descendants` - List every profile inheriting from a name
//! - `compare` - Compare declared settings along a chain
//! - `effective` - Show effective settings of one or more profiles
//! - `graph` - Write the inheritance graph as Graphviz DOT

mod commands;

use crate::config::LineageConfig;
use crate::loader::load_corpus;
use clap::{Parser, Subcommand};
use lineage_core::{Category, LineageError};
use std::collections::BTreeSet;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Lineage - OrcaSlicer profile inheritance explorer
///
/// Resolves ambiguous profile names, walks `inherits` chains and shows the
/// settings each profile ends up with.
#[derive(Parser, Debug)]
#[command(name = "lineage")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Directory containing the OrcaSlicer profile tree
    #[arg(short = 'i', long, global = true, default_value = "OrcaSlicer")]
    pub input_dir: PathBuf,

    /// Path to a lineage.toml configuration file
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Only load these categories (comma-separated: filament, machine, process)
    #[arg(long, global = true, value_delimiter = ',', value_parser = parse_category)]
    pub types: Vec<Category>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show corpus status
    Status,

    /// Resolve a profile name and show which rule picked it
    Resolve {
        /// Display name to resolve
        name: String,

        /// Resolve as if requested by the profile at this location
        #[arg(long)]
        from: Option<String>,
    },

    /// Show the inheritance chain of a profile
    Chain {
        /// Display name of the profile
        name: String,
    },

    /// List all direct and transitive descendants of a profile
    Descendants {
        /// Display name of the ancestor
        name: String,
    },

    /// Compare declared settings across a profile's inheritance chain
    Compare {
        /// Display name of the profile
        name: String,
    },

    /// Show effective settings, one column per profile
    Effective {
        /// Display names of profiles of one category
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Generate a Graphviz DOT inheritance graph
    Graph {
        /// Only show this profile's ancestors and descendants
        #[arg(short, long)]
        target: Option<String>,

        /// Only show branches that contain user profiles (filament unless --types is given)
        #[arg(short, long)]
        user: bool,

        /// Output file (".dot" is appended if missing); stdout if omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Parse one `--types` entry.
fn parse_category(value: &str) -> Result<Category, String> {
    Category::parse(value).ok_or_else(|| {
        format!("unknown profile type '{value}' (expected filament, machine or process)")
    })
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub fn execute(cli: Cli) -> Result<(), LineageError> {
    let config = LineageConfig::load(cli.config.as_deref())?;
    let categories: Option<BTreeSet<Category>> = if cli.types.is_empty() {
        None
    } else {
        Some(cli.types.iter().copied().collect())
    };

    let corpus = load_corpus(&cli.input_dir, &config, categories.as_ref())?;
    let explorer = &corpus.explorer;
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Resolve { name, from }) => {
            cmd_resolve(explorer, json_mode, &name, from.as_deref())
        }
        Some(Commands::Chain { name }) => cmd_chain(explorer, json_mode, &name),
        Some(Commands::Descendants { name }) => cmd_descendants(explorer, json_mode, &name),
        Some(Commands::Compare { name }) => cmd_compare(explorer, json_mode, &name),
        Some(Commands::Effective { names }) => cmd_effective(explorer, json_mode, &names),
        Some(Commands::Graph {
            target,
            user,
            output,
        }) => cmd_graph(
            explorer,
            json_mode,
            target.as_deref(),
            user,
            categories.as_ref(),
            output.as_deref(),
        ),
        Some(Commands::Status) | None => {
            // No subcommand - show status by default
            cmd_status(&corpus, &cli.input_dir, json_mode, cli.verbose)
        }
    }
}
