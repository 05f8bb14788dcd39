//! # CLI Argument Definitions
//!
//! Subcommands of `cargo xtask`, parsed with `clap`.

use clap::{Parser, Subcommand};

/// The main CLI structure parsing command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "cargo xtask")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Developer toolkit for the FCStd migrator workspace")]
pub struct Cli {
    #[command(subcommand)]
    pub command: AppCommands,
}

#[derive(Debug, Subcommand)]
pub enum AppCommands {
    /// Generate code artifacts
    Codegen {
        #[command(subcommand)]
        action: CodegenAction,
    },
    /// Run tests (workspace by default)
    Test {
        /// Run tests for a specific crate (auto-prefixes with 'fcm-' if missing)
        project: Option<String>,
    },
    /// Run doc tests (workspace by default)
    Doctest {
        /// Run doc tests for a specific crate (auto-prefixes with 'fcm-' if missing)
        project: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum CodegenAction {
    /// Regenerate the static catalog of built-in migration units
    Migrations {
        /// Fail instead of writing when the catalog is out of date
        #[arg(long)]
        check: bool,
    },
}
