#![warn(rust_2018_idioms, unused_lifetimes)]
#![allow(clippy::print_stderr, clippy::print_stdout)]

pub mod handlers;
pub mod models;
pub mod services;

use crate::handlers::{codegen, testing};
use crate::models::args::{AppCommands, Cli, CodegenAction};

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        AppCommands::Codegen { action } => match action {
            CodegenAction::Migrations { check } => codegen::codegen_migrations(check)?,
        },
        AppCommands::Test { project } => testing::run_tests(project.as_deref())?,
        AppCommands::Doctest { project } => testing::run_doctests(project.as_deref())?,
    }

    Ok(())
}
