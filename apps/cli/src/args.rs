//! # CLI Argument Definitions

use clap::Parser;
use fcm::Version;
use std::path::PathBuf;

/// Migrates FreeCAD `.FCStd` documents between format versions.
#[derive(Debug, Parser)]
#[command(name = "fcstd-migrate")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(about = "Migrate FreeCAD FCStd documents forward or backward between format versions")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Document to migrate
    #[arg(short, long, value_name = "FILE", value_parser = existing_file, required_unless_present = "list")]
    pub input: Option<PathBuf>,

    /// Where to write the migrated document (may equal the input)
    #[arg(short, long, value_name = "FILE", required_unless_present_any = ["list", "dry_run"])]
    pub output: Option<PathBuf>,

    /// Target format version, e.g. '1.0' or '1.1'
    #[arg(short = 'v', long = "version", value_name = "VERSION", value_parser = target_version, required_unless_present = "list")]
    pub target: Option<Version>,

    /// Overwrite the output without asking
    #[arg(short, long)]
    pub yes: bool,

    /// Configuration file (defaults to 'fcstd-migrate.toml' when present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the migration plan without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// List the registered migration units and exit
    #[arg(long)]
    pub list: bool,

    /// Only log warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log more detail (repeat for trace output)
    #[arg(long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

fn existing_file(raw: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(raw);
    if path.is_file() { Ok(path) } else { Err(format!("'{raw}' does not exist or is not a file")) }
}

fn target_version(raw: &str) -> Result<Version, String> {
    Version::parse(raw).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn list_needs_no_other_arguments() {
        let cli = Cli::try_parse_from(["fcstd-migrate", "--list"]).unwrap();
        assert!(cli.list);
        assert!(cli.input.is_none());
    }

    #[test]
    fn dry_run_needs_no_output() {
        let file = std::env::current_exe().unwrap();
        let input = file.to_string_lossy();
        let cli =
            Cli::try_parse_from(["fcstd-migrate", "-i", &*input, "-v", "1.1", "--dry-run"]).unwrap();
        assert_eq!(cli.target, Some(Version::parse("1.1").unwrap()));
        assert!(cli.output.is_none());
    }

    #[test]
    fn rejects_unknown_versions_and_missing_inputs() {
        assert!(Cli::try_parse_from(["fcstd-migrate", "--list", "-v", "!!"]).is_err());
        let absent = ["fcstd-migrate", "-i", "/definitely/absent.FCStd", "-v", "1.0", "-o", "x"];
        assert!(Cli::try_parse_from(absent).is_err());
    }
}
