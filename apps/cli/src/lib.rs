//! # fcstd-migrate
//!
//! Command handlers behind the `fcstd-migrate` binary. Results (`--list`, `--dry-run`, the
//! migration summary) go to stdout; logs and the overwrite prompt go to stderr.

pub mod args;

pub use args::Cli;

use anyhow::{Context, Result, bail};
use fcm::config::MigratorConfig;
use fcm::{Migrator, Plan};
use std::io::{BufRead, Write};
use std::path::Path;
use tracing::{info, warn};

/// Asked on stderr before an existing output file is replaced.
pub const OVERWRITE_PROMPT: &str = "Output file already exists, it will be overwritten. Continue? (y/N)";

/// The streams a command reads answers from and writes to.
#[derive(Debug)]
pub struct Terminal<I, O, E> {
    pub input: I,
    pub output: O,
    pub error: E,
}

/// Executes the command described by `cli`.
///
/// # Errors
/// Any configuration, container or migration failure, and a declined overwrite.
pub fn run(
    cli: &Cli,
    config: &MigratorConfig,
    terminal: &mut Terminal<impl BufRead, impl Write, impl Write>,
) -> Result<()> {
    let migrator = Migrator::from_config(config).context("Failed to register migration units")?;

    if cli.list {
        return list_units(&migrator, &mut terminal.output);
    }

    let input = cli.input.as_deref().context("An input file is required")?;
    let target = cli.target.as_ref().context("A target version is required")?;

    if cli.dry_run {
        let plan = migrator.plan_file(input, target)?;
        return print_plan(&plan, &mut terminal.output);
    }

    let output = cli.output.as_deref().context("An output file is required")?;
    ensure_writable_target(output)?;
    if output.exists() && !cli.yes && !confirm_overwrite(&mut terminal.input, &mut terminal.error)? {
        warn!(output = %output.display(), "Overwrite declined");
        bail!("Refusing to overwrite {}", output.display());
    }

    let outcome = migrator
        .migrate_file(input, output, target)
        .with_context(|| format!("Failed to migrate {}", input.display()))?;

    let report = &outcome.report;
    writeln!(
        terminal.output,
        "{} -> {}: {} -> {} ({}, {} unit(s) applied)",
        input.display(),
        output.display(),
        report.source,
        report.target,
        report.direction,
        report.applied.len()
    )?;
    Ok(())
}

/// Prints every registered unit, oldest change first.
///
/// # Errors
/// Write failures on `out`.
pub fn list_units(migrator: &Migrator, out: &mut impl Write) -> Result<()> {
    let mut units: Vec<_> = migrator.registry().iter().map(|registered| &registered.metadata).collect();
    units.sort_by(|a, b| a.introduced_on.cmp(&b.introduced_on).then_with(|| a.threshold.cmp(&b.threshold)));

    writeln!(out, "{:<10} {:<12} {:<42} {}", "Threshold", "Introduced", "Change", "Name")?;
    writeln!(out, "{:-<100}", "")?;
    for unit in units {
        writeln!(
            out,
            "{:<10} {:<12} {:<42} {}",
            unit.threshold.to_string(),
            unit.introduced_on.to_string(),
            unit.change_id,
            unit.name
        )?;
    }
    Ok(())
}

/// Describes `plan` without running it.
///
/// # Errors
/// Write failures on `out`.
pub fn print_plan(plan: &Plan<'_>, out: &mut impl Write) -> Result<()> {
    writeln!(out, "{} -> {} ({})", plan.source(), plan.target(), plan.direction())?;
    if plan.is_empty() {
        writeln!(out, "No migration applies; only the version stamp changes.")?;
        return Ok(());
    }
    for (position, step) in plan.steps().iter().enumerate() {
        let metadata = &step.metadata;
        writeln!(
            out,
            "{:>3}. {} [{} {} {}]",
            position + 1,
            metadata.name,
            metadata.threshold,
            metadata.introduced_on,
            metadata.change_id
        )?;
    }
    info!(steps = plan.steps().len(), "Dry run, nothing written");
    Ok(())
}

/// Asks [`OVERWRITE_PROMPT`] on `prompt` and reads one answer line from `answers`.
///
/// # Errors
/// I/O failures on either stream.
pub fn confirm_overwrite(answers: &mut impl BufRead, prompt: &mut impl Write) -> Result<bool> {
    write!(prompt, "{OVERWRITE_PROMPT} ")?;
    prompt.flush()?;

    let mut answer = String::new();
    answers.read_line(&mut answer).context("Failed to read the answer")?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}

/// Rejects an output that is an existing directory before any work starts.
///
/// # Errors
/// When `output` names a directory.
pub fn ensure_writable_target(output: &Path) -> Result<()> {
    if output.is_dir() {
        bail!("{} is a directory", output.display());
    }
    Ok(())
}
