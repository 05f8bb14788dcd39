use crate::services::utils::normalize_project_name;
use anyhow::{Result, bail};
use std::process::Command;

/// Which crates a test run covers.
fn scope_args(project: Option<&str>) -> Vec<String> {
    match project {
        None | Some("all") => vec!["--workspace".into()],
        Some(project) => vec!["-p".into(), normalize_project_name(project)],
    }
}

fn test_args(project: Option<&str>, nextest: bool) -> Vec<String> {
    let mut args: Vec<String> =
        if nextest { vec!["nextest".into(), "run".into()] } else { vec!["test".into()] };
    args.extend(scope_args(project));
    args.push("--all-features".into());

    let tail: &[&str] = if nextest {
        &["--failure-output", "immediate-final", "--success-output", "never", "--status-level", "skip"]
    } else {
        &["--", "-q"]
    };
    args.extend(tail.iter().map(|arg| (*arg).to_owned()));
    args
}

/// Runs tests in the workspace or a specific crate, through `cargo nextest` when installed.
///
/// # Errors
/// Returns an error if cargo cannot be spawned or any test fails.
pub fn run_tests(project: Option<&str>) -> Result<()> {
    let nextest = Command::new("cargo-nextest").arg("--version").output().is_ok();
    println!("🧪 Running tests via '{}'...", if nextest { "nextest" } else { "cargo test" });

    let status = Command::new("cargo").args(test_args(project, nextest)).status()?;
    if !status.success() {
        bail!("Tests failed!");
    }
    Ok(())
}

/// Runs doc tests in the workspace or a specific crate.
///
/// # Errors
/// Returns an error if cargo cannot be spawned or any doc test fails.
pub fn run_doctests(project: Option<&str>) -> Result<()> {
    println!("📚 Running doctests via 'cargo test --doc'...");

    let mut args = vec!["test".to_owned(), "--doc".to_owned()];
    args.extend(scope_args(project));
    args.push("--all-features".into());

    let status = Command::new("cargo").args(args).status()?;
    if !status.success() {
        bail!("Doc tests failed!");
    }
    Ok(())
}
