use crate::services::utils::get_project_root;
use anyhow::{Context, Result, bail};
use std::fmt::Write as FmtWrite;
use std::fs;
use std::path::Path;
use syn::{Attribute, Item};
use walkdir::WalkDir;

// --- Constants ---
const MIGRATIONS_SRC: &str = "crates/migrations/src";
const UNITS_DIR: &str = "units";
const CATALOG_PATH: &str = "generated/catalog.rs";
const RESERVED_PREFIX: &str = "__";
const MIGRATION_ATTRIBUTE: &str = "migration";

// --- Public API ---

/// Regenerates the static unit catalog of `fcm-migrations`.
///
/// Every `.rs` file under `crates/migrations/src/units` is parsed, and each struct carrying a
/// `#[migration(...)]` attribute becomes one catalog row. Rows are sorted by source path, so
/// the output is stable across platforms and file systems.
///
/// With `check`, nothing is written and a stale catalog is an error.
///
/// # Errors
/// This function will return an error if:
/// - A unit source cannot be read or is not valid Rust.
/// - A unit path cannot be expressed as a Rust module path.
/// - The catalog cannot be written, or is stale under `check`.
pub fn codegen_migrations(check: bool) -> Result<()> {
    let src_root = get_project_root()?.join(MIGRATIONS_SRC);
    let catalog_path = src_root.join(CATALOG_PATH);

    let units = discover_units(&src_root)?;
    let catalog = render_catalog(&units)?;

    if check {
        let current = fs::read_to_string(&catalog_path).unwrap_or_default();
        if current != catalog {
            bail!("{} is stale. Run `cargo xtask codegen migrations`.", catalog_path.display());
        }
        println!("✅ Migration catalog is up to date ({} units).", units.len());
        return Ok(());
    }

    if let Some(parent) = catalog_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&catalog_path, catalog)
        .with_context(|| format!("Failed to write catalog to {}", catalog_path.display()))?;

    println!("✅ Generated migration catalog: {} units.", units.len());
    Ok(())
}

// --- Domain Models ---

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct UnitSource {
    /// Path relative to the crate `src/`, `/`-separated.
    path: String,
    type_name: String,
}

impl UnitSource {
    /// `units/a/b.rs` becomes `units::a::b::Type`.
    fn type_path(&self) -> String {
        let module = self.path.trim_end_matches(".rs").replace('/', "::");
        format!("{module}::{}", self.type_name)
    }
}

// --- Discovery ---

fn discover_units(src_root: &Path) -> Result<Vec<UnitSource>> {
    let units_root = src_root.join(UNITS_DIR);
    let mut units = Vec::new();

    let walker = WalkDir::new(&units_root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_reserved(entry.file_name()));

    for entry in walker {
        let entry = entry.with_context(|| format!("Failed to walk {}", units_root.display()))?;
        let path = entry.path();
        if !entry.file_type().is_file()
            || path.extension().is_none_or(|ext| ext != "rs")
            || path.file_name().is_some_and(|name| name == "mod.rs")
        {
            continue;
        }

        let relative = relative_path(path, src_root)?;
        for type_name in scan_file(path)? {
            units.push(UnitSource { path: relative.clone(), type_name });
        }
    }

    units.sort();
    Ok(units)
}

/// Names of the structs in `path` annotated with `#[migration]`.
fn scan_file(path: &Path) -> Result<Vec<String>> {
    let source = fs::read_to_string(path)?;
    let file = syn::parse_file(&source).with_context(|| format!("Failed to parse {}", path.display()))?;

    Ok(file
        .items
        .iter()
        .filter_map(|item| match item {
            Item::Struct(item) if item.attrs.iter().any(is_migration_attribute) => {
                Some(item.ident.to_string())
            },
            _ => None,
        })
        .collect())
}

/// Matches `#[migration]`, `#[fcm_engine::migration]` and `#[fcm_derive::migration]`.
fn is_migration_attribute(attr: &Attribute) -> bool {
    attr.path().segments.last().is_some_and(|segment| segment.ident == MIGRATION_ATTRIBUTE)
}

fn is_reserved(name: &std::ffi::OsStr) -> bool {
    name.to_str().is_some_and(|name| name.starts_with(RESERVED_PREFIX))
}

fn relative_path(path: &Path, root: &Path) -> Result<String> {
    let relative = path
        .strip_prefix(root)
        .with_context(|| format!("{} is outside {}", path.display(), root.display()))?;

    let segments: Vec<&str> = relative
        .iter()
        .map(|segment| segment.to_str().context("Unit paths must be valid UTF-8"))
        .collect::<Result<_>>()?;

    for segment in &segments {
        let stem = segment.trim_end_matches(".rs");
        if syn::parse_str::<syn::Ident>(stem).is_err() {
            bail!("'{}' cannot be a module name ({})", stem, path.display());
        }
    }

    Ok(segments.join("/"))
}

// --- View: Rendering ---

fn render_catalog(units: &[UnitSource]) -> Result<String> {
    let mut w = String::new();
    writeln!(w, "//! Auto-generated by `cargo xtask codegen migrations`.")?;
    writeln!(w, "//! Do not edit by hand.\n")?;
    if !units.is_empty() {
        writeln!(w, "use crate::units;")?;
    }
    writeln!(w, "use fcm_engine::{{CatalogEntry, instantiate}};\n")?;

    if units.is_empty() {
        writeln!(w, "pub const CATALOG: &[CatalogEntry] = &[];")?;
        return Ok(w);
    }

    writeln!(w, "pub const CATALOG: &[CatalogEntry] = &[")?;
    for unit in units {
        writeln!(w, "    CatalogEntry {{")?;
        writeln!(w, "        path: \"{}\",", unit.path)?;
        writeln!(w, "        type_name: \"{}\",", unit.type_name)?;
        writeln!(w, "        factory: instantiate::<{}>,", unit.type_path())?;
        writeln!(w, "    }},")?;
    }
    writeln!(w, "];")?;
    Ok(w)
}
