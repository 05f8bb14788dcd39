mod fixtures;

use fcm_engine::{CatalogEntry, MigrationError, Registry, instantiate};
use fixtures::{Impostor, Incomplete, Step05, Step10, Step15};

const CATALOG: &[CatalogEntry] = &[
    CatalogEntry { path: "units/early/step05.rs", type_name: "Step05", factory: instantiate::<Step05> },
    CatalogEntry { path: "units/late/step10.rs", type_name: "Step10", factory: instantiate::<Step10> },
    CatalogEntry { path: "units/late/__wip/step15.rs", type_name: "Step15", factory: instantiate::<Step15> },
    CatalogEntry { path: "units/__disabled.rs", type_name: "Incomplete", factory: instantiate::<Incomplete> },
    CatalogEntry { path: "units/notes.toml", type_name: "Impostor", factory: instantiate::<Impostor> },
    CatalogEntry { path: "scratch/step15.rs", type_name: "Step15", factory: instantiate::<Step15> },
];

fn names(registry: &Registry) -> Vec<&'static str> {
    let mut names: Vec<_> = registry.iter().map(|r| r.metadata.name).collect();
    names.sort_unstable();
    names
}

#[test]
fn discovery_skips_reserved_and_foreign_entries() {
    let registry = Registry::discover(CATALOG, "units").unwrap();
    assert_eq!(names(&registry), ["Step05", "Step10"]);
}

#[test]
fn discovery_is_scoped_to_root() {
    let registry = Registry::discover(CATALOG, "./units/late").unwrap();
    assert_eq!(names(&registry), ["Step10"]);

    let registry = Registry::discover(CATALOG, "scratch").unwrap();
    assert_eq!(names(&registry), ["Step15"]);

    assert!(Registry::discover(CATALOG, "nowhere").unwrap().is_empty());
}

#[test]
fn missing_field_is_a_contract_violation() {
    let err = Registry::from_units(vec![instantiate::<Step05>(), instantiate::<Incomplete>()]).unwrap_err();

    let MigrationError::ContractViolation { violations, .. } = &err else {
        panic!("expected a contract violation, got {err}");
    };
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].unit, "Incomplete");
    assert_eq!(violations[0].field, "change_id");
    assert!(err.to_string().contains("Incomplete.change_id: missing"));
}

#[test]
fn duplicate_names_are_rejected() {
    let err = Registry::from_units(vec![instantiate::<Step10>(), instantiate::<Impostor>()]).unwrap_err();
    assert_eq!(err.violations()[0].field, "name");
    assert_eq!(err.violations()[0].unit, "Impostor");
}

#[test]
fn well_formed_units_are_accepted() {
    let registry = Registry::from_units(vec![instantiate::<Step05>(), instantiate::<Step15>()]).unwrap();
    assert_eq!(registry.len(), 2);

    let step = registry.get("Step15").unwrap();
    assert_eq!(step.metadata.change_id, "c15");
    assert_eq!(step.metadata.threshold.to_string(), "1.5");
    assert!(registry.get("Step10").is_none());
}
