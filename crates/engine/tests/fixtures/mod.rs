#![allow(dead_code)]

use fcm_engine::{
    Declaration, Declared, DocumentPair, Element, Migration, MigrationError, XMLNode, attribute,
    find_by_tag, migration,
};

const APPLIED: &str = "Applied";

/// Appends an `<Applied>` marker so tests can read the application order from the tree itself.
fn record(document: &mut Element, unit: &str, direction: &str) {
    let mut entry = Element::new(APPLIED);
    entry.attributes.insert("unit".to_owned(), unit.to_owned());
    entry.attributes.insert("direction".to_owned(), direction.to_owned());
    document.children.push(XMLNode::Element(entry));
}

/// `unit:direction` for every marker, in application order.
#[must_use]
pub fn applied(pair: &DocumentPair) -> Vec<String> {
    find_by_tag(&pair.document, APPLIED)
        .into_iter()
        .map(|e| {
            format!("{}:{}", attribute(e, "unit").unwrap_or("?"), attribute(e, "direction").unwrap_or("?"))
        })
        .collect()
}

/// Builds a minimal pair whose roots both carry `version`.
#[must_use]
pub fn pair(version: &str) -> DocumentPair {
    let document =
        Element::parse(format!(r#"<Document SchemaVersion="4" ProgramVersion="{version}"/>"#).as_bytes()).unwrap();
    let gui = Element::parse(format!(r#"<Document SchemaVersion="1" ProgramVersion="{version}"/>"#).as_bytes())
        .unwrap();
    DocumentPair::new(document, gui)
}

#[migration(
    name = "Step05",
    description = "synthetic change at 0.5",
    threshold = "0.5",
    introduced_on = "2020-01-01",
    change_id = "c05"
)]
pub struct Step05;

impl Migration for Step05 {
    fn forward(&self, document: &mut Element, _: &mut Element) -> Result<(), MigrationError> {
        record(document, "Step05", "forward");
        Ok(())
    }

    fn backward(&self, document: &mut Element, _: &mut Element) -> Result<(), MigrationError> {
        record(document, "Step05", "backward");
        Ok(())
    }
}

#[migration(
    name = "Step10",
    description = "synthetic change at 1.0",
    threshold = "1.0",
    introduced_on = "2021-01-01",
    change_id = "c10"
)]
pub struct Step10;

impl Migration for Step10 {
    fn forward(&self, document: &mut Element, _: &mut Element) -> Result<(), MigrationError> {
        record(document, "Step10", "forward");
        Ok(())
    }

    fn backward(&self, document: &mut Element, _: &mut Element) -> Result<(), MigrationError> {
        record(document, "Step10", "backward");
        Ok(())
    }
}

#[migration(
    name = "Step15",
    description = "synthetic change at 1.5",
    threshold = "1.5",
    introduced_on = "2022-01-01",
    change_id = "c15"
)]
pub struct Step15;

impl Migration for Step15 {
    fn forward(&self, document: &mut Element, _: &mut Element) -> Result<(), MigrationError> {
        record(document, "Step15", "forward");
        Ok(())
    }

    fn backward(&self, document: &mut Element, _: &mut Element) -> Result<(), MigrationError> {
        record(document, "Step15", "backward");
        Ok(())
    }
}

/// Upgrades fine, refuses to downgrade.
#[migration(
    name = "Lossy",
    description = "forward drops information",
    threshold = "1.2",
    introduced_on = "2021-06-01",
    change_id = "c12"
)]
pub struct Lossy;

impl Migration for Lossy {
    fn forward(&self, document: &mut Element, _: &mut Element) -> Result<(), MigrationError> {
        record(document, "Lossy", "forward");
        Ok(())
    }

    fn backward(&self, _: &mut Element, _: &mut Element) -> Result<(), MigrationError> {
        Err(MigrationError::incompatible_downgrade("Lossy", "original value was discarded"))
    }
}

/// Introduced last but with the lowest threshold, to pin date-first ordering.
#[migration(
    name = "LateBackport",
    description = "backported fix",
    threshold = "0.3",
    introduced_on = "2023-01-01",
    change_id = "c03"
)]
pub struct LateBackport;

impl Migration for LateBackport {
    fn forward(&self, document: &mut Element, _: &mut Element) -> Result<(), MigrationError> {
        record(document, "LateBackport", "forward");
        Ok(())
    }

    fn backward(&self, document: &mut Element, _: &mut Element) -> Result<(), MigrationError> {
        record(document, "LateBackport", "backward");
        Ok(())
    }
}

/// Hand-written declaration that forgets its change id.
#[derive(Debug, Default)]
pub struct Incomplete;

impl Declared for Incomplete {
    fn declaration(&self) -> Declaration {
        Declaration {
            type_name: "Incomplete",
            name: Some("Incomplete"),
            description: Some("no change id"),
            threshold: Some("1.0"),
            introduced_on: Some("2024-01-01"),
            change_id: None,
        }
    }
}

impl Migration for Incomplete {
    fn forward(&self, _: &mut Element, _: &mut Element) -> Result<(), MigrationError> {
        Ok(())
    }

    fn backward(&self, _: &mut Element, _: &mut Element) -> Result<(), MigrationError> {
        Ok(())
    }
}

/// Reuses `Step10`'s name.
#[migration(
    name = "Step10",
    description = "name clash",
    threshold = "1.1",
    introduced_on = "2024-01-01",
    change_id = "dup"
)]
pub struct Impostor;

impl Migration for Impostor {
    fn forward(&self, _: &mut Element, _: &mut Element) -> Result<(), MigrationError> {
        Ok(())
    }

    fn backward(&self, _: &mut Element, _: &mut Element) -> Result<(), MigrationError> {
        Ok(())
    }
}
