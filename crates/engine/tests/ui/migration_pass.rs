use fcm_engine::{Declared, Element, Migration, MigrationError, migration, rename_property};

#[migration(
    name = "Rename Placement",
    description = "",
    threshold = "0.22.dev1",
    introduced_on = "2023-11-30",
    change_id = "0123abcd",
)]
#[derive(Clone)]
pub struct RenamePlacement;

impl Migration for RenamePlacement {
    fn forward(&self, document: &mut Element, _: &mut Element) -> Result<(), MigrationError> {
        rename_property(document, "Placement", "Pose");
        Ok(())
    }

    fn backward(&self, document: &mut Element, _: &mut Element) -> Result<(), MigrationError> {
        rename_property(document, "Pose", "Placement");
        Ok(())
    }
}

fn main() {
    let declaration = RenamePlacement::default().declaration();
    assert_eq!(declaration.type_name, "RenamePlacement");
    assert_eq!(declaration.threshold, Some("0.22.dev1"));
    let _ = format!("{:?}", RenamePlacement.clone());
}
