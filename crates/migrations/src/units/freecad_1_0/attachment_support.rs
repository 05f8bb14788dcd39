use fcm_engine::{Element, Migration, MigrationError, migration, rename_property};
use tracing::debug;

const LEGACY: &str = "Support";
const CURRENT: &str = "AttachmentSupport";

/// `AttachExtension::Support` became `AttachmentSupport` so it no longer collides with the
/// `Support` property of Part Design features.
#[migration(
    name = "AttachmentExtension::Support to AttachmentSupport",
    description = "Rename the AttachExtension::Support property to AttachmentSupport",
    threshold = "1.0",
    introduced_on = "2024-03-04",
    change_id = "a8ae56e06ab0c45205f1f185523c23fe99d5ce44"
)]
pub struct AttachmentSupport;

impl Migration for AttachmentSupport {
    fn forward(&self, document: &mut Element, _: &mut Element) -> Result<(), MigrationError> {
        let renamed = rename_property(document, LEGACY, CURRENT);
        debug!(renamed, "Support renamed to AttachmentSupport");
        Ok(())
    }

    fn backward(&self, document: &mut Element, _: &mut Element) -> Result<(), MigrationError> {
        let renamed = rename_property(document, CURRENT, LEGACY);
        debug!(renamed, "AttachmentSupport renamed to Support");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fcm_engine::{PROPERTY_ELEMENT, attribute, find_by_tag};

    fn document() -> Element {
        Element::parse(
            r#"<Document ProgramVersion="0.21.2">
                <ObjectData Count="1">
                    <Object name="Sketch">
                        <Properties Count="2">
                            <Property name="Support" type="App::PropertyLinkSubList" status="1"><LinkSubList count="1"><Link obj="Pad" sub="Face6"/></LinkSubList></Property>
                            <Property name="MapMode" type="App::PropertyEnumeration"><Integer value="1"/></Property>
                        </Properties>
                    </Object>
                </ObjectData>
            </Document>"#
                .as_bytes(),
        )
        .unwrap()
    }

    fn property_names(root: &Element) -> Vec<&str> {
        find_by_tag(root, PROPERTY_ELEMENT).into_iter().filter_map(|p| attribute(p, "name")).collect()
    }

    #[test]
    fn forward_renames_only_support() {
        let mut doc = document();
        let mut gui = Element::new("Document");
        AttachmentSupport.forward(&mut doc, &mut gui).unwrap();
        assert_eq!(property_names(&doc), ["AttachmentSupport", "MapMode"]);
    }

    #[test]
    fn backward_restores_the_original() {
        let original = document();
        let mut doc = original.clone();
        let mut gui = Element::new("Document");

        AttachmentSupport.forward(&mut doc, &mut gui).unwrap();
        AttachmentSupport.backward(&mut doc, &mut gui).unwrap();
        assert_eq!(doc, original);
    }
}
