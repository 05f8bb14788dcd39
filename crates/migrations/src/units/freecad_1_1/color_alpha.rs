use fcm_engine::{
    Element, Migration, MigrationError, XMLNode, attribute, child_elements_mut, for_each_by_type_mut,
    migration, set_attribute,
};
use tracing::debug;

const COLOR_TYPE: &str = "App::PropertyColor";
const COLOR_VALUE_ELEMENT: &str = "PropertyColor";
const VALUE_ATTRIBUTE: &str = "value";

/// FreeCAD 1.1 stores the fourth channel of packed `0xRRGGBBXX` colors as alpha instead of
/// transparency. Both directions invert that channel, so the unit is its own inverse.
///
/// Affected: `Transparency`-driven colors of Arch building parts, curtain walls, panels, walls
/// and windows, and Draft diffuse colors.
#[migration(
    name = "Arch/Draft color transparency to alpha",
    description = "Convert color transparency to alpha (i.e., 1-transparency) in Arch and Draft",
    threshold = "1.1",
    introduced_on = "2024-12-09",
    change_id = "0607c555d6c56d1b617dc0d3a52431bef562c7dc"
)]
pub struct ColorTransparencyToAlpha;

impl Migration for ColorTransparencyToAlpha {
    fn forward(&self, _: &mut Element, gui_document: &mut Element) -> Result<(), MigrationError> {
        let converted = for_each_by_type_mut(gui_document, COLOR_TYPE, invert_fourth_channel)?;
        debug!(converted, "Color transparency converted to alpha");
        Ok(())
    }

    fn backward(&self, _: &mut Element, gui_document: &mut Element) -> Result<(), MigrationError> {
        let converted = for_each_by_type_mut(gui_document, COLOR_TYPE, invert_fourth_channel)?;
        debug!(converted, "Color alpha converted to transparency");
        Ok(())
    }
}

/// `x' = 255 - x` on the low byte, the integer form of `a = 1 - t`.
const fn invert_packed(color: u32) -> u32 {
    (color & 0xFFFF_FF00) | (0xFF - (color & 0xFF))
}

fn parse_packed(raw: &str) -> Result<u32, MigrationError> {
    raw.trim()
        .parse::<u32>()
        .map_err(|_| MigrationError::invalid_document(format!("'{raw}' is not a packed RGBX color")))
}

/// Rewrites a color property in place.
///
/// The packed value normally lives in the `value` attribute of a `<PropertyColor>` child; a value
/// stored as the property's own text is rewritten there instead.
fn invert_fourth_channel(property: &mut Element) -> Result<(), MigrationError> {
    if let Some(value) = child_elements_mut(property).find(|child| child.name == COLOR_VALUE_ELEMENT) {
        let raw = attribute(value, VALUE_ATTRIBUTE).ok_or_else(|| {
            MigrationError::invalid_document("<PropertyColor> has no `value` attribute")
        })?;
        let inverted = invert_packed(parse_packed(raw)?);
        set_attribute(value, VALUE_ATTRIBUTE, inverted.to_string());
        return Ok(());
    }

    let Some(text) = property.get_text() else {
        return Err(MigrationError::invalid_document("color property carries no value"));
    };
    let inverted = invert_packed(parse_packed(&text)?);
    property.children.retain(|node| node.as_element().is_some());
    property.children.push(XMLNode::Text(inverted.to_string()));
    Ok(())
}
