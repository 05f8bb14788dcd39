//! Property-level edits shared by migration units.
//!
//! FreeCAD serializes every object property as `<Property name=".." type="..">` with the value in
//! child elements. All helpers here act on every matching property in the subtree and return how
//! many they touched; a zero count is not an error.

use crate::error::MigrationError;
use crate::tree::{TYPE_ATTRIBUTE, attribute, for_each_by_tag_mut, set_attribute};
use std::convert::Infallible;
use xmltree::Element;

pub const PROPERTY_ELEMENT: &str = "Property";
const PROPERTY_NAME: &str = "name";

/// Renames every property called `old` to `new`.
pub fn rename_property(root: &mut Element, old: &str, new: &str) -> usize {
    matching::<Infallible>(root, old, |property| {
        set_attribute(property, PROPERTY_NAME, new);
        Ok(())
    })
    .unwrap_or_else(|never| match never {})
}

/// Changes the declared type of every property called `name`.
pub fn retype_property(root: &mut Element, name: &str, new_type: &str) -> usize {
    retype_property_with(root, name, new_type, |_| Ok::<_, Infallible>(()))
        .unwrap_or_else(|never| match never {})
}

/// Changes the declared type of every property called `name`, then rewrites its value.
///
/// # Errors
/// Returns the first error raised by `transform`.
pub fn retype_property_with<E>(
    root: &mut Element,
    name: &str,
    new_type: &str,
    mut transform: impl FnMut(&mut Element) -> Result<(), E>,
) -> Result<usize, E> {
    matching(root, name, |property| {
        set_attribute(property, TYPE_ATTRIBUTE, new_type);
        transform(property)
    })
}

/// Rewrites every property called `name` in place.
///
/// # Errors
/// Returns the first error raised by `transform`.
pub fn transform_property(
    root: &mut Element,
    name: &str,
    transform: impl FnMut(&mut Element) -> Result<(), MigrationError>,
) -> Result<usize, MigrationError> {
    matching(root, name, transform)
}

fn matching<E>(
    root: &mut Element,
    name: &str,
    mut edit: impl FnMut(&mut Element) -> Result<(), E>,
) -> Result<usize, E> {
    let mut matched = 0;
    for_each_by_tag_mut(root, PROPERTY_ELEMENT, |property| {
        if attribute(property, PROPERTY_NAME) == Some(name) {
            matched += 1;
            edit(property)?;
        }
        Ok(())
    })?;
    Ok(matched)
}
