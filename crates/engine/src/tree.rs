//! Traversal helpers over `xmltree` elements.
//!
//! Document trees are deeply nested (`Document/ObjectData/Object/Properties/Property/...`), so
//! every collecting lookup here is a full pre-order search. Mutable traversal is callback-based because a
//! tree cannot hand out overlapping `&mut` borrows to nested elements.

use std::collections::VecDeque;
use std::convert::Infallible;
use xmltree::{Element, XMLNode};

/// Attribute carrying a property's FreeCAD type, e.g. `App::PropertyLink`.
pub const TYPE_ATTRIBUTE: &str = "type";
/// Attribute carrying an object's unique name inside a document.
pub const NAME_ATTRIBUTE: &str = "Name";

#[must_use]
pub fn attribute<'e>(element: &'e Element, key: &str) -> Option<&'e str> {
    element.attributes.get(key).map(String::as_str)
}

/// Sets `key`, keeping its position when the attribute already exists.
pub fn set_attribute(element: &mut Element, key: &str, value: impl Into<String>) {
    let value = value.into();
    match element.attributes.get_mut(key) {
        Some(slot) => *slot = value,
        None => {
            element.attributes.insert(key.to_owned(), value);
        },
    }
}

pub fn child_elements(element: &Element) -> impl Iterator<Item = &Element> {
    element.children.iter().filter_map(|node| match node {
        XMLNode::Element(child) => Some(child),
        _ => None,
    })
}

pub fn child_elements_mut(element: &mut Element) -> impl Iterator<Item = &mut Element> {
    element.children.iter_mut().filter_map(|node| match node {
        XMLNode::Element(child) => Some(child),
        _ => None,
    })
}

/// Every element whose `type` attribute equals `type_tag`, root included, in pre-order.
#[must_use]
pub fn find_by_type<'e>(root: &'e Element, type_tag: &str) -> Vec<&'e Element> {
    let mut found = Vec::new();
    collect(root, &mut |element| attribute(element, TYPE_ATTRIBUTE) == Some(type_tag), &mut found);
    found
}

/// Every element with tag name `tag`, root included, in pre-order.
#[must_use]
pub fn find_by_tag<'e>(root: &'e Element, tag: &str) -> Vec<&'e Element> {
    let mut found = Vec::new();
    collect(root, &mut |element| element.name == tag, &mut found);
    found
}

fn collect<'e>(element: &'e Element, keep: &mut impl FnMut(&Element) -> bool, found: &mut Vec<&'e Element>) {
    if keep(element) {
        found.push(element);
    }
    for child in child_elements(element) {
        collect(child, keep, found);
    }
}

/// Applies `visit` to every element whose `type` attribute equals `type_tag`, returning how
/// many were visited.
///
/// # Errors
/// Stops at and returns the first error raised by `visit`.
pub fn for_each_by_type_mut<E>(
    root: &mut Element,
    type_tag: &str,
    visit: impl FnMut(&mut Element) -> Result<(), E>,
) -> Result<usize, E> {
    visit_matching(root, |element| attribute(element, TYPE_ATTRIBUTE) == Some(type_tag), visit)
}

/// Applies `visit` to every element with tag name `tag`, returning how many were visited.
///
/// # Errors
/// Stops at and returns the first error raised by `visit`.
pub fn for_each_by_tag_mut<E>(
    root: &mut Element,
    tag: &str,
    visit: impl FnMut(&mut Element) -> Result<(), E>,
) -> Result<usize, E> {
    visit_matching(root, |element| element.name == tag, visit)
}

fn visit_matching<E>(
    root: &mut Element,
    keep: impl Fn(&Element) -> bool,
    mut visit: impl FnMut(&mut Element) -> Result<(), E>,
) -> Result<usize, E> {
    let mut visited = 0;
    try_walk_mut(root, &mut |element| {
        if keep(element) {
            visited += 1;
            visit(element)?;
        }
        Ok(())
    })?;
    Ok(visited)
}

/// Shallowest element whose `Name` attribute equals `name`, left-most among equals.
///
/// The search goes level by level, so a match nested deep inside an early sibling never shadows
/// one closer to the root.
#[must_use]
pub fn find_first_by_name<'e>(root: &'e Element, name: &str) -> Option<&'e Element> {
    let mut queue = VecDeque::from([root]);
    while let Some(element) = queue.pop_front() {
        if attribute(element, NAME_ATTRIBUTE) == Some(name) {
            return Some(element);
        }
        queue.extend(child_elements(element));
    }
    None
}

pub fn find_first_by_name_mut<'e>(root: &'e mut Element, name: &str) -> Option<&'e mut Element> {
    let mut queue = VecDeque::from([root]);
    while let Some(element) = queue.pop_front() {
        if attribute(element, NAME_ATTRIBUTE) == Some(name) {
            return Some(element);
        }
        queue.extend(child_elements_mut(element));
    }
    None
}

/// Pre-order visit of every element in the subtree.
pub fn walk_mut(root: &mut Element, mut visit: impl FnMut(&mut Element)) {
    try_walk_mut::<Infallible>(root, &mut |element| {
        visit(element);
        Ok(())
    })
    .unwrap_or_else(|never| match never {});
}

pub(crate) fn try_walk_mut<E>(
    element: &mut Element,
    visit: &mut impl FnMut(&mut Element) -> Result<(), E>,
) -> Result<(), E> {
    visit(element)?;
    for child in child_elements_mut(element) {
        try_walk_mut(child, visit)?;
    }
    Ok(())
}
