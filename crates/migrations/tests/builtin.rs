use fcm_engine::{
    Direction, DocumentPair, Element, PROGRAM_VERSION, PROPERTY_ELEMENT, Sequencer, Version, attribute,
    find_by_tag,
};
use fcm_migrations::{CATALOG, DEFAULT_ROOT, registry, registry_under};

const DOCUMENT: &str = r#"<Document SchemaVersion="4" ProgramVersion="0.21.2R33771 (Git)" FileVersion="1">
    <ObjectData Count="1">
        <Object name="Sketch">
            <Properties Count="2">
                <Property name="Support" type="App::PropertyLinkSubList"><LinkSubList count="1"><Link obj="Pad" sub="Face6"/></LinkSubList></Property>
                <Property name="MapMode" type="App::PropertyEnumeration"><Integer value="1"/></Property>
            </Properties>
        </Object>
    </ObjectData>
</Document>"#;

const GUI_DOCUMENT: &str = r#"<Document SchemaVersion="1">
    <ViewProviderData Count="1">
        <ViewProvider name="Sketch">
            <Properties Count="1">
                <Property name="ShapeColor" type="App::PropertyColor"><PropertyColor value="3435973632"/></Property>
            </Properties>
        </ViewProvider>
    </ViewProviderData>
</Document>"#;

fn pair() -> DocumentPair {
    DocumentPair::new(
        Element::parse(DOCUMENT.as_bytes()).unwrap(),
        Element::parse(GUI_DOCUMENT.as_bytes()).unwrap(),
    )
}

fn version(raw: &str) -> Version {
    Version::parse(raw).unwrap()
}

fn property_names(root: &Element) -> Vec<&str> {
    find_by_tag(root, PROPERTY_ELEMENT).into_iter().filter_map(|p| attribute(p, "name")).collect()
}

fn color(root: &Element) -> &str {
    attribute(find_by_tag(root, "PropertyColor")[0], "value").unwrap()
}

#[test]
fn catalog_is_sorted_by_source_path() {
    let paths: Vec<_> = CATALOG.iter().map(|entry| entry.path).collect();
    let mut sorted = paths.clone();
    sorted.sort_unstable();
    assert_eq!(paths, sorted);
    assert!(paths.iter().all(|path| path.starts_with(DEFAULT_ROOT)));
}

#[test]
fn every_builtin_unit_honours_the_contract() {
    let registry = registry().unwrap();
    assert_eq!(registry.len(), CATALOG.len());

    let change_ids: Vec<_> = registry.iter().map(|r| r.metadata.change_id).collect();
    assert!(change_ids.iter().all(|id| id.len() == 40 && id.chars().all(|c| c.is_ascii_hexdigit())));
}

#[test]
fn discovery_can_be_narrowed_to_a_release() {
    let registry = registry_under("units/freecad_1_0").unwrap();
    let names: Vec<_> = registry.iter().map(|r| r.metadata.name).collect();
    assert_eq!(names, ["AttachmentExtension::Support to AttachmentSupport"]);

    assert!(registry_under("units/freecad_2_0").unwrap().is_empty());
}

#[test]
fn upgrade_to_1_1_applies_both_units_in_order() {
    let registry = registry().unwrap();
    let mut pair = pair();

    let report = Sequencer::new(&registry).run(&mut pair, &version("1.1")).unwrap();

    assert_eq!(report.direction, Direction::Forward);
    assert_eq!(report.applied_names().collect::<Vec<_>>(), [
        "AttachmentExtension::Support to AttachmentSupport",
        "Arch/Draft color transparency to alpha",
    ]);
    assert_eq!(property_names(&pair.document), ["AttachmentSupport", "MapMode"]);
    assert_eq!(color(&pair.gui_document), "3435973887");
    assert_eq!(attribute(&pair.document, PROGRAM_VERSION), Some("1.1"));
    assert_eq!(attribute(&pair.gui_document, PROGRAM_VERSION), Some("1.1"));
}

#[test]
fn upgrade_selects_by_source_version_only() {
    let registry = registry().unwrap();
    let mut pair = pair();

    let report = Sequencer::new(&registry).run(&mut pair, &version("1.0")).unwrap();

    assert_eq!(report.direction, Direction::Forward);
    assert_eq!(report.applied_names().collect::<Vec<_>>(), [
        "AttachmentExtension::Support to AttachmentSupport",
        "Arch/Draft color transparency to alpha",
    ]);
    assert_eq!(property_names(&pair.document), ["AttachmentSupport", "MapMode"]);
    assert_eq!(color(&pair.gui_document), "3435973887");
    assert_eq!(attribute(&pair.document, PROGRAM_VERSION), Some("1.0"));
}

#[test]
fn downgrade_restores_the_legacy_layout() {
    let registry = registry().unwrap();
    let sequencer = Sequencer::new(&registry);
    let mut pair = pair();

    // Real 1.1 files carry a build number, placing them above the 1.1 threshold.
    sequencer.run(&mut pair, &version("1.1.0R40000")).unwrap();
    let report = sequencer.run(&mut pair, &version("0.21.2")).unwrap();

    assert_eq!(report.direction, Direction::Backward);
    assert_eq!(report.applied_names().collect::<Vec<_>>(), [
        "Arch/Draft color transparency to alpha",
        "AttachmentExtension::Support to AttachmentSupport",
    ]);
    assert_eq!(property_names(&pair.document), ["Support", "MapMode"]);
    assert_eq!(color(&pair.gui_document), "3435973632");
    assert_eq!(pair.program_version(), Some("0.21.2"));
}

#[test]
fn downgrade_from_exactly_the_threshold_keeps_that_change() {
    let registry = registry().unwrap();
    let sequencer = Sequencer::new(&registry);
    let mut pair = pair();

    sequencer.run(&mut pair, &version("1.1")).unwrap();
    let report = sequencer.run(&mut pair, &version("0.21.2")).unwrap();

    assert_eq!(report.applied_names().collect::<Vec<_>>(), [
        "AttachmentExtension::Support to AttachmentSupport"
    ]);
    assert_eq!(color(&pair.gui_document), "3435973887");
}

#[test]
fn same_version_only_restamps() {
    let registry = registry().unwrap();
    let mut pair = pair();
    Sequencer::new(&registry).run(&mut pair, &version("1.1")).unwrap();
    let migrated = pair.clone();

    let report = Sequencer::new(&registry).run(&mut pair, &version("1.1.0")).unwrap();

    assert_eq!(report.direction, Direction::Unchanged);
    assert!(report.applied.is_empty());
    assert_eq!(pair.document.children, migrated.document.children);
}
