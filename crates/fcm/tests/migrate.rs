use fcm::config::MigratorConfig;
use fcm::container::Container;
use fcm::engine::{Registry, attribute, find_by_tag};
use fcm::{Compression, Direction, Migrator, Version};
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

const DOCUMENT: &str = r#"<?xml version='1.0' encoding='utf-8'?>
<Document SchemaVersion="4" ProgramVersion="0.21.2R33771 (Git)" FileVersion="1">
    <ObjectData Count="1">
        <Object name="Sketch">
            <Properties Count="1">
                <Property name="Support" type="App::PropertyLinkSubList"><LinkSubList count="1"><Link obj="Pad" sub="Face6"/></LinkSubList></Property>
            </Properties>
        </Object>
    </ObjectData>
</Document>"#;

const GUI_DOCUMENT: &str = r#"<?xml version='1.0' encoding='utf-8'?>
<Document SchemaVersion="1">
    <ViewProviderData Count="1">
        <ViewProvider name="Sketch">
            <Properties Count="1">
                <Property name="LineColor" type="App::PropertyColor"><PropertyColor value="255"/></Property>
            </Properties>
        </ViewProvider>
    </ViewProviderData>
</Document>"#;

const SHAPE: &[u8] = b"DBRep_DrawableShape\nCASCADE Topology V1\x00\xff";

fn fixture(dir: &Path, parts: &[(&str, &[u8])]) -> PathBuf {
    let path = dir.join("Sketch.FCStd");
    let mut writer = ZipWriter::new(File::create(&path).unwrap());
    for (name, bytes) in parts {
        writer.start_file(*name, SimpleFileOptions::default()).unwrap();
        writer.write_all(bytes).unwrap();
    }
    writer.finish().unwrap();
    path
}

fn complete(dir: &Path) -> PathBuf {
    fixture(dir, &[
        ("Document.xml", DOCUMENT.as_bytes()),
        ("GuiDocument.xml", GUI_DOCUMENT.as_bytes()),
        ("Sketch.brp", SHAPE),
    ])
}

fn migrator() -> Migrator {
    Migrator::from_config(&MigratorConfig::default()).unwrap()
}

fn version(raw: &str) -> Version {
    Version::parse(raw).unwrap()
}

#[test]
fn migrates_a_file_to_1_1() {
    let temp = TempDir::new().unwrap();
    let input = complete(temp.path());
    let output = temp.path().join("Sketch-1.1.FCStd");

    let outcome = migrator().migrate_file(&input, &output, &version("1.1")).unwrap();
    assert_eq!(outcome.report.direction, Direction::Forward);
    assert_eq!(outcome.report.applied.len(), 2);
    assert_eq!(outcome.export.copied, 1);

    let pair = Container::open(&output).unwrap().load_pair().unwrap();
    assert_eq!(pair.program_version(), Some("1.1"));
    assert_eq!(attribute(find_by_tag(&pair.document, "Property")[0], "name"), Some("AttachmentSupport"));
    assert_eq!(attribute(find_by_tag(&pair.gui_document, "PropertyColor")[0], "value"), Some("0"));

    let mut shape = Vec::new();
    let mut archive = ZipArchive::new(File::open(&output).unwrap()).unwrap();
    archive.by_name("Sketch.brp").unwrap().read_to_end(&mut shape).unwrap();
    assert_eq!(shape, SHAPE);
}

#[test]
fn plan_file_reports_without_writing() {
    let temp = TempDir::new().unwrap();
    let input = complete(temp.path());
    let before = std::fs::read(&input).unwrap();

    let migrator = migrator();
    let plan = migrator.plan_file(&input, &version("1.0")).unwrap();
    assert_eq!(plan.direction(), Direction::Forward);
    assert_eq!(plan.source(), &version("0.21.2.33771"));
    let names: Vec<_> = plan.steps().iter().map(|step| step.metadata.name).collect();
    assert_eq!(names, [
        "AttachmentExtension::Support to AttachmentSupport",
        "Arch/Draft color transparency to alpha",
    ]);

    assert_eq!(std::fs::read(&input).unwrap(), before);
}

#[test]
fn missing_presentation_tree_writes_nothing() {
    let temp = TempDir::new().unwrap();
    let input = fixture(temp.path(), &[("Document.xml", DOCUMENT.as_bytes())]);
    let output = temp.path().join("out.FCStd");

    let err = migrator().migrate_file(&input, &output, &version("1.1")).unwrap_err();
    assert_eq!(err.kind(), "Container");
    assert!(err.to_string().contains("GuiDocument.xml"));
    assert!(!output.exists());
}

#[test]
fn unit_failure_leaves_the_output_untouched() {
    let temp = TempDir::new().unwrap();
    let gui = GUI_DOCUMENT.replace(r#"value="255""#, r#"value="opaque""#);
    let input = fixture(temp.path(), &[("Document.xml", DOCUMENT.as_bytes()), ("GuiDocument.xml", gui.as_bytes())]);
    let output = temp.path().join("out.FCStd");
    std::fs::write(&output, b"previous").unwrap();

    let err = migrator().migrate_file(&input, &output, &version("1.1")).unwrap_err();
    assert_eq!(err.kind(), "Migration");
    assert_eq!(std::fs::read(&output).unwrap(), b"previous");
}

#[test]
fn empty_registry_only_restamps() {
    let temp = TempDir::new().unwrap();
    let input = complete(temp.path());
    let migrator = Migrator::new(Registry::default(), Compression::Stored);

    let outcome = migrator.migrate_file(&input, &input, &version("1.1")).unwrap();
    assert!(outcome.report.applied.is_empty());

    let pair = Container::open(&input).unwrap().load_pair().unwrap();
    assert_eq!(pair.program_version(), Some("1.1"));
    assert_eq!(attribute(find_by_tag(&pair.document, "Property")[0], "name"), Some("Support"));
}
