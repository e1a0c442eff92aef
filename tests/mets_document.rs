//! End-to-end tests for building and serializing METS documents

use chrono::{TimeZone, Utc};
use metskit::*;
use pretty_assertions::assert_eq;

fn package() -> Mets {
    Mets::new(
        MetsProfile::CulturalHeritage,
        "package-1",
        "urn:uuid:9a1b6c5e-1e0b-4c8d-9d58-1b2c3d4e5f60",
        "Example Archive",
    )
    .unwrap()
    .with_create_date(Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap())
    .with_record_status(RecordStatus::Submission)
}

fn text_object(path: &str, checksum: &str) -> DigitalObject {
    let mut object = DigitalObject::new(path).unwrap();
    object
        .add_metadata([Metadata::try_from(
            TechnicalObjectMetadata::file("text/plain", "(:unap)", ChecksumAlgorithm::Md5, checksum)
                .with_charset(Charset::Utf8),
        )
        .unwrap()])
        .unwrap();
    object
}

fn compact(mets: &Mets) -> String {
    let bytes = mets
        .serialize_with(&SerializerOptions::default().compact())
        .unwrap();
    String::from_utf8(bytes).unwrap()
}

#[test]
fn single_object_document() {
    let mut mets = package();
    let mut root = StructuralMapDiv::new("directory");
    root.add_digital_objects([text_object("data/a.txt", "abc").into_handle()])
        .unwrap();
    mets.add_structural_maps([StructuralMap::new(root)]);
    mets.generate_file_references().unwrap();

    let xml = compact(&mets);

    assert_eq!(xml.matches("<mets:structMap").count(), 1);
    assert_eq!(xml.matches("<mets:fileSec>").count(), 1);
    assert_eq!(xml.matches("<mets:file ").count(), 1);
    assert_eq!(xml.matches("<mets:techMD ").count(), 1);
    assert!(!xml.contains(r#"ADMID="""#));
    assert!(!xml.contains(r#"DMDID="""#));
    assert!(!xml.contains(r#"FILEID="""#));

    let metadata = mets.metadata();
    let tech_id = format!("_{}", metadata[0].content_key().to_uuid());
    assert!(xml.contains(&format!(r#"<mets:techMD ID="{}""#, tech_id)));
    assert!(xml.contains(&format!(r#"<mets:file ID="file-1" ADMID="{}">"#, tech_id)));
    assert!(xml.contains("<premis:formatName>text/plain; encoding=UTF-8</premis:formatName>"));
    assert!(xml.contains(r#"RECORDSTATUS="submission""#));
}

#[test]
fn serialization_is_deterministic() {
    let build = || {
        let tool = Metadata::try_from(
            DigitalProvenanceAgentMetadata::new("local", "tool-1", "packager", AgentType::Software)
                .with_version("1.0"),
        )
        .unwrap();
        let mut event = Metadata::try_from(DigitalProvenanceEventMetadata::new(
            "creation",
            "Package creation",
            EventOutcome::Success,
            "Created package",
        ))
        .unwrap();
        event.link_agent_metadata(&tool, "executing program").unwrap();

        let mut mets = package();
        let mut root = StructuralMapDiv::new("directory");
        root.add_digital_objects([
            text_object("data/a.txt", "a").into_handle(),
            text_object("data/b.txt", "b").into_handle(),
        ])
        .unwrap();
        root.add_metadata([event, tool]);
        mets.add_structural_maps([StructuralMap::new(root)]);
        mets.generate_file_references().unwrap();
        mets
    };

    assert_eq!(build().serialize().unwrap(), build().serialize().unwrap());
}

#[test]
fn shared_metadata_deduplicated_across_maps() {
    let description = Metadata::try_from(DescriptiveMetadata::new().with_element("title", "Letters"))
        .unwrap();
    let a = text_object("data/a.txt", "a").into_handle();

    let mut physical = StructuralMapDiv::new("directory");
    physical.add_digital_objects([a.clone()]).unwrap();
    physical.add_metadata([description.clone()]);
    let mut logical = StructuralMapDiv::new("collection");
    logical.add_digital_objects([a]).unwrap();
    logical.add_metadata([description.clone()]);

    let mut mets = package();
    mets.add_structural_maps([
        StructuralMap::new(physical).with_type("PHYSICAL"),
        StructuralMap::new(logical).with_type("LOGICAL"),
    ]);
    mets.generate_file_references().unwrap();

    let xml = compact(&mets);
    let dmd_id = format!("_{}", description.content_key().to_uuid());
    assert_eq!(xml.matches("<mets:dmdSec ").count(), 1);
    assert_eq!(xml.matches(&format!(r#"DMDID="{}""#, dmd_id)).count(), 2);
    assert_eq!(mets.metadata().len(), 2);
}

#[test]
fn event_with_absent_agent_fails() {
    let agent = Metadata::try_from(DigitalProvenanceAgentMetadata::new(
        "local",
        "ghost",
        "ghost",
        AgentType::Software,
    ))
    .unwrap();
    let mut event = Metadata::try_from(DigitalProvenanceEventMetadata::new(
        "validation",
        "",
        EventOutcome::Success,
        "",
    ))
    .unwrap();
    event.link_agent_metadata(&agent, "executing program").unwrap();

    let mut mets = package();
    let mut root = StructuralMapDiv::new("directory");
    root.add_metadata([event]);
    mets.add_structural_maps([StructuralMap::new(root)]);

    let err = mets.serialize().unwrap_err();
    assert!(matches!(err, MetsError::SerializationError(_)));
    assert!(err.to_string().contains("executing program"));
}

#[test]
fn event_linking_object_on_file() {
    let object_md = Metadata::try_from(TechnicalObjectMetadata::file(
        "image/tiff",
        "6.0",
        ChecksumAlgorithm::Sha256,
        "f00d",
    ))
    .unwrap();
    let tool = Metadata::try_from(DigitalProvenanceAgentMetadata::new(
        "local",
        "hasher",
        "hasher",
        AgentType::Software,
    ))
    .unwrap();
    let mut event = Metadata::try_from(DigitalProvenanceEventMetadata::new(
        "message digest calculation",
        "Checksum calculation",
        EventOutcome::Success,
        "Checksum calculated",
    ))
    .unwrap();
    event.link_agent_metadata(&tool, "executing program").unwrap();
    event.link_object_metadata(&object_md, "source").unwrap();

    let mut object = DigitalObject::new("data/image.tif").unwrap();
    object.add_metadata([object_md.clone()]).unwrap();
    let mut root = StructuralMapDiv::new("directory");
    root.add_digital_objects([object.into_handle()]).unwrap();
    root.add_metadata([event, tool]);

    let mut mets = package();
    mets.add_structural_maps([StructuralMap::new(root)]);
    mets.generate_file_references().unwrap();

    let xml = compact(&mets);
    assert!(xml.contains(&format!(
        "<premis:linkingObjectIdentifierValue>{}</premis:linkingObjectIdentifierValue>",
        object_md.content_key().to_uuid()
    )));
    assert!(xml.contains("<premis:agentName>hasher</premis:agentName>"));
}

#[test]
fn imported_fragment_embedded_verbatim() {
    let ead = ImportedMetadata::from_string(
        MetadataType::Descriptive,
        MetadataFormat::Ead,
        "1.1.1",
        "<?xml version=\"1.0\"?>\n<ead3:ead><ead3:control/></ead3:ead>",
    )
    .unwrap();
    let mut root = StructuralMapDiv::new("directory");
    root.add_metadata([Metadata::try_from(ead).unwrap().with_created("2019")]);
    let mut mets = package();
    mets.add_structural_maps([StructuralMap::new(root)]);

    let xml = compact(&mets);
    assert!(xml.contains(r#"fi:CREATED="2019""#));
    assert!(xml.contains(
        r#"<mets:mdWrap MDTYPE="EAD" MDTYPEVERSION="1.1.1"><mets:xmlData><ead3:ead><ead3:control/></ead3:ead></mets:xmlData>"#
    ));
}

#[test]
fn extra_namespace_declared_on_root() {
    let mut mets = package();
    mets.declare_namespace("http://datacite.org/schema/kernel-4", "datacite")
        .unwrap();
    assert!(mets.declare_namespace("http://other", "premis").is_err());
    let xml = compact(&mets);
    assert!(xml.contains(r#"xmlns:datacite="http://datacite.org/schema/kernel-4""#));
}

#[test]
fn write_to_file_is_all_or_nothing() {
    let dir = tempfile::tempdir().unwrap();

    let path = dir.path().join("mets.xml");
    package().write_to_file(&path).unwrap();
    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
    assert!(written.trim_end().ends_with("</mets:mets>"));

    let mut broken = package();
    let mut root = StructuralMapDiv::new("directory");
    root.add_digital_objects([text_object("a.txt", "a").into_handle()])
        .unwrap();
    broken.add_structural_maps([StructuralMap::new(root)]);
    let failed = dir.path().join("broken.xml");
    assert!(broken.write_to_file(&failed).is_err());
    assert!(!failed.exists());
}

#[test]
fn unwritable_destination_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("mets.xml");
    assert!(matches!(package().write_to_file(&path), Err(MetsError::IoError(_))));
}

#[test]
fn structural_map_attributes() {
    let mut root = StructuralMapDiv::new("volume")
        .with_order(1)
        .with_label("Volume I")
        .with_orderlabel("I");
    root.add_divs([StructuralMapDiv::new("page").with_order(2)]).unwrap();
    let map = StructuralMap::new(root)
        .with_type("LOGICAL")
        .with_label("Contents")
        .with_pid("urn:nbn:fi-fe2024", "URN")
        .unwrap();
    let mut mets = package();
    mets.add_structural_maps([map]);

    let xml = compact(&mets);
    assert!(xml.contains(concat!(
        r#"<mets:structMap TYPE="LOGICAL" LABEL="Contents" fi:PID="urn:nbn:fi-fe2024" fi:PIDTYPE="URN">"#,
        r#"<mets:div ID="div-1" TYPE="volume" ORDER="1" LABEL="Volume I" ORDERLABEL="I">"#,
        r#"<mets:div ID="div-2" TYPE="page" ORDER="2"></mets:div>"#,
        r#"</mets:div></mets:structMap>"#,
    )));
}
