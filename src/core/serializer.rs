//! METS XML serializer
//!
//! Serialization runs in two passes. The planning pass collects metadata into
//! a [`MetadataRegistry`], assigns element identifiers and checks graph
//! consistency; nothing is written if it fails. The emission pass then walks
//! the document once and writes it into memory.

use crate::core::error::{MetsError, MetsResult};
use crate::core::namespace::ns;
use crate::core::registry::MetadataRegistry;
use crate::core::xml::{XmlWriter, NO_ATTRS};
use crate::metadata::Metadata;
use crate::mets::{Mets, MetsAgent};
use crate::structure::{DigitalObjectHandle, FileReferences, StructuralMap, StructuralMapDiv};
use crate::types::created::format_datetime;
use crate::types::{Created, MetadataType};
use std::collections::{HashMap, HashSet};

/// Options controlling the XML output
///
/// # Example
///
/// ```
/// use metskit::SerializerOptions;
///
/// let options = SerializerOptions::default().compact().without_declaration();
/// assert_eq!(options.indent(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializerOptions {
    indent: Option<usize>,
    xml_declaration: bool,
}

impl Default for SerializerOptions {
    fn default() -> Self {
        Self {
            indent: Some(2),
            xml_declaration: true,
        }
    }
}

impl SerializerOptions {
    /// Indent nested elements by `spaces`
    pub fn with_indent(mut self, spaces: usize) -> Self {
        self.indent = Some(spaces);
        self
    }

    /// Write everything on one line
    pub fn compact(mut self) -> Self {
        self.indent = None;
        self
    }

    /// Leave out the `<?xml ...?>` declaration
    pub fn without_declaration(mut self) -> Self {
        self.xml_declaration = false;
        self
    }

    /// Indentation width, `None` for compact output
    pub fn indent(&self) -> Option<usize> {
        self.indent
    }

    /// Whether the XML declaration is written
    pub fn xml_declaration(&self) -> bool {
        self.xml_declaration
    }
}

/// One `mets:file` element
#[derive(Debug)]
struct FilePlan {
    object: DigitalObjectHandle,
    identifier: String,
    stream_identifiers: Vec<String>,
}

/// One `mets:fileGrp` element
#[derive(Debug)]
struct FileGroupPlan {
    identifier: String,
    use_attribute: Option<String>,
    files: Vec<FilePlan>,
}

/// Identifiers and metadata groups computed before anything is written
#[derive(Debug)]
struct DocumentPlan {
    registry: MetadataRegistry,
    agent_identifiers: Vec<String>,
    object_identifiers: HashMap<DigitalObjectHandle, String>,
    file_groups: Vec<FileGroupPlan>,
    div_identifiers: Vec<String>,
}

impl DocumentPlan {
    fn build(mets: &Mets) -> MetsResult<Self> {
        check_placements(mets)?;

        let registry = MetadataRegistry::collect(mets);
        registry.check_links()?;

        let agent_identifiers = (1..=mets.agents().len())
            .map(|n| format!("agent-{}", n))
            .collect();

        let mut object_identifiers = HashMap::new();
        let mut file_counter = 0usize;
        for object in mets.digital_objects() {
            let identifier = match object.read().identifier() {
                Some(id) => id.to_string(),
                None => {
                    file_counter += 1;
                    format!("file-{}", file_counter)
                }
            };
            object_identifiers.insert(object, identifier);
        }

        let file_groups = match mets.file_references() {
            Some(references) => plan_file_groups(references, &object_identifiers),
            None => Vec::new(),
        };

        let div_count: usize = mets
            .structural_maps()
            .iter()
            .map(|map| map.iter_divs().len())
            .sum();
        let div_identifiers = (1..=div_count).map(|n| format!("div-{}", n)).collect();

        let plan = Self {
            registry,
            agent_identifiers,
            object_identifiers,
            file_groups,
            div_identifiers,
        };
        plan.check_collisions()?;
        Ok(plan)
    }

    fn check_collisions(&self) -> MetsResult<()> {
        let mut seen: HashSet<&str> = HashSet::new();
        let all = self
            .registry
            .groups()
            .iter()
            .map(|group| group.identifier())
            .chain(self.agent_identifiers.iter().map(String::as_str))
            .chain(self.div_identifiers.iter().map(String::as_str))
            .chain(self.file_groups.iter().flat_map(|group| {
                std::iter::once(group.identifier.as_str()).chain(group.files.iter().flat_map(|file| {
                    std::iter::once(file.identifier.as_str())
                        .chain(file.stream_identifiers.iter().map(String::as_str))
                }))
            }));
        for identifier in all {
            if !seen.insert(identifier) {
                return Err(MetsError::SerializationError(format!(
                    "identifier '{}' is used by more than one element",
                    identifier
                )));
            }
        }
        Ok(())
    }

    fn object_identifier(&self, object: &DigitalObjectHandle) -> MetsResult<&str> {
        self.object_identifiers
            .get(object)
            .map(String::as_str)
            .ok_or_else(|| {
                MetsError::SerializationError(format!(
                    "digital object '{}' has no identifier",
                    object.read().path()
                ))
            })
    }
}

fn check_placements(mets: &Mets) -> MetsResult<()> {
    let referenced: Option<HashSet<DigitalObjectHandle>> = mets
        .file_references()
        .map(|references| references.digital_objects().into_iter().collect());
    for (position, map) in mets.structural_maps().iter().enumerate() {
        let mut seen: HashSet<DigitalObjectHandle> = HashSet::new();
        for object in map.digital_objects() {
            if !seen.insert(object.clone()) {
                return Err(MetsError::SerializationError(format!(
                    "digital object '{}' appears more than once in structural map {}",
                    object.read().path(),
                    position + 1
                )));
            }
            match &referenced {
                None => {
                    return Err(MetsError::SerializationError(
                        "structural maps reference digital objects but no file references exist".to_string(),
                    ))
                }
                Some(referenced) if !referenced.contains(&object) => {
                    return Err(MetsError::SerializationError(format!(
                        "digital object '{}' is not listed in the file references",
                        object.read().path()
                    )))
                }
                Some(_) => {}
            }
        }
    }
    Ok(())
}

fn plan_file_groups(
    references: &FileReferences,
    object_identifiers: &HashMap<DigitalObjectHandle, String>,
) -> Vec<FileGroupPlan> {
    let mut occurrences: HashMap<DigitalObjectHandle, usize> = HashMap::new();
    let mut stream_counter = 0usize;
    let mut groups = Vec::new();

    for (position, group) in references.file_groups().iter().enumerate() {
        let mut files = Vec::new();
        for object in group.digital_objects() {
            let occurrence = occurrences.entry(object.clone()).or_insert(0);
            *occurrence += 1;
            let base = object_identifiers
                .get(object)
                .cloned()
                .unwrap_or_default();
            // Later listings of a shared object need their own element ID
            let identifier = if *occurrence == 1 {
                base
            } else {
                format!("{}.{}", base, occurrence)
            };

            let stream_count = object.read().streams().len();
            let stream_identifiers = (0..stream_count)
                .map(|_| {
                    stream_counter += 1;
                    format!("stream-{}", stream_counter)
                })
                .collect();

            files.push(FilePlan {
                object: object.clone(),
                identifier,
                stream_identifiers,
            });
        }
        groups.push(FileGroupPlan {
            identifier: format!("filegrp-{}", position + 1),
            use_attribute: group.use_attribute().map(str::to_string),
            files,
        });
    }
    groups
}

/// Serializer for one METS document
pub struct MetsSerializer<'a> {
    mets: &'a Mets,
    options: SerializerOptions,
}

impl<'a> MetsSerializer<'a> {
    /// Serializer for `mets` with the given options
    pub fn new(mets: &'a Mets, options: SerializerOptions) -> Self {
        Self { mets, options }
    }

    /// Render the document into memory
    ///
    /// Fails with [`MetsError::SerializationError`] before writing anything
    /// if the graph is inconsistent.
    pub fn serialize(&self) -> MetsResult<Vec<u8>> {
        let plan = DocumentPlan::build(self.mets)?;
        tracing::debug!(
            sections = plan.registry.groups().len(),
            files = plan.object_identifiers.len(),
            divs = plan.div_identifiers.len(),
            "serializing METS document"
        );

        let mut w = XmlWriter::new(self.options.indent);
        if self.options.xml_declaration {
            w.declaration()?;
        }

        self.write_root_start(&mut w)?;
        self.write_header(&mut w, &plan)?;
        self.write_descriptive_sections(&mut w, &plan)?;
        self.write_administrative_sections(&mut w, &plan)?;
        if self.mets.file_references().is_some() {
            self.write_file_section(&mut w, &plan)?;
        }
        let mut div_ids = plan.div_identifiers.iter();
        for map in self.mets.structural_maps() {
            self.write_structural_map(&mut w, &plan, map, &mut div_ids)?;
        }
        w.end("mets:mets")?;

        Ok(w.into_bytes())
    }

    fn write_root_start(&self, w: &mut XmlWriter) -> MetsResult<()> {
        let mets = self.mets;
        let mut attrs: Vec<(String, String)> = mets
            .namespaces()
            .iter()
            .map(|(prefix, uri)| (format!("xmlns:{}", prefix), uri.to_string()))
            .collect();

        attrs.push(("PROFILE".to_string(), mets.profile().as_str().to_string()));
        attrs.push(("OBJID".to_string(), mets.package_id().to_string()));
        if let Some(label) = mets.label() {
            attrs.push(("LABEL".to_string(), label.to_string()));
        }
        attrs.push(("fi:CONTRACTID".to_string(), mets.contract_id().to_string()));
        if let Some(content_id) = mets.content_id() {
            attrs.push(("fi:CONTENTID".to_string(), content_id.to_string()));
        }
        if let Some(catalog) = mets.catalog_version() {
            attrs.push(("fi:CATALOG".to_string(), catalog.to_string()));
        }
        if let Some(specification) = mets.specification() {
            attrs.push(("fi:SPECIFICATION".to_string(), specification.to_string()));
        }
        attrs.push((
            "xsi:schemaLocation".to_string(),
            format!("{} {}", ns::METS, ns::METS_FI_SCHEMA),
        ));

        w.start("mets:mets", attrs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }

    fn write_header(&self, w: &mut XmlWriter, plan: &DocumentPlan) -> MetsResult<()> {
        let mets = self.mets;
        let create_date = format_datetime(mets.create_date());
        let last_mod_date = mets.last_mod_date().map(format_datetime);

        let mut attrs = vec![("CREATEDATE", create_date.as_str())];
        if let Some(date) = &last_mod_date {
            attrs.push(("LASTMODDATE", date.as_str()));
        }
        if let Some(status) = mets.record_status() {
            attrs.push(("RECORDSTATUS", status.as_str()));
        }
        w.start("mets:metsHdr", attrs)?;
        for (agent, identifier) in mets.agents().iter().zip(&plan.agent_identifiers) {
            write_agent(w, agent, identifier)?;
        }
        w.end("mets:metsHdr")
    }

    fn write_descriptive_sections(&self, w: &mut XmlWriter, plan: &DocumentPlan) -> MetsResult<()> {
        for group in plan.registry.groups() {
            if group.metadata().is_descriptive() {
                self.write_section(w, "mets:dmdSec", group.identifier(), group.metadata())?;
            }
        }
        Ok(())
    }

    fn write_administrative_sections(&self, w: &mut XmlWriter, plan: &DocumentPlan) -> MetsResult<()> {
        let groups = plan.registry.groups();
        if !groups.iter().any(|g| g.metadata().is_administrative()) {
            return Ok(());
        }

        let sections: [(&str, fn(MetadataType) -> bool); 4] = [
            ("mets:techMD", |t| t == MetadataType::Technical),
            ("mets:rightsMD", |t| t == MetadataType::Rights),
            ("mets:sourceMD", |t| t == MetadataType::Source),
            ("mets:digiprovMD", |t| t.is_digital_provenance()),
        ];

        w.start("mets:amdSec", NO_ATTRS)?;
        for (element, belongs) in sections {
            for group in groups.iter().filter(|g| belongs(g.metadata().metadata_type())) {
                self.write_section(w, element, group.identifier(), group.metadata())?;
            }
        }
        w.end("mets:amdSec")
    }

    fn write_section(
        &self,
        w: &mut XmlWriter,
        element: &str,
        identifier: &str,
        metadata: &Metadata,
    ) -> MetsResult<()> {
        let created = metadata
            .created()
            .cloned()
            .unwrap_or_else(|| Created::Exact(*self.mets.create_date()));
        let created_value = created.to_attribute_value();
        let created_attr = if created.is_approximate() {
            "fi:CREATED"
        } else {
            "CREATED"
        };
        w.start(element, [("ID", identifier), (created_attr, created_value.as_str())])?;

        let mut wrap_attrs = vec![("MDTYPE", metadata.metadata_format().as_str())];
        if let Some(other) = metadata.other_format() {
            wrap_attrs.push(("OTHERMDTYPE", other));
        }
        wrap_attrs.push(("MDTYPEVERSION", metadata.format_version()));
        w.start("mets:mdWrap", wrap_attrs)?;
        w.start("mets:xmlData", NO_ATTRS)?;
        metadata.write_payload(w, self.mets.create_date())?;
        w.end("mets:xmlData")?;
        w.end("mets:mdWrap")?;
        w.end(element)
    }

    fn write_file_section(&self, w: &mut XmlWriter, plan: &DocumentPlan) -> MetsResult<()> {
        w.start("mets:fileSec", NO_ATTRS)?;
        for group in &plan.file_groups {
            let mut attrs = vec![("ID", group.identifier.as_str())];
            if let Some(use_attribute) = &group.use_attribute {
                attrs.push(("USE", use_attribute.as_str()));
            }
            w.start("mets:fileGrp", attrs)?;
            for file in &group.files {
                write_file(w, plan, file)?;
            }
            w.end("mets:fileGrp")?;
        }
        w.end("mets:fileSec")
    }

    fn write_structural_map<'p, I>(
        &self,
        w: &mut XmlWriter,
        plan: &DocumentPlan,
        map: &StructuralMap,
        div_ids: &mut I,
    ) -> MetsResult<()>
    where
        I: Iterator<Item = &'p String>,
    {
        let mut attrs = Vec::new();
        if let Some(map_type) = map.structural_map_type() {
            attrs.push(("TYPE", map_type));
        }
        if let Some(label) = map.label() {
            attrs.push(("LABEL", label));
        }
        if let Some(pid) = map.pid() {
            attrs.push(("fi:PID", pid));
        }
        if let Some(pid_type) = map.pid_type() {
            attrs.push(("fi:PIDTYPE", pid_type));
        }
        w.start("mets:structMap", attrs)?;
        write_div(w, plan, map.root_div(), div_ids)?;
        w.end("mets:structMap")
    }
}

fn write_agent(w: &mut XmlWriter, agent: &MetsAgent, identifier: &str) -> MetsResult<()> {
    let mut attrs = vec![("ID", identifier), ("ROLE", agent.role().as_str())];
    if let Some(other_role) = agent.other_role() {
        attrs.push(("OTHERROLE", other_role));
    }
    attrs.push(("TYPE", agent.agent_type().as_str()));
    if let Some(other_type) = agent.other_type() {
        attrs.push(("OTHERTYPE", other_type));
    }
    w.start("mets:agent", attrs)?;
    w.text_element("mets:name", agent.name())?;
    w.end("mets:agent")
}

fn write_file(w: &mut XmlWriter, plan: &DocumentPlan, file: &FilePlan) -> MetsResult<()> {
    let object = file.object.read();
    let admid = plan.registry.identifiers_for(object.metadata()).join(" ");

    let mut attrs = vec![("ID", file.identifier.as_str())];
    if let Some(use_attribute) = object.use_attribute() {
        attrs.push(("USE", use_attribute));
    }
    if !admid.is_empty() {
        attrs.push(("ADMID", admid.as_str()));
    }
    w.start("mets:file", attrs)?;

    let href = format!("file://{}", object.path());
    w.empty(
        "mets:FLocat",
        [
            ("LOCTYPE", "URL"),
            ("xlink:href", href.as_str()),
            ("xlink:type", "simple"),
        ],
    )?;

    for (stream, identifier) in object.streams().iter().zip(&file.stream_identifiers) {
        let admid = plan.registry.identifiers_for(stream.metadata()).join(" ");
        let mut attrs = vec![("ID", identifier.as_str())];
        if !admid.is_empty() {
            attrs.push(("ADMID", admid.as_str()));
        }
        w.empty("mets:stream", attrs)?;
    }
    w.end("mets:file")
}

fn write_div<'p, I>(
    w: &mut XmlWriter,
    plan: &DocumentPlan,
    div: &StructuralMapDiv,
    div_ids: &mut I,
) -> MetsResult<()>
where
    I: Iterator<Item = &'p String>,
{
    let identifier = div_ids
        .next()
        .ok_or_else(|| MetsError::SerializationError("div identifiers exhausted".to_string()))?;
    let order = div.order().map(|n| n.to_string());
    let dmdid = plan
        .registry
        .identifiers_for(div.metadata().iter().filter(|m| m.is_descriptive()))
        .join(" ");
    let admid = plan
        .registry
        .identifiers_for(div.metadata().iter().filter(|m| m.is_administrative()))
        .join(" ");

    let mut attrs = vec![("ID", identifier.as_str()), ("TYPE", div.div_type())];
    if let Some(order) = &order {
        attrs.push(("ORDER", order.as_str()));
    }
    if let Some(label) = div.label() {
        attrs.push(("LABEL", label));
    }
    if let Some(orderlabel) = div.orderlabel() {
        attrs.push(("ORDERLABEL", orderlabel));
    }
    if !dmdid.is_empty() {
        attrs.push(("DMDID", dmdid.as_str()));
    }
    if !admid.is_empty() {
        attrs.push(("ADMID", admid.as_str()));
    }
    w.start("mets:div", attrs)?;

    for object in div.digital_objects() {
        let file_id = plan.object_identifier(object)?;
        w.empty("mets:fptr", [("FILEID", file_id)])?;
    }
    for child in div.divs() {
        write_div(w, plan, child, div_ids)?;
    }
    w.end("mets:div")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::test_support::{agent, dc, event, file_object};
    use crate::structure::{DigitalObject, DigitalObjectStream, FileGroup};
    use crate::types::MetsProfile;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn base() -> Mets {
        Mets::new(MetsProfile::CulturalHeritage, "pkg", "urn:uuid:contract", "Archive")
            .unwrap()
            .with_create_date(chrono::Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap())
    }

    fn render(mets: &Mets) -> String {
        let bytes = mets
            .serialize_with(&SerializerOptions::default().compact().without_declaration())
            .unwrap();
        String::from_utf8(bytes).unwrap()
    }

    fn single_object_mets(object: DigitalObject, div_metadata: Vec<Metadata>) -> Mets {
        let mut root = StructuralMapDiv::new("directory");
        root.add_digital_objects([object.into_handle()]).unwrap();
        root.add_metadata(div_metadata);
        let mut mets = base();
        mets.add_structural_maps([StructuralMap::new(root)]);
        mets.generate_file_references().unwrap();
        mets
    }

    #[test]
    fn test_header_and_root() {
        let xml = render(&base().with_label("Test package"));
        assert!(xml.starts_with("<mets:mets xmlns:mets=\"http://www.loc.gov/METS/\""));
        assert!(xml.contains(r#"OBJID="pkg""#));
        assert!(xml.contains(r#"LABEL="Test package""#));
        assert!(xml.contains(r#"fi:CATALOG="1.7.4""#));
        assert!(xml.contains(
            r#"xsi:schemaLocation="http://www.loc.gov/METS/ http://digitalpreservation.fi/schemas/mets/mets.xsd""#
        ));
        assert!(xml.contains(
            r#"<mets:metsHdr CREATEDATE="2024-05-06T07:08:09+00:00"><mets:agent ID="agent-1" ROLE="CREATOR" TYPE="ORGANIZATION"><mets:name>Archive</mets:name></mets:agent></mets:metsHdr>"#
        ));
        assert!(!xml.contains("amdSec"));
        assert!(!xml.contains("fileSec"));
    }

    #[test]
    fn test_section_wrapping() {
        let mut object = DigitalObject::new("data/a.txt").unwrap();
        object.add_metadata([file_object("abc")]).unwrap();
        let xml = render(&single_object_mets(object, vec![]));

        let id = format!("_{}", file_object("abc").content_key().to_uuid());
        assert!(xml.contains(&format!(
            r#"<mets:amdSec><mets:techMD ID="{}" CREATED="2024-05-06T07:08:09+00:00"><mets:mdWrap MDTYPE="PREMIS:OBJECT" MDTYPEVERSION="2.3"><mets:xmlData><premis:object"#,
            id
        )));
        assert!(xml.contains(&format!(r#"<mets:file ID="file-1" ADMID="{}">"#, id)));
        assert!(xml.contains(
            r#"<mets:FLocat LOCTYPE="URL" xlink:href="file://data/a.txt" xlink:type="simple"/>"#
        ));
        assert!(xml.contains(r#"<mets:fptr FILEID="file-1"/>"#));
    }

    #[test]
    fn test_approximate_created_uses_extension_attribute() {
        let mut object = DigitalObject::new("a.txt").unwrap();
        object
            .add_metadata([file_object("abc").with_created("2020-03")])
            .unwrap();
        let xml = render(&single_object_mets(object, vec![]));
        assert!(xml.contains(r#"fi:CREATED="2020-03""#));
    }

    #[test]
    fn test_section_order_and_div_references() {
        let tool = agent("tool");
        let mut ev = event("creation");
        ev.link_agent_metadata(&tool, "executing program").unwrap();
        let description = dc("Package");
        let mut object = DigitalObject::new("a.txt").unwrap();
        object.add_metadata([file_object("abc")]).unwrap();

        let xml = render(&single_object_mets(object, vec![description.clone(), ev.clone(), tool.clone()]));

        let dmd = xml.find("<mets:dmdSec").unwrap();
        let amd = xml.find("<mets:amdSec").unwrap();
        let tech = xml.find("<mets:techMD").unwrap();
        let digiprov = xml.find("<mets:digiprovMD").unwrap();
        let file_sec = xml.find("<mets:fileSec").unwrap();
        let struct_map = xml.find("<mets:structMap").unwrap();
        assert!(dmd < amd && amd < tech && tech < digiprov && digiprov < file_sec && file_sec < struct_map);

        let dmd_id = format!("_{}", description.content_key().to_uuid());
        let adm_ids = format!(
            "_{} _{}",
            ev.content_key().to_uuid(),
            tool.content_key().to_uuid()
        );
        assert!(xml.contains(&format!(
            r#"<mets:div ID="div-1" TYPE="directory" DMDID="{}" ADMID="{}">"#,
            dmd_id, adm_ids
        )));
    }

    #[test]
    fn test_shared_metadata_written_once() {
        let mut a = DigitalObject::new("a.txt").unwrap();
        a.add_metadata([file_object("same")]).unwrap();
        let mut b = DigitalObject::new("b.txt").unwrap();
        b.add_metadata([file_object("same")]).unwrap();
        let mut root = StructuralMapDiv::new("directory");
        root.add_digital_objects([a.into_handle(), b.into_handle()]).unwrap();
        let mut mets = base();
        mets.add_structural_maps([StructuralMap::new(root)]);
        mets.generate_file_references().unwrap();

        let xml = render(&mets);
        assert_eq!(xml.matches("<mets:techMD").count(), 1);
        let id = format!("_{}", file_object("same").content_key().to_uuid());
        assert_eq!(xml.matches(&format!(r#"ADMID="{}""#, id)).count(), 2);
    }

    #[test]
    fn test_caller_identifier_used_for_section() {
        let mut object = DigitalObject::new("a.txt").unwrap();
        object
            .add_metadata([file_object("abc").with_identifier("tech-a").unwrap()])
            .unwrap();
        let xml = render(&single_object_mets(object.with_identifier("obj-a").unwrap(), vec![]));
        assert!(xml.contains(r#"<mets:techMD ID="tech-a""#));
        assert!(xml.contains(r#"<mets:file ID="obj-a" ADMID="tech-a">"#));
        assert!(xml.contains(r#"<mets:fptr FILEID="obj-a"/>"#));
    }

    #[test]
    fn test_streams_written_in_file() {
        let mut object = DigitalObject::new("video.mkv").unwrap();
        object.add_metadata([file_object("container")]).unwrap();
        object.add_streams([
            DigitalObjectStream::with_metadata([file_object("video")]).unwrap(),
            DigitalObjectStream::new(),
        ]);
        let xml = render(&single_object_mets(object, vec![]));
        let stream_id = format!("_{}", file_object("video").content_key().to_uuid());
        assert!(xml.contains(&format!(r#"<mets:stream ID="stream-1" ADMID="{}"/>"#, stream_id)));
        assert!(xml.contains(r#"<mets:stream ID="stream-2"/>"#));
    }

    #[test]
    fn test_no_empty_idrefs() {
        let xml = render(&single_object_mets(DigitalObject::new("a.txt").unwrap(), vec![]));
        assert!(!xml.contains(r#"ADMID="""#));
        assert!(!xml.contains(r#"DMDID="""#));
        assert!(xml.contains(r#"<mets:file ID="file-1">"#));
    }

    #[test]
    fn test_dangling_agent_fails() {
        let mut ev = event("creation");
        ev.link_agent_metadata(&agent("missing"), "executing program").unwrap();
        let mets = single_object_mets(DigitalObject::new("a.txt").unwrap(), vec![ev]);
        assert!(matches!(mets.serialize(), Err(MetsError::SerializationError(_))));
    }

    #[test]
    fn test_missing_file_references_fails() {
        let mut root = StructuralMapDiv::new("directory");
        root.add_digital_objects([DigitalObject::new("a.txt").unwrap().into_handle()])
            .unwrap();
        let mut mets = base();
        mets.add_structural_maps([StructuralMap::new(root)]);
        assert!(matches!(mets.serialize(), Err(MetsError::SerializationError(_))));

        mets.add_file_references(FileReferences::new());
        assert!(matches!(mets.serialize(), Err(MetsError::SerializationError(_))));
    }

    #[test]
    fn test_object_twice_in_one_map_fails() {
        let shared = DigitalObject::new("a.txt").unwrap().into_handle();
        let mut left = StructuralMapDiv::new("left");
        left.add_digital_objects([shared.clone()]).unwrap();
        let mut root = StructuralMapDiv::new("directory");
        root.add_divs([left, StructuralMapDiv::new("right")]).unwrap();
        // A nested div only sees its own subtree
        root.divs_mut()[1].add_digital_objects([shared]).unwrap();

        let mut mets = base();
        mets.add_structural_maps([StructuralMap::new(root)]);
        mets.generate_file_references().unwrap();
        assert!(matches!(mets.serialize(), Err(MetsError::SerializationError(_))));
    }

    #[test]
    fn test_object_in_two_maps_is_fine() {
        let shared = DigitalObject::new("a.txt").unwrap().into_handle();
        let mut physical = StructuralMapDiv::new("directory");
        physical.add_digital_objects([shared.clone()]).unwrap();
        let mut logical = StructuralMapDiv::new("chapter");
        logical.add_digital_objects([shared]).unwrap();

        let mut mets = base();
        mets.add_structural_maps([
            StructuralMap::new(physical).with_type("PHYSICAL"),
            StructuralMap::new(logical).with_type("LOGICAL"),
        ]);
        mets.generate_file_references().unwrap();
        let xml = render(&mets);
        assert_eq!(xml.matches("<mets:file ").count(), 1);
        assert_eq!(xml.matches(r#"<mets:fptr FILEID="file-1"/>"#).count(), 2);
        assert!(xml.contains(r#"<mets:structMap TYPE="LOGICAL"><mets:div ID="div-2" TYPE="chapter">"#));
    }

    #[test]
    fn test_identifier_collision_fails() {
        let mut object = DigitalObject::new("a.txt").unwrap();
        object
            .add_metadata([file_object("abc").with_identifier("div-1").unwrap()])
            .unwrap();
        let mets = single_object_mets(object, vec![]);
        assert!(matches!(mets.serialize(), Err(MetsError::SerializationError(_))));
    }

    #[test]
    fn test_object_in_two_groups_gets_distinct_ids() {
        let object = DigitalObject::new("a.txt").unwrap().into_handle();
        let mut root = StructuralMapDiv::new("directory");
        root.add_digital_objects([object.clone()]).unwrap();
        let mut first = FileGroup::with_use("fi-preservation-file");
        first.add_digital_objects([object.clone()]);
        let mut second = FileGroup::with_use("fi-access-file");
        second.add_digital_objects([object]);
        let mut references = FileReferences::new();
        references.add_file_groups([first, second]);

        let mut mets = base();
        mets.add_structural_maps([StructuralMap::new(root)]);
        mets.add_file_references(references);
        let xml = render(&mets);
        assert!(xml.contains(r#"<mets:fileGrp ID="filegrp-1" USE="fi-preservation-file"><mets:file ID="file-1">"#));
        assert!(xml.contains(r#"<mets:fileGrp ID="filegrp-2" USE="fi-access-file"><mets:file ID="file-1.2">"#));
    }

    #[test]
    fn test_deterministic_output() {
        let build = || {
            let mut object = DigitalObject::new("a.txt").unwrap();
            object.add_metadata([file_object("abc")]).unwrap();
            single_object_mets(object, vec![dc("x")])
        };
        assert_eq!(build().serialize().unwrap(), build().serialize().unwrap());
    }

    #[test]
    fn test_default_options_indent_and_declare() {
        let xml = base().to_xml_string().unwrap();
        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.contains("\n  <mets:metsHdr"));
    }
}
