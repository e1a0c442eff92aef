//! The METS root document

use crate::core::error::{MetsError, MetsResult};
use crate::core::identifier::is_printable_ascii;
use crate::core::namespace::NamespaceMap;
use crate::core::registry::MetadataRegistry;
use crate::core::serializer::{MetsSerializer, SerializerOptions};
use crate::metadata::Metadata;
use crate::structure::{DigitalObjectHandle, FileGroup, FileReferences, StructuralMap};
use crate::types::{AgentRole, MetsAgentType, MetsProfile, RecordStatus};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Default schema catalog version (`fi:CATALOG`)
pub const METS_CATALOG: &str = "1.7.4";

/// Default packaging specification version (`fi:SPECIFICATION`)
pub const METS_SPECIFICATION: &str = "1.7.4";

/// A party involved in making the package (`mets:agent` in `mets:metsHdr`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetsAgent {
    name: String,
    role: AgentRole,
    other_role: Option<String>,
    agent_type: MetsAgentType,
    other_type: Option<String>,
}

impl MetsAgent {
    /// Agent with a predefined role and type
    pub fn new(name: impl Into<String>, role: AgentRole, agent_type: MetsAgentType) -> Self {
        Self {
            name: name.into(),
            role,
            other_role: None,
            agent_type,
            other_type: None,
        }
    }

    /// Free-text role; sets the role to OTHER
    pub fn with_other_role(mut self, other_role: impl Into<String>) -> Self {
        self.role = AgentRole::Other;
        self.other_role = Some(other_role.into());
        self
    }

    /// Free-text type; sets the type to OTHER
    pub fn with_other_type(mut self, other_type: impl Into<String>) -> Self {
        self.agent_type = MetsAgentType::Other;
        self.other_type = Some(other_type.into());
        self
    }

    /// Agent name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `ROLE` attribute
    pub fn role(&self) -> AgentRole {
        self.role
    }

    /// `OTHERROLE` attribute
    pub fn other_role(&self) -> Option<&str> {
        self.other_role.as_deref()
    }

    /// `TYPE` attribute
    pub fn agent_type(&self) -> MetsAgentType {
        self.agent_type
    }

    /// `OTHERTYPE` attribute
    pub fn other_type(&self) -> Option<&str> {
        self.other_type.as_deref()
    }

    fn validate(&self) -> MetsResult<()> {
        if self.name.is_empty() {
            return Err(MetsError::InvalidValue("agent name cannot be empty".to_string()));
        }
        let other_role = self.other_role.as_deref().is_some_and(|s| !s.is_empty());
        if (self.role == AgentRole::Other) != other_role {
            return Err(MetsError::InvalidValue(
                "agent role OTHER and other_role must be given together".to_string(),
            ));
        }
        let other_type = self.other_type.as_deref().is_some_and(|s| !s.is_empty());
        if (self.agent_type == MetsAgentType::Other) != other_type {
            return Err(MetsError::InvalidValue(
                "agent type OTHER and other_type must be given together".to_string(),
            ));
        }
        Ok(())
    }
}

/// A METS document under construction
///
/// Serializing the same graph twice yields identical bytes. The create date
/// defaults to the construction time and is also the `CREATED` date of every
/// metadata section without its own date, so two separately built documents
/// only match byte for byte when both set [`Mets::with_create_date`].
///
/// # Example
///
/// ```
/// use metskit::{DigitalObject, Mets, MetsProfile, StructuralMap, StructuralMapDiv};
///
/// let mut mets = Mets::new(MetsProfile::CulturalHeritage, "pkg-1", "urn:uuid:contract", "Archive")?;
/// let object = DigitalObject::new("data/a.txt")?.into_handle();
/// let mut root = StructuralMapDiv::new("directory");
/// root.add_digital_objects([object])?;
/// mets.add_structural_maps([StructuralMap::new(root)]);
/// mets.generate_file_references()?;
/// let xml = mets.to_xml_string()?;
/// assert!(xml.contains("<mets:fileSec>"));
/// # Ok::<(), metskit::MetsError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Mets {
    profile: MetsProfile,
    package_id: String,
    contract_id: String,
    content_id: Option<String>,
    label: Option<String>,
    create_date: DateTime<Utc>,
    last_mod_date: Option<DateTime<Utc>>,
    record_status: Option<RecordStatus>,
    catalog_version: Option<String>,
    specification: Option<String>,
    agents: Vec<MetsAgent>,
    structural_maps: Vec<StructuralMap>,
    file_references: Option<FileReferences>,
    namespaces: NamespaceMap,
}

impl Mets {
    /// New document; the creator becomes the first agent, typed ORGANIZATION
    ///
    /// The create date is the current time until [`Mets::with_create_date`]
    /// sets it.
    ///
    /// `package_id` and `contract_id` must be non-empty printable US-ASCII.
    pub fn new(
        profile: MetsProfile,
        package_id: impl Into<String>,
        contract_id: impl Into<String>,
        creator_name: impl Into<String>,
    ) -> MetsResult<Self> {
        let package_id = package_id.into();
        let contract_id = contract_id.into();
        require_printable("package_id", &package_id)?;
        require_printable("contract_id", &contract_id)?;

        let creator = MetsAgent::new(creator_name, AgentRole::Creator, MetsAgentType::Organization);
        creator.validate()?;

        Ok(Self {
            profile,
            package_id,
            contract_id,
            content_id: None,
            label: None,
            create_date: Utc::now(),
            last_mod_date: None,
            record_status: None,
            catalog_version: Some(METS_CATALOG.to_string()),
            specification: Some(METS_SPECIFICATION.to_string()),
            agents: vec![creator],
            structural_maps: Vec::new(),
            file_references: None,
            namespaces: NamespaceMap::new(),
        })
    }

    /// Identifier of the package content (`fi:CONTENTID`)
    pub fn with_content_id(mut self, content_id: impl Into<String>) -> MetsResult<Self> {
        let content_id = content_id.into();
        require_printable("content_id", &content_id)?;
        self.content_id = Some(content_id);
        Ok(self)
    }

    /// Short description of the package (`LABEL`)
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Package creation time; defaults to the construction time
    pub fn with_create_date(mut self, create_date: DateTime<Utc>) -> Self {
        self.create_date = create_date;
        self
    }

    /// Time of the last modification (`LASTMODDATE`)
    pub fn with_last_mod_date(mut self, last_mod_date: DateTime<Utc>) -> Self {
        self.last_mod_date = Some(last_mod_date);
        self
    }

    /// Record status (`RECORDSTATUS`)
    pub fn with_record_status(mut self, record_status: RecordStatus) -> Self {
        self.record_status = Some(record_status);
        self
    }

    /// Schema catalog version (`fi:CATALOG`)
    pub fn with_catalog_version(mut self, version: impl Into<String>) -> Self {
        self.catalog_version = Some(version.into());
        self
    }

    /// Drop `fi:CATALOG`; the specification version must remain
    pub fn without_catalog_version(mut self) -> MetsResult<Self> {
        if self.specification.is_none() {
            return Err(MetsError::InvalidValue(
                "either catalog_version or specification has to be set".to_string(),
            ));
        }
        self.catalog_version = None;
        Ok(self)
    }

    /// Packaging specification version (`fi:SPECIFICATION`)
    pub fn with_specification(mut self, version: impl Into<String>) -> Self {
        self.specification = Some(version.into());
        self
    }

    /// Drop `fi:SPECIFICATION`; the catalog version must remain
    pub fn without_specification(mut self) -> MetsResult<Self> {
        if self.catalog_version.is_none() {
            return Err(MetsError::InvalidValue(
                "either catalog_version or specification has to be set".to_string(),
            ));
        }
        self.specification = None;
        Ok(self)
    }

    /// Type of the creator agent
    pub fn with_creator_type(mut self, agent_type: MetsAgentType) -> MetsResult<Self> {
        let mut creator = self.agents[0].clone();
        creator.agent_type = agent_type;
        creator.other_type = None;
        creator.validate()?;
        self.agents[0] = creator;
        Ok(self)
    }

    /// Free-text type of the creator agent; sets the type to OTHER
    pub fn with_creator_other_type(mut self, other_type: impl Into<String>) -> MetsResult<Self> {
        let creator = self.agents[0].clone().with_other_type(other_type);
        creator.validate()?;
        self.agents[0] = creator;
        Ok(self)
    }

    /// Append an agent after the creator
    pub fn add_agent(&mut self, agent: MetsAgent) -> MetsResult<()> {
        agent.validate()?;
        self.agents.push(agent);
        Ok(())
    }

    /// Append structural maps
    pub fn add_structural_maps<I>(&mut self, maps: I)
    where
        I: IntoIterator<Item = StructuralMap>,
    {
        self.structural_maps.extend(maps);
    }

    /// Set the file references, replacing any previous ones
    pub fn add_file_references(&mut self, file_references: FileReferences) {
        if self.file_references.is_some() {
            tracing::warn!("replacing existing file references");
        }
        self.file_references = Some(file_references);
    }

    /// Put every digital object of the structural maps into one file group
    ///
    /// Objects are collected in div-tree order, each once. Existing file
    /// references are replaced.
    pub fn generate_file_references(&mut self) -> MetsResult<()> {
        let mut seen: HashSet<DigitalObjectHandle> = HashSet::new();
        let objects: Vec<DigitalObjectHandle> = self
            .structural_maps
            .iter()
            .flat_map(StructuralMap::digital_objects)
            .filter(|object| seen.insert(object.clone()))
            .collect();
        if objects.is_empty() {
            return Err(MetsError::InvalidStructure(
                "no digital objects in the structural maps, cannot generate file references".to_string(),
            ));
        }
        tracing::debug!(count = objects.len(), "generated file references");

        let mut group = FileGroup::new();
        group.add_digital_objects(objects);
        let mut references = FileReferences::new();
        references.add_file_groups([group]);
        self.add_file_references(references);
        Ok(())
    }

    /// Declare an extra namespace on the root element
    pub fn declare_namespace(&mut self, uri: &str, prefix: &str) -> MetsResult<()> {
        self.namespaces.register(uri, prefix)
    }

    /// METS profile
    pub fn profile(&self) -> MetsProfile {
        self.profile
    }

    /// Package identifier (`OBJID`)
    pub fn package_id(&self) -> &str {
        &self.package_id
    }

    /// Contract identifier
    pub fn contract_id(&self) -> &str {
        &self.contract_id
    }

    /// Content identifier
    pub fn content_id(&self) -> Option<&str> {
        self.content_id.as_deref()
    }

    /// Label
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Creation date; also the default date of undated metadata
    pub fn create_date(&self) -> &DateTime<Utc> {
        &self.create_date
    }

    /// Last modification date
    pub fn last_mod_date(&self) -> Option<&DateTime<Utc>> {
        self.last_mod_date.as_ref()
    }

    /// Record status
    pub fn record_status(&self) -> Option<RecordStatus> {
        self.record_status
    }

    /// Catalog version
    pub fn catalog_version(&self) -> Option<&str> {
        self.catalog_version.as_deref()
    }

    /// Specification version
    pub fn specification(&self) -> Option<&str> {
        self.specification.as_deref()
    }

    /// Agents; the creator is always first
    pub fn agents(&self) -> &[MetsAgent] {
        &self.agents
    }

    /// Structural maps
    pub fn structural_maps(&self) -> &[StructuralMap] {
        &self.structural_maps
    }

    /// Mutable structural maps, e.g. for bundling
    pub fn structural_maps_mut(&mut self) -> &mut [StructuralMap] {
        &mut self.structural_maps
    }

    /// File references
    pub fn file_references(&self) -> Option<&FileReferences> {
        self.file_references.as_ref()
    }

    /// Namespaces declared on the root element
    pub fn namespaces(&self) -> &NamespaceMap {
        &self.namespaces
    }

    /// Distinct digital objects: structural maps first, then file references
    pub fn digital_objects(&self) -> Vec<DigitalObjectHandle> {
        let mut seen: HashSet<DigitalObjectHandle> = HashSet::new();
        let mut out: Vec<DigitalObjectHandle> = Vec::new();
        let from_maps = self.structural_maps.iter().flat_map(StructuralMap::digital_objects);
        let from_references = self
            .file_references
            .iter()
            .flat_map(FileReferences::digital_objects);
        for object in from_maps.chain(from_references) {
            if seen.insert(object.clone()) {
                out.push(object);
            }
        }
        out
    }

    /// Distinct metadata placed anywhere in the document, in document order
    pub fn metadata(&self) -> Vec<Metadata> {
        MetadataRegistry::collect(self)
            .groups()
            .iter()
            .map(|group| group.metadata().clone())
            .collect()
    }

    /// Render the document with default options
    pub fn serialize(&self) -> MetsResult<Vec<u8>> {
        self.serialize_with(&SerializerOptions::default())
    }

    /// Render the document with the given options
    pub fn serialize_with(&self, options: &SerializerOptions) -> MetsResult<Vec<u8>> {
        MetsSerializer::new(self, options.clone()).serialize()
    }

    /// Render the document as a string
    pub fn to_xml_string(&self) -> MetsResult<String> {
        let bytes = self.serialize()?;
        String::from_utf8(bytes)
            .map_err(|e| MetsError::SerializationError(format!("UTF-8 encoding error: {}", e)))
    }

    /// Render the document and write it to `path`
    ///
    /// Nothing is written if rendering fails.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> MetsResult<()> {
        let bytes = self.serialize()?;
        fs::write(path.as_ref(), bytes)?;
        tracing::debug!(path = %path.as_ref().display(), "wrote METS document");
        Ok(())
    }
}

fn require_printable(name: &str, value: &str) -> MetsResult<()> {
    if is_printable_ascii(value) {
        Ok(())
    } else {
        Err(MetsError::InvalidValue(format!(
            "{} '{}' must be non-empty printable US-ASCII",
            name, value
        )))
    }
}
