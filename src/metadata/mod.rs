//! Metadata records
//!
//! Every record is a [`Metadata`] value: a shared header (type, format,
//! version, identifier, creation date) plus one [`MetadataRecord`] variant
//! holding the kind-specific fields. Records are plain values. Equality,
//! hashing and deduplication all go through the [`ContentKey`], which covers
//! every semantic field but never the identifier.

use crate::core::content_key::{ContentKey, KeyBuilder};
use crate::core::error::{MetsError, MetsResult};
use crate::core::identifier::{generate_identifier, is_valid_xml_id};
use crate::core::xml::XmlWriter;
use crate::types::{Created, MetadataFormat, MetadataType};
use chrono::{DateTime, Utc};
use std::hash::{Hash, Hasher};

pub mod descriptive;
pub mod imported;
pub mod provenance_agent;
pub mod provenance_event;
pub mod technical_audio;
pub mod technical_csv;
pub mod technical_image;
pub mod technical_object;
pub mod technical_video;

pub use descriptive::DescriptiveMetadata;
pub use imported::ImportedMetadata;
pub use provenance_agent::DigitalProvenanceAgentMetadata;
pub use provenance_event::{DigitalProvenanceEventMetadata, LinkedMetadata};
pub use technical_audio::TechnicalAudioMetadata;
pub use technical_csv::TechnicalCsvMetadata;
pub use technical_image::TechnicalImageMetadata;
pub use technical_object::{Relationship, TechnicalObjectMetadata};
pub use technical_video::TechnicalVideoMetadata;

/// Values available to payload writers during serialization
#[derive(Debug, Clone, Copy)]
pub struct PayloadContext<'a> {
    /// Content key of the record being written
    pub content_key: &'a ContentKey,
    /// Date used where a record leaves its own date unset
    pub default_date: &'a DateTime<Utc>,
}

/// Behaviour shared by every metadata kind
pub trait MetadataFields {
    /// Short tag naming the kind; part of the content key
    fn kind(&self) -> &'static str;

    /// Section the record is written to
    fn metadata_type(&self) -> MetadataType;

    /// Declared metadata format
    fn metadata_format(&self) -> MetadataFormat;

    /// Free-text format name when the format is [`MetadataFormat::Other`]
    fn other_format(&self) -> Option<&str> {
        None
    }

    /// Version of the metadata format
    fn format_version(&self) -> &str;

    /// Kind-specific validation, run once when the record is wrapped
    fn validate(&self) -> MetsResult<()> {
        Ok(())
    }

    /// Register every semantic field with the key builder
    fn key_fields(&self, key: &mut KeyBuilder);

    /// Write the record's XML payload (the child of `mets:xmlData`)
    fn write_payload(&self, writer: &mut XmlWriter, ctx: &PayloadContext<'_>) -> MetsResult<()>;
}

/// Closed set of metadata kinds
#[derive(Debug, Clone)]
#[allow(clippy::large_enum_variant)]
pub enum MetadataRecord {
    /// PREMIS object of a file or bitstream
    TechnicalObject(TechnicalObjectMetadata),
    /// NISO MIX still image metadata
    TechnicalImage(TechnicalImageMetadata),
    /// AudioMD metadata
    TechnicalAudio(TechnicalAudioMetadata),
    /// VideoMD metadata
    TechnicalVideo(TechnicalVideoMetadata),
    /// ADDML metadata for CSV files
    TechnicalCsv(TechnicalCsvMetadata),
    /// Dublin Core description
    Descriptive(DescriptiveMetadata),
    /// PREMIS event
    ProvenanceEvent(DigitalProvenanceEventMetadata),
    /// PREMIS agent
    ProvenanceAgent(DigitalProvenanceAgentMetadata),
    /// Pre-built XML fragment
    Imported(ImportedMetadata),
}

impl MetadataRecord {
    /// Borrow the record through the shared trait
    pub fn fields(&self) -> &dyn MetadataFields {
        match self {
            MetadataRecord::TechnicalObject(r) => r,
            MetadataRecord::TechnicalImage(r) => r,
            MetadataRecord::TechnicalAudio(r) => r,
            MetadataRecord::TechnicalVideo(r) => r,
            MetadataRecord::TechnicalCsv(r) => r,
            MetadataRecord::Descriptive(r) => r,
            MetadataRecord::ProvenanceEvent(r) => r,
            MetadataRecord::ProvenanceAgent(r) => r,
            MetadataRecord::Imported(r) => r,
        }
    }
}

#[derive(Debug, Clone)]
struct MetadataHeader {
    metadata_type: MetadataType,
    metadata_format: MetadataFormat,
    other_format: Option<String>,
    format_version: String,
    identifier: String,
    identifier_given: bool,
    created: Option<Created>,
}

impl MetadataHeader {
    fn resolve(fields: &dyn MetadataFields) -> MetsResult<Self> {
        let other_format = fields
            .other_format()
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        // A free-text format always means OTHER
        let metadata_format = if other_format.is_some() {
            MetadataFormat::Other
        } else if fields.metadata_format() == MetadataFormat::Other {
            return Err(MetsError::InvalidMetadata(
                "metadata format is OTHER but other format is not given".to_string(),
            ));
        } else {
            fields.metadata_format()
        };

        Ok(Self {
            metadata_type: fields.metadata_type(),
            metadata_format,
            other_format,
            format_version: fields.format_version().to_string(),
            identifier: generate_identifier(),
            identifier_given: false,
            created: None,
        })
    }
}

/// A metadata record with its shared header
#[derive(Debug, Clone)]
pub struct Metadata {
    header: MetadataHeader,
    record: MetadataRecord,
    key: ContentKey,
}

impl Metadata {
    fn from_record(record: MetadataRecord) -> MetsResult<Self> {
        let fields = record.fields();
        fields.validate()?;
        let header = MetadataHeader::resolve(fields)?;
        let key = compute_key(&header, &record);
        Ok(Self {
            header,
            record,
            key,
        })
    }

    fn refresh_key(&mut self) {
        self.key = compute_key(&self.header, &self.record);
    }

    /// Use a caller-supplied identifier instead of the generated one
    ///
    /// The identifier must be a valid XML ID. It does not take part in
    /// equality.
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> MetsResult<Self> {
        let identifier = identifier.into();
        if !is_valid_xml_id(&identifier) {
            return Err(MetsError::InvalidMetadata(format!(
                "'{}' is not a valid XML identifier",
                identifier
            )));
        }
        self.header.identifier = identifier;
        self.header.identifier_given = true;
        Ok(self)
    }

    /// Set the creation date of the record
    pub fn with_created(mut self, created: impl Into<Created>) -> Self {
        self.header.created = Some(created.into());
        self.refresh_key();
        self
    }

    /// Section the record is written to
    pub fn metadata_type(&self) -> MetadataType {
        self.header.metadata_type
    }

    /// Metadata format (`MDTYPE`)
    pub fn metadata_format(&self) -> MetadataFormat {
        self.header.metadata_format
    }

    /// Free-text format (`OTHERMDTYPE`)
    pub fn other_format(&self) -> Option<&str> {
        self.header.other_format.as_deref()
    }

    /// Format version (`MDTYPEVERSION`)
    pub fn format_version(&self) -> &str {
        &self.header.format_version
    }

    /// Identifier of the record, caller-supplied or generated
    pub fn identifier(&self) -> &str {
        &self.header.identifier
    }

    /// Whether the identifier was supplied by the caller
    pub fn has_caller_identifier(&self) -> bool {
        self.header.identifier_given
    }

    /// Creation date, if one was set
    pub fn created(&self) -> Option<&Created> {
        self.header.created.as_ref()
    }

    /// Content key of the record
    pub fn content_key(&self) -> &ContentKey {
        &self.key
    }

    /// Kind-specific part of the record
    pub fn record(&self) -> &MetadataRecord {
        &self.record
    }

    /// Whether the record is technical metadata
    pub fn is_technical(&self) -> bool {
        self.header.metadata_type == MetadataType::Technical
    }

    /// Whether the record is descriptive metadata
    pub fn is_descriptive(&self) -> bool {
        self.header.metadata_type.is_descriptive()
    }

    /// Whether the record is administrative metadata
    pub fn is_administrative(&self) -> bool {
        self.header.metadata_type.is_administrative()
    }

    /// Whether the record is a PREMIS event
    pub fn is_event(&self) -> bool {
        matches!(self.record, MetadataRecord::ProvenanceEvent(_))
    }

    /// Whether the record is a PREMIS agent
    pub fn is_agent(&self) -> bool {
        matches!(self.record, MetadataRecord::ProvenanceAgent(_))
    }

    /// Whether the record is a PREMIS object
    pub fn is_technical_object(&self) -> bool {
        matches!(self.record, MetadataRecord::TechnicalObject(_))
    }

    /// Link a provenance agent to this event with the given role
    ///
    /// Fails if this record is not an event or `agent` is not an agent.
    pub fn link_agent_metadata(&mut self, agent: &Metadata, role: impl Into<String>) -> MetsResult<()> {
        if !agent.is_agent() {
            return Err(MetsError::InvalidMetadata(format!(
                "cannot link '{}' metadata as an agent",
                agent.record.fields().kind()
            )));
        }
        let event = self.event_mut()?;
        event.push_agent(LinkedMetadata::new(agent.clone(), role));
        self.refresh_key();
        Ok(())
    }

    /// Link a technical object record to this event with the given role
    ///
    /// Fails if this record is not an event or `object` is not a technical
    /// object record.
    pub fn link_object_metadata(&mut self, object: &Metadata, role: impl Into<String>) -> MetsResult<()> {
        if !object.is_technical_object() {
            return Err(MetsError::InvalidMetadata(format!(
                "cannot link '{}' metadata as an object",
                object.record.fields().kind()
            )));
        }
        let event = self.event_mut()?;
        event.push_object(LinkedMetadata::new(object.clone(), role));
        self.refresh_key();
        Ok(())
    }

    /// Record a PREMIS relationship from this object to another object record
    ///
    /// The related record has to be placed in the document as well, or
    /// serialization fails.
    pub fn add_relationship(
        &mut self,
        related: &Metadata,
        relationship_type: impl Into<String>,
        relationship_subtype: impl Into<String>,
    ) -> MetsResult<()> {
        let resolved = match &related.record {
            MetadataRecord::TechnicalObject(object) => object.resolved_identifier(&related.key),
            _ => {
                return Err(MetsError::InvalidMetadata(
                    "relationships can only point to technical object metadata".to_string(),
                ))
            }
        };
        match &mut self.record {
            MetadataRecord::TechnicalObject(object) => {
                object.push_relationship(Relationship::new(
                    related.key.clone(),
                    resolved,
                    relationship_type,
                    relationship_subtype,
                ));
            }
            _ => {
                return Err(MetsError::InvalidMetadata(
                    "relationships can only be added to technical object metadata".to_string(),
                ))
            }
        }
        self.refresh_key();
        Ok(())
    }

    /// Agents linked to this record with their roles
    pub fn linked_agents(&self) -> &[LinkedMetadata] {
        match &self.record {
            MetadataRecord::ProvenanceEvent(event) => event.linked_agents(),
            _ => &[],
        }
    }

    /// Objects linked to this record with their roles
    pub fn linked_objects(&self) -> &[LinkedMetadata] {
        match &self.record {
            MetadataRecord::ProvenanceEvent(event) => event.linked_objects(),
            _ => &[],
        }
    }

    /// PREMIS relationships of a technical object record
    pub fn relationships(&self) -> &[Relationship] {
        match &self.record {
            MetadataRecord::TechnicalObject(object) => object.relationships(),
            _ => &[],
        }
    }

    /// Every record linked from this one
    pub fn linked_metadata(&self) -> impl Iterator<Item = &Metadata> {
        self.linked_agents()
            .iter()
            .chain(self.linked_objects())
            .map(|link| link.metadata())
    }

    /// Write the XML payload of this record
    pub fn write_payload(&self, writer: &mut XmlWriter, default_date: &DateTime<Utc>) -> MetsResult<()> {
        let ctx = PayloadContext {
            content_key: &self.key,
            default_date,
        };
        self.record.fields().write_payload(writer, &ctx)
    }

    fn event_mut(&mut self) -> MetsResult<&mut DigitalProvenanceEventMetadata> {
        match &mut self.record {
            MetadataRecord::ProvenanceEvent(event) => Ok(event),
            other => Err(MetsError::InvalidMetadata(format!(
                "only events can be linked, not '{}' metadata",
                other.fields().kind()
            ))),
        }
    }
}

fn compute_key(header: &MetadataHeader, record: &MetadataRecord) -> ContentKey {
    let fields = record.fields();
    let mut key = KeyBuilder::new(fields.kind());
    key.field("metadata_type", header.metadata_type.as_str())
        .field("metadata_format", header.metadata_format.as_str())
        .opt_field("other_format", header.other_format.as_deref())
        .field("format_version", &header.format_version)
        .opt_field(
            "created",
            header.created.as_ref().map(|created| match created {
                Created::Exact(_) => format!("exact:{}", created.to_attribute_value()),
                Created::Approximate(s) => format!("approximate:{}", s),
            }),
        );
    fields.key_fields(&mut key);
    key.finish()
}

impl PartialEq for Metadata {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Metadata {}

impl Hash for Metadata {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

macro_rules! impl_try_from_record {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl TryFrom<$ty> for Metadata {
                type Error = MetsError;

                fn try_from(record: $ty) -> MetsResult<Self> {
                    Metadata::from_record(MetadataRecord::$variant(record))
                }
            }
        )+
    };
}

impl_try_from_record! {
    TechnicalObjectMetadata => TechnicalObject,
    TechnicalImageMetadata => TechnicalImage,
    TechnicalAudioMetadata => TechnicalAudio,
    TechnicalVideoMetadata => TechnicalVideo,
    TechnicalCsvMetadata => TechnicalCsv,
    DescriptiveMetadata => Descriptive,
    DigitalProvenanceEventMetadata => ProvenanceEvent,
    DigitalProvenanceAgentMetadata => ProvenanceAgent,
    ImportedMetadata => Imported,
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::types::{AgentType, ChecksumAlgorithm, EventOutcome};

    pub fn agent(name: &str) -> Metadata {
        Metadata::try_from(DigitalProvenanceAgentMetadata::new(
            "local",
            name,
            name,
            AgentType::Software,
        ))
        .unwrap()
    }

    pub fn event(event_type: &str) -> Metadata {
        Metadata::try_from(DigitalProvenanceEventMetadata::new(
            event_type,
            "detail",
            EventOutcome::Success,
            "outcome detail",
        ))
        .unwrap()
    }

    pub fn file_object(checksum: &str) -> Metadata {
        Metadata::try_from(TechnicalObjectMetadata::file(
            "text/plain",
            "(:unap)",
            ChecksumAlgorithm::Md5,
            checksum,
        ))
        .unwrap()
    }

    pub fn dc(title: &str) -> Metadata {
        Metadata::try_from(DescriptiveMetadata::new().with_element("title", title)).unwrap()
    }
}
