//! PREMIS object metadata for files and bitstreams

use super::{MetadataFields, PayloadContext};
use crate::core::content_key::{ContentKey, KeyBuilder};
use crate::core::error::{MetsError, MetsResult};
use crate::core::xml::{XmlWriter, NO_ATTRS};
use crate::types::vocabulary::UNAP;
use crate::types::{Charset, ChecksumAlgorithm, MetadataFormat, MetadataType, PremisObjectType};

/// Relationship from one PREMIS object to another
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    object_identifier_type: String,
    object_identifier: String,
    relationship_type: String,
    relationship_subtype: String,
    target: ContentKey,
}

impl Relationship {
    pub(crate) fn new(
        target: ContentKey,
        (object_identifier_type, object_identifier): (String, String),
        relationship_type: impl Into<String>,
        relationship_subtype: impl Into<String>,
    ) -> Self {
        Self {
            object_identifier_type,
            object_identifier,
            relationship_type: relationship_type.into(),
            relationship_subtype: relationship_subtype.into(),
            target,
        }
    }

    /// Content key of the related object record
    pub fn target(&self) -> &ContentKey {
        &self.target
    }

    /// Identifier type of the related object
    pub fn object_identifier_type(&self) -> &str {
        &self.object_identifier_type
    }

    /// Identifier value of the related object
    pub fn object_identifier(&self) -> &str {
        &self.object_identifier
    }

    /// High-level category of the relationship
    pub fn relationship_type(&self) -> &str {
        &self.relationship_type
    }

    /// Specific characterization of the relationship
    pub fn relationship_subtype(&self) -> &str {
        &self.relationship_subtype
    }
}

/// Technical object metadata of a file or a bitstream
///
/// File objects need a checksum; bitstream objects describe data embedded in
/// a file and do not. When no object identifier is given, one is derived from
/// the record's content key at serialization time.
#[derive(Debug, Clone)]
pub struct TechnicalObjectMetadata {
    object_type: PremisObjectType,
    file_format: String,
    file_format_version: String,
    checksum_algorithm: Option<ChecksumAlgorithm>,
    checksum: Option<String>,
    file_created_date: Option<String>,
    object_identifier_type: Option<String>,
    object_identifier: Option<String>,
    charset: Option<Charset>,
    original_name: Option<String>,
    format_registry_name: Option<String>,
    format_registry_key: Option<String>,
    creating_application: Option<String>,
    creating_application_version: Option<String>,
    relationships: Vec<Relationship>,
}

impl TechnicalObjectMetadata {
    fn with_type(object_type: PremisObjectType, file_format: String, file_format_version: String) -> Self {
        Self {
            object_type,
            file_format,
            file_format_version,
            checksum_algorithm: None,
            checksum: None,
            file_created_date: None,
            object_identifier_type: None,
            object_identifier: None,
            charset: None,
            original_name: None,
            format_registry_name: None,
            format_registry_key: None,
            creating_application: None,
            creating_application_version: None,
            relationships: Vec::new(),
        }
    }

    /// Object metadata for a single file
    pub fn file(
        file_format: impl Into<String>,
        file_format_version: impl Into<String>,
        checksum_algorithm: ChecksumAlgorithm,
        checksum: impl Into<String>,
    ) -> Self {
        let mut object = Self::with_type(
            PremisObjectType::File,
            file_format.into(),
            file_format_version.into(),
        );
        object.checksum_algorithm = Some(checksum_algorithm);
        object.checksum = Some(checksum.into());
        object
    }

    /// Object metadata for a bitstream embedded in a file
    pub fn bitstream(file_format: impl Into<String>, file_format_version: impl Into<String>) -> Self {
        Self::with_type(
            PremisObjectType::Bitstream,
            file_format.into(),
            file_format_version.into(),
        )
    }

    /// Actual or approximate date the file was created
    pub fn with_file_created_date(mut self, date: impl Into<String>) -> Self {
        self.file_created_date = Some(date.into());
        self
    }

    /// Object identifier and its type
    pub fn with_object_identifier(mut self, identifier_type: impl Into<String>, identifier: impl Into<String>) -> Self {
        self.object_identifier_type = Some(identifier_type.into());
        self.object_identifier = Some(identifier.into());
        self
    }

    /// Character encoding, appended to the format name
    pub fn with_charset(mut self, charset: Charset) -> Self {
        self.charset = Some(charset);
        self
    }

    /// Original name of the file
    pub fn with_original_name(mut self, name: impl Into<String>) -> Self {
        self.original_name = Some(name.into());
        self
    }

    /// Format registry entry describing the file format
    pub fn with_format_registry(mut self, name: impl Into<String>, key: impl Into<String>) -> Self {
        self.format_registry_name = Some(name.into());
        self.format_registry_key = Some(key.into());
        self
    }

    /// Software used to create the file
    pub fn with_creating_application(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.creating_application = Some(name.into());
        self.creating_application_version = Some(version.into());
        self
    }

    /// PREMIS object category
    pub fn object_type(&self) -> PremisObjectType {
        self.object_type
    }

    /// Mimetype of the file
    pub fn file_format(&self) -> &str {
        &self.file_format
    }

    /// Version of the file format
    pub fn file_format_version(&self) -> &str {
        &self.file_format_version
    }

    /// Checksum algorithm, for file objects
    pub fn checksum_algorithm(&self) -> Option<ChecksumAlgorithm> {
        self.checksum_algorithm
    }

    /// Checksum, for file objects
    pub fn checksum(&self) -> Option<&str> {
        self.checksum.as_deref()
    }

    /// Caller-supplied object identifier
    pub fn object_identifier(&self) -> Option<&str> {
        self.object_identifier.as_deref()
    }

    /// Relationships to other objects
    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    pub(crate) fn push_relationship(&mut self, relationship: Relationship) {
        self.relationships.push(relationship);
    }

    /// Identifier type and value written to the document
    pub(crate) fn resolved_identifier(&self, key: &ContentKey) -> (String, String) {
        match (&self.object_identifier_type, &self.object_identifier) {
            (Some(id_type), Some(id)) if !id_type.is_empty() && !id.is_empty() => {
                (id_type.clone(), id.clone())
            }
            _ => ("UUID".to_string(), key.to_uuid().to_string()),
        }
    }

    fn serialized_format_name(&self) -> String {
        match self.charset {
            Some(charset) => format!("{}; encoding={}", self.file_format, charset),
            None => self.file_format.clone(),
        }
    }
}

fn is_set(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}

fn require_pair(a: &Option<String>, a_name: &str, b: &Option<String>, b_name: &str) -> MetsResult<()> {
    match (is_set(a), is_set(b)) {
        (true, false) => Err(MetsError::InvalidMetadata(format!(
            "{} is given but {} is not",
            a_name, b_name
        ))),
        (false, true) => Err(MetsError::InvalidMetadata(format!(
            "{} is given but {} is not",
            b_name, a_name
        ))),
        _ => Ok(()),
    }
}

impl MetadataFields for TechnicalObjectMetadata {
    fn kind(&self) -> &'static str {
        "technical-object"
    }

    fn metadata_type(&self) -> MetadataType {
        MetadataType::Technical
    }

    fn metadata_format(&self) -> MetadataFormat {
        MetadataFormat::PremisObject
    }

    fn format_version(&self) -> &str {
        "2.3"
    }

    fn validate(&self) -> MetsResult<()> {
        if self.file_format.is_empty() {
            return Err(MetsError::InvalidMetadata(
                "empty value not allowed for file format".to_string(),
            ));
        }
        if self.file_format_version.is_empty() {
            return Err(MetsError::InvalidMetadata(
                "empty value not allowed for file format version".to_string(),
            ));
        }
        if self.object_type == PremisObjectType::File {
            if self.checksum_algorithm.is_none() {
                return Err(MetsError::InvalidMetadata(
                    "file objects require a checksum algorithm".to_string(),
                ));
            }
            if !is_set(&self.checksum) {
                return Err(MetsError::InvalidMetadata(
                    "file objects require a checksum".to_string(),
                ));
            }
        }
        require_pair(
            &self.object_identifier_type,
            "object identifier type",
            &self.object_identifier,
            "object identifier",
        )?;
        require_pair(
            &self.format_registry_name,
            "format registry name",
            &self.format_registry_key,
            "format registry key",
        )?;
        require_pair(
            &self.creating_application,
            "creating application",
            &self.creating_application_version,
            "creating application version",
        )
    }

    fn key_fields(&self, key: &mut KeyBuilder) {
        key.field("object_type", self.object_type.as_str())
            .field("file_format", &self.file_format)
            .field("file_format_version", &self.file_format_version)
            .opt_field("checksum_algorithm", self.checksum_algorithm.map(|a| a.as_str()))
            .opt_field("checksum", self.checksum.as_deref())
            .opt_field("file_created_date", self.file_created_date.as_deref())
            .opt_field("object_identifier_type", self.object_identifier_type.as_deref())
            .opt_field("object_identifier", self.object_identifier.as_deref())
            .opt_field("charset", self.charset.map(|c| c.as_str()))
            .opt_field("original_name", self.original_name.as_deref())
            .opt_field("format_registry_name", self.format_registry_name.as_deref())
            .opt_field("format_registry_key", self.format_registry_key.as_deref())
            .opt_field("creating_application", self.creating_application.as_deref())
            .opt_field(
                "creating_application_version",
                self.creating_application_version.as_deref(),
            )
            .list_field(
                "relationships",
                self.relationships.iter().map(|r| {
                    format!(
                        "{}\u{1f}{}\u{1f}{}\u{1f}{}\u{1f}{}",
                        r.object_identifier_type,
                        r.object_identifier,
                        r.relationship_type,
                        r.relationship_subtype,
                        r.target
                    )
                }),
            );
    }

    fn write_payload(&self, w: &mut XmlWriter, ctx: &PayloadContext<'_>) -> MetsResult<()> {
        let xsi_type = format!("premis:{}", self.object_type);
        w.start("premis:object", [("xsi:type", xsi_type.as_str())])?;

        let (id_type, id_value) = self.resolved_identifier(ctx.content_key);
        w.start("premis:objectIdentifier", NO_ATTRS)?;
        w.text_element("premis:objectIdentifierType", &id_type)?;
        w.text_element("premis:objectIdentifierValue", &id_value)?;
        w.end("premis:objectIdentifier")?;

        w.start("premis:objectCharacteristics", NO_ATTRS)?;
        w.text_element("premis:compositionLevel", "0")?;
        if let (Some(algorithm), Some(checksum)) = (self.checksum_algorithm, &self.checksum) {
            w.start("premis:fixity", NO_ATTRS)?;
            w.text_element("premis:messageDigestAlgorithm", algorithm.as_str())?;
            w.text_element("premis:messageDigest", checksum)?;
            w.end("premis:fixity")?;
        }

        w.start("premis:format", NO_ATTRS)?;
        w.start("premis:formatDesignation", NO_ATTRS)?;
        w.text_element("premis:formatName", &self.serialized_format_name())?;
        // (:unap) is not a valid formatVersion value, leave the element out
        if self.file_format_version != UNAP {
            w.text_element("premis:formatVersion", &self.file_format_version)?;
        }
        w.end("premis:formatDesignation")?;
        if let (Some(name), Some(key)) = (&self.format_registry_name, &self.format_registry_key) {
            w.start("premis:formatRegistry", NO_ATTRS)?;
            w.text_element("premis:formatRegistryName", name)?;
            w.text_element("premis:formatRegistryKey", key)?;
            w.end("premis:formatRegistry")?;
        }
        w.end("premis:format")?;

        if self.creating_application.is_some() || self.file_created_date.is_some() {
            w.start("premis:creatingApplication", NO_ATTRS)?;
            w.opt_text_element("premis:creatingApplicationName", self.creating_application.as_deref())?;
            w.opt_text_element(
                "premis:creatingApplicationVersion",
                self.creating_application_version.as_deref(),
            )?;
            w.opt_text_element("premis:dateCreatedByApplication", self.file_created_date.as_deref())?;
            w.end("premis:creatingApplication")?;
        }
        w.end("premis:objectCharacteristics")?;

        w.opt_text_element("premis:originalName", self.original_name.as_deref())?;

        // One premis:relationship per (type, subtype) pair, in first-seen order
        let mut groups: Vec<(&str, &str, Vec<&Relationship>)> = Vec::new();
        for rel in &self.relationships {
            match groups
                .iter_mut()
                .find(|(t, s, _)| *t == rel.relationship_type && *s == rel.relationship_subtype)
            {
                Some((_, _, members)) => members.push(rel),
                None => groups.push((
                    rel.relationship_type.as_str(),
                    rel.relationship_subtype.as_str(),
                    vec![rel],
                )),
            }
        }
        for (rel_type, rel_subtype, members) in groups {
            w.start("premis:relationship", NO_ATTRS)?;
            w.text_element("premis:relationshipType", rel_type)?;
            w.text_element("premis:relationshipSubType", rel_subtype)?;
            for rel in members {
                w.start("premis:relatedObjectIdentification", NO_ATTRS)?;
                w.text_element("premis:relatedObjectIdentifierType", &rel.object_identifier_type)?;
                w.text_element("premis:relatedObjectIdentifierValue", &rel.object_identifier)?;
                w.end("premis:relatedObjectIdentification")?;
            }
            w.end("premis:relationship")?;
        }

        w.end("premis:object")
    }
}
