//! PREMIS agent metadata

use super::{MetadataFields, PayloadContext};
use crate::core::content_key::KeyBuilder;
use crate::core::error::{MetsError, MetsResult};
use crate::core::xml::{XmlWriter, NO_ATTRS};
use crate::types::{AgentType, MetadataFormat, MetadataType};

/// A person, organization, software or hardware taking part in events
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigitalProvenanceAgentMetadata {
    agent_identifier_type: String,
    agent_identifier: String,
    agent_name: String,
    agent_type: AgentType,
    agent_version: Option<String>,
    agent_note: Option<String>,
}

impl DigitalProvenanceAgentMetadata {
    /// Agent with an identifier, name and type
    pub fn new(
        agent_identifier_type: impl Into<String>,
        agent_identifier: impl Into<String>,
        agent_name: impl Into<String>,
        agent_type: AgentType,
    ) -> Self {
        Self {
            agent_identifier_type: agent_identifier_type.into(),
            agent_identifier: agent_identifier.into(),
            agent_name: agent_name.into(),
            agent_type,
            agent_version: None,
            agent_note: None,
        }
    }

    /// Version of a software or hardware agent
    ///
    /// Ignored for other agent types.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        if self.agent_type.is_versioned() {
            self.agent_version = Some(version.into());
        } else {
            tracing::debug!(agent_type = %self.agent_type, "ignoring version of unversioned agent");
        }
        self
    }

    /// Free-form note about the agent
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.agent_note = Some(note.into());
        self
    }

    /// Identifier type
    pub fn agent_identifier_type(&self) -> &str {
        &self.agent_identifier_type
    }

    /// Identifier value
    pub fn agent_identifier(&self) -> &str {
        &self.agent_identifier
    }

    /// Agent name as given
    pub fn agent_name(&self) -> &str {
        &self.agent_name
    }

    /// Agent type
    pub fn agent_type(&self) -> AgentType {
        self.agent_type
    }

    /// Version, kept only for software and hardware agents
    pub fn agent_version(&self) -> Option<&str> {
        self.agent_version.as_deref()
    }

    /// Name written to the document, with the version appended as `-vX`
    pub fn serialized_name(&self) -> String {
        match &self.agent_version {
            Some(version) => format!("{}-v{}", self.agent_name, version),
            None => self.agent_name.clone(),
        }
    }
}

impl MetadataFields for DigitalProvenanceAgentMetadata {
    fn kind(&self) -> &'static str {
        "provenance-agent"
    }

    fn metadata_type(&self) -> MetadataType {
        MetadataType::DigitalProvenanceAgent
    }

    fn metadata_format(&self) -> MetadataFormat {
        MetadataFormat::PremisAgent
    }

    fn format_version(&self) -> &str {
        "2.3"
    }

    fn validate(&self) -> MetsResult<()> {
        if self.agent_identifier_type.is_empty() || self.agent_identifier.is_empty() {
            return Err(MetsError::InvalidMetadata(
                "agent identifier and identifier type are required".to_string(),
            ));
        }
        if self.agent_name.is_empty() {
            return Err(MetsError::InvalidMetadata("agent name is required".to_string()));
        }
        Ok(())
    }

    fn key_fields(&self, key: &mut KeyBuilder) {
        key.field("agent_identifier_type", &self.agent_identifier_type)
            .field("agent_identifier", &self.agent_identifier)
            .field("agent_name", &self.agent_name)
            .field("agent_type", self.agent_type.as_str())
            .opt_field("agent_version", self.agent_version.as_deref())
            .opt_field("agent_note", self.agent_note.as_deref());
    }

    fn write_payload(&self, w: &mut XmlWriter, _ctx: &PayloadContext<'_>) -> MetsResult<()> {
        w.start("premis:agent", NO_ATTRS)?;
        w.start("premis:agentIdentifier", NO_ATTRS)?;
        w.text_element("premis:agentIdentifierType", &self.agent_identifier_type)?;
        w.text_element("premis:agentIdentifierValue", &self.agent_identifier)?;
        w.end("premis:agentIdentifier")?;
        w.text_element("premis:agentName", &self.serialized_name())?;
        w.text_element("premis:agentType", self.agent_type.as_str())?;
        w.opt_text_element("premis:agentNote", self.agent_note.as_deref())?;
        w.end("premis:agent")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::Metadata;

    #[test]
    fn test_version_kept_for_software() {
        let agent = DigitalProvenanceAgentMetadata::new("local", "a1", "ffmpeg", AgentType::Software)
            .with_version("6.0");
        assert_eq!(agent.agent_version(), Some("6.0"));
        assert_eq!(agent.serialized_name(), "ffmpeg-v6.0");
    }

    #[test]
    fn test_version_dropped_for_person() {
        let agent = DigitalProvenanceAgentMetadata::new("orcid", "0000", "Jane", AgentType::Person)
            .with_version("2");
        assert_eq!(agent.agent_version(), None);
        assert_eq!(agent.serialized_name(), "Jane");
        let plain = DigitalProvenanceAgentMetadata::new("orcid", "0000", "Jane", AgentType::Person);
        assert_eq!(Metadata::try_from(agent).unwrap(), Metadata::try_from(plain).unwrap());
    }

    #[test]
    fn test_missing_identifier_rejected() {
        let agent = DigitalProvenanceAgentMetadata::new("", "a1", "tool", AgentType::Software);
        assert!(matches!(Metadata::try_from(agent), Err(MetsError::InvalidMetadata(_))));
    }

    #[test]
    fn test_payload() {
        let metadata = Metadata::try_from(
            DigitalProvenanceAgentMetadata::new("local", "a1", "scanner", AgentType::Hardware)
                .with_version("2")
                .with_note("in lab 3"),
        )
        .unwrap();
        assert_eq!(metadata.metadata_type(), MetadataType::DigitalProvenanceAgent);
        let mut w = XmlWriter::new(None);
        metadata.write_payload(&mut w, &chrono::Utc::now()).unwrap();
        let xml = String::from_utf8(w.into_bytes()).unwrap();
        assert!(xml.contains("<premis:agentName>scanner-v2</premis:agentName>"));
        assert!(xml.contains("<premis:agentType>hardware</premis:agentType>"));
        assert!(xml.contains("<premis:agentNote>in lab 3</premis:agentNote>"));
    }
}
