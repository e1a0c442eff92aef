//! PREMIS event metadata and event links

use super::{Metadata, MetadataFields, MetadataRecord, PayloadContext};
use crate::core::content_key::KeyBuilder;
use crate::core::error::{MetsError, MetsResult};
use crate::core::xml::{XmlWriter, NO_ATTRS};
use crate::types::created::format_datetime;
use crate::types::{EventOutcome, MetadataFormat, MetadataType};

/// A record linked from an event, with the role it played
#[derive(Debug, Clone)]
pub struct LinkedMetadata {
    metadata: Metadata,
    role: String,
}

impl LinkedMetadata {
    pub(crate) fn new(metadata: Metadata, role: impl Into<String>) -> Self {
        Self {
            metadata,
            role: role.into(),
        }
    }

    /// The linked record
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Role of the linked record in the event
    pub fn role(&self) -> &str {
        &self.role
    }

    fn key_entry(&self) -> String {
        format!("{}\u{1f}{}", self.metadata.content_key(), self.role)
    }
}

/// An action involving one or more digital objects
///
/// When no event identifier is given, a UUID derived from the record's
/// content key is written instead. When no date is given, the document
/// creation date is used.
#[derive(Debug, Clone)]
pub struct DigitalProvenanceEventMetadata {
    event_type: String,
    detail: String,
    outcome: EventOutcome,
    outcome_detail: String,
    datetime: Option<String>,
    event_identifier_type: Option<String>,
    event_identifier: Option<String>,
    linked_agents: Vec<LinkedMetadata>,
    linked_objects: Vec<LinkedMetadata>,
}

impl DigitalProvenanceEventMetadata {
    /// Event with its type, detail and outcome
    pub fn new(
        event_type: impl Into<String>,
        detail: impl Into<String>,
        outcome: EventOutcome,
        outcome_detail: impl Into<String>,
    ) -> Self {
        Self {
            event_type: event_type.into(),
            detail: detail.into(),
            outcome,
            outcome_detail: outcome_detail.into(),
            datetime: None,
            event_identifier_type: None,
            event_identifier: None,
            linked_agents: Vec::new(),
            linked_objects: Vec::new(),
        }
    }

    /// Date and time, or range, of the event
    pub fn with_datetime(mut self, datetime: impl Into<String>) -> Self {
        self.datetime = Some(datetime.into());
        self
    }

    /// Event identifier and its type
    pub fn with_event_identifier(mut self, identifier_type: impl Into<String>, identifier: impl Into<String>) -> Self {
        self.event_identifier_type = Some(identifier_type.into());
        self.event_identifier = Some(identifier.into());
        self
    }

    /// Category of the event, e.g. `message digest calculation`
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// Outcome of the event
    pub fn outcome(&self) -> EventOutcome {
        self.outcome
    }

    /// Caller-supplied event date
    pub fn datetime(&self) -> Option<&str> {
        self.datetime.as_deref()
    }

    /// Linked agents in link order
    pub fn linked_agents(&self) -> &[LinkedMetadata] {
        &self.linked_agents
    }

    /// Linked objects in link order
    pub fn linked_objects(&self) -> &[LinkedMetadata] {
        &self.linked_objects
    }

    pub(crate) fn push_agent(&mut self, link: LinkedMetadata) {
        self.linked_agents.push(link);
    }

    pub(crate) fn push_object(&mut self, link: LinkedMetadata) {
        self.linked_objects.push(link);
    }
}

impl MetadataFields for DigitalProvenanceEventMetadata {
    fn kind(&self) -> &'static str {
        "provenance-event"
    }

    fn metadata_type(&self) -> MetadataType {
        MetadataType::DigitalProvenanceEvent
    }

    fn metadata_format(&self) -> MetadataFormat {
        MetadataFormat::PremisEvent
    }

    fn format_version(&self) -> &str {
        "2.3"
    }

    fn validate(&self) -> MetsResult<()> {
        let has_identifier = self.event_identifier.as_deref().is_some_and(|v| !v.is_empty());
        let has_type = self.event_identifier_type.as_deref().is_some_and(|v| !v.is_empty());
        if has_identifier && !has_type {
            return Err(MetsError::InvalidMetadata(
                "event identifier is given but event identifier type is not".to_string(),
            ));
        }
        if self.event_type.is_empty() {
            return Err(MetsError::InvalidMetadata("event type is required".to_string()));
        }
        Ok(())
    }

    fn key_fields(&self, key: &mut KeyBuilder) {
        key.field("event_type", &self.event_type)
            .field("detail", &self.detail)
            .field("outcome", self.outcome.as_str())
            .field("outcome_detail", &self.outcome_detail)
            .opt_field("datetime", self.datetime.as_deref())
            .opt_field("event_identifier_type", self.event_identifier_type.as_deref())
            .opt_field("event_identifier", self.event_identifier.as_deref())
            .list_field("linked_agents", self.linked_agents.iter().map(LinkedMetadata::key_entry))
            .list_field("linked_objects", self.linked_objects.iter().map(LinkedMetadata::key_entry));
    }

    fn write_payload(&self, w: &mut XmlWriter, ctx: &PayloadContext<'_>) -> MetsResult<()> {
        let (id_type, id_value) = match (&self.event_identifier_type, &self.event_identifier) {
            (Some(id_type), Some(id)) if !id.is_empty() => (id_type.clone(), id.clone()),
            _ => ("UUID".to_string(), ctx.content_key.to_uuid().to_string()),
        };
        let datetime = match &self.datetime {
            Some(datetime) => datetime.clone(),
            None => format_datetime(ctx.default_date),
        };

        w.start("premis:event", NO_ATTRS)?;
        w.start("premis:eventIdentifier", NO_ATTRS)?;
        w.text_element("premis:eventIdentifierType", &id_type)?;
        w.text_element("premis:eventIdentifierValue", &id_value)?;
        w.end("premis:eventIdentifier")?;
        w.text_element("premis:eventType", &self.event_type)?;
        w.text_element("premis:eventDateTime", &datetime)?;
        w.text_element("premis:eventDetail", &self.detail)?;

        w.start("premis:eventOutcomeInformation", NO_ATTRS)?;
        w.text_element("premis:eventOutcome", self.outcome.as_str())?;
        w.start("premis:eventOutcomeDetail", NO_ATTRS)?;
        w.text_element("premis:eventOutcomeDetailNote", &self.outcome_detail)?;
        w.end("premis:eventOutcomeDetail")?;
        w.end("premis:eventOutcomeInformation")?;

        for link in &self.linked_agents {
            if let MetadataRecord::ProvenanceAgent(agent) = link.metadata.record() {
                w.start("premis:linkingAgentIdentifier", NO_ATTRS)?;
                w.text_element("premis:linkingAgentIdentifierType", agent.agent_identifier_type())?;
                w.text_element("premis:linkingAgentIdentifierValue", agent.agent_identifier())?;
                w.text_element("premis:linkingAgentRole", &link.role)?;
                w.end("premis:linkingAgentIdentifier")?;
            }
        }
        for link in &self.linked_objects {
            if let MetadataRecord::TechnicalObject(object) = link.metadata.record() {
                let (obj_type, obj_value) = object.resolved_identifier(link.metadata.content_key());
                w.start("premis:linkingObjectIdentifier", NO_ATTRS)?;
                w.text_element("premis:linkingObjectIdentifierType", &obj_type)?;
                w.text_element("premis:linkingObjectIdentifierValue", &obj_value)?;
                w.text_element("premis:linkingObjectRole", &link.role)?;
                w.end("premis:linkingObjectIdentifier")?;
            }
        }

        w.end("premis:event")
    }
}
