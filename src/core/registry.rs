//! Whole-document metadata registry
//!
//! Every metadata record placed in the document is collected once, grouped by
//! content key. A group is written as one section and referenced by IDREF
//! from every place that carries it.

use crate::core::content_key::ContentKey;
use crate::core::error::{MetsError, MetsResult};
use crate::metadata::Metadata;
use crate::mets::Mets;
use crate::structure::{DigitalObject, DigitalObjectHandle, StructuralMapDiv};
use std::collections::{HashMap, HashSet};

/// Records sharing one content key
#[derive(Debug, Clone)]
pub struct MetadataGroup {
    metadata: Metadata,
    identifier: String,
    caller_identifier: bool,
}

impl MetadataGroup {
    fn new(metadata: &Metadata) -> Self {
        let (identifier, caller_identifier) = if metadata.has_caller_identifier() {
            (metadata.identifier().to_string(), true)
        } else {
            (format!("_{}", metadata.content_key().to_uuid()), false)
        };
        Self {
            metadata: metadata.clone(),
            identifier,
            caller_identifier,
        }
    }

    /// First record seen with this content key
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Section identifier: the first caller identifier in the group, or a UUID
    /// derived from the content key
    pub fn identifier(&self) -> &str {
        &self.identifier
    }
}

/// Ordered registry of metadata groups keyed by content key
#[derive(Debug, Clone, Default)]
pub struct MetadataRegistry {
    groups: Vec<MetadataGroup>,
    index: HashMap<ContentKey, usize>,
}

impl MetadataRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect every record placed in the document
    ///
    /// Order: structural maps in order, each div tree depth-first with the div's
    /// own metadata, then its objects (object metadata, then stream metadata),
    /// then its sub-divs; finally objects listed only in file references.
    pub fn collect(mets: &Mets) -> Self {
        let mut registry = Self::new();
        let mut visited: HashSet<DigitalObjectHandle> = HashSet::new();
        for map in mets.structural_maps() {
            registry.collect_div(map.root_div(), &mut visited);
        }
        if let Some(references) = mets.file_references() {
            for object in references.digital_objects() {
                if visited.insert(object.clone()) {
                    object.read_with(|o| registry.collect_object(o));
                }
            }
        }
        registry
    }

    fn collect_div(&mut self, div: &StructuralMapDiv, visited: &mut HashSet<DigitalObjectHandle>) {
        for metadata in div.metadata() {
            self.insert(metadata);
        }
        for object in div.digital_objects() {
            if visited.insert(object.clone()) {
                object.read_with(|o| self.collect_object(o));
            }
        }
        for child in div.divs() {
            self.collect_div(child, visited);
        }
    }

    fn collect_object(&mut self, object: &DigitalObject) {
        for metadata in object.metadata() {
            self.insert(metadata);
        }
        for stream in object.streams() {
            for metadata in stream.metadata() {
                self.insert(metadata);
            }
        }
    }

    /// Add one occurrence of a record
    pub fn insert(&mut self, metadata: &Metadata) {
        match self.index.get(metadata.content_key()) {
            Some(&position) => {
                let group = &mut self.groups[position];
                if !group.caller_identifier && metadata.has_caller_identifier() {
                    group.identifier = metadata.identifier().to_string();
                    group.caller_identifier = true;
                }
            }
            None => {
                self.index
                    .insert(metadata.content_key().clone(), self.groups.len());
                self.groups.push(MetadataGroup::new(metadata));
            }
        }
    }

    /// Groups in first-seen order
    pub fn groups(&self) -> &[MetadataGroup] {
        &self.groups
    }

    /// Section identifier for a content key
    pub fn identifier(&self, key: &ContentKey) -> Option<&str> {
        self.index
            .get(key)
            .map(|&position| self.groups[position].identifier())
    }

    /// Whether a record with this content key is placed in the document
    pub fn contains(&self, key: &ContentKey) -> bool {
        self.index.contains_key(key)
    }

    /// Section identifiers of the given records, deduplicated, in order
    pub fn identifiers_for<'a, I>(&self, metadata: I) -> Vec<&str>
    where
        I: IntoIterator<Item = &'a Metadata>,
    {
        let mut ids: Vec<&str> = Vec::new();
        for entry in metadata {
            if let Some(id) = self.identifier(entry.content_key()) {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
        }
        ids
    }

    /// Fail if an event or a relationship points at a record that is not
    /// placed in the document
    pub fn check_links(&self) -> MetsResult<()> {
        for group in &self.groups {
            let record = group.metadata();
            for relationship in record.relationships() {
                if !self.contains(relationship.target()) {
                    return Err(MetsError::SerializationError(format!(
                        "object '{}' has a '{}' relationship to object '{}' that is not placed in the document",
                        group.identifier(),
                        relationship.relationship_subtype(),
                        relationship.object_identifier()
                    )));
                }
            }
            for link in record.linked_agents().iter().chain(record.linked_objects()) {
                let linked = link.metadata();
                if !self.contains(linked.content_key()) {
                    return Err(MetsError::SerializationError(format!(
                        "event '{}' links {} metadata '{}' with role '{}' that is not placed in the document",
                        group.identifier(),
                        linked.metadata_type(),
                        linked.identifier(),
                        link.role()
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::test_support::{agent, event, file_object};

    #[test]
    fn test_first_caller_identifier_wins() {
        let generated = agent("tool");
        let named = agent("tool").with_identifier("agent-tool").unwrap();
        let other_name = agent("tool").with_identifier("second-name").unwrap();

        let mut registry = MetadataRegistry::new();
        registry.insert(&generated);
        assert_eq!(
            registry.identifier(generated.content_key()),
            Some(format!("_{}", generated.content_key().to_uuid()).as_str())
        );
        registry.insert(&named);
        registry.insert(&other_name);
        assert_eq!(registry.groups().len(), 1);
        assert_eq!(registry.identifier(generated.content_key()), Some("agent-tool"));
    }

    #[test]
    fn test_dangling_link_detected() {
        let tool = agent("tool");
        let mut ev = event("creation");
        ev.link_agent_metadata(&tool, "executing program").unwrap();

        let mut registry = MetadataRegistry::new();
        registry.insert(&ev);
        assert!(matches!(registry.check_links(), Err(MetsError::SerializationError(_))));

        registry.insert(&tool);
        assert!(registry.check_links().is_ok());
    }

    #[test]
    fn test_unplaced_relationship_target_detected() {
        let container = file_object("container");
        let mut stream = file_object("stream");
        stream
            .add_relationship(&container, "structural", "is included in")
            .unwrap();

        let mut registry = MetadataRegistry::new();
        registry.insert(&stream);
        let err = registry.check_links().unwrap_err();
        assert!(matches!(err, MetsError::SerializationError(_)));
        assert!(err.to_string().contains("is included in"));

        registry.insert(&container);
        assert!(registry.check_links().is_ok());
    }

    #[test]
    fn test_identifiers_deduplicated() {
        let a = agent("a");
        let mut registry = MetadataRegistry::new();
        registry.insert(&a);
        let ids = registry.identifiers_for([&a, &agent("a")]);
        assert_eq!(ids.len(), 1);
    }
}
