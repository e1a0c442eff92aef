//! Simple Dublin Core descriptive metadata

use super::{MetadataFields, PayloadContext};
use crate::core::content_key::KeyBuilder;
use crate::core::error::{MetsError, MetsResult};
use crate::core::xml::XmlWriter;
use crate::types::{MetadataFormat, MetadataType};

/// The fifteen Dublin Core 1.1 elements
pub const DC_ELEMENTS: &[&str] = &[
    "contributor",
    "coverage",
    "creator",
    "date",
    "description",
    "format",
    "identifier",
    "language",
    "publisher",
    "relation",
    "rights",
    "source",
    "subject",
    "title",
    "type",
];

/// Descriptive metadata as an ordered list of Dublin Core elements
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescriptiveMetadata {
    elements: Vec<(String, String)>,
}

impl DescriptiveMetadata {
    /// Empty description; add elements with [`with_element`](Self::with_element)
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a Dublin Core element, e.g. `("title", "Annual report")`
    pub fn with_element(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.elements.push((name.into(), value.into()));
        self
    }

    /// Elements in insertion order
    pub fn elements(&self) -> &[(String, String)] {
        &self.elements
    }
}

impl MetadataFields for DescriptiveMetadata {
    fn kind(&self) -> &'static str {
        "descriptive"
    }

    fn metadata_type(&self) -> MetadataType {
        MetadataType::Descriptive
    }

    fn metadata_format(&self) -> MetadataFormat {
        MetadataFormat::Dc
    }

    fn format_version(&self) -> &str {
        "1.1"
    }

    fn validate(&self) -> MetsResult<()> {
        if self.elements.is_empty() {
            return Err(MetsError::InvalidMetadata(
                "descriptive metadata needs at least one element".to_string(),
            ));
        }
        if let Some((name, _)) = self
            .elements
            .iter()
            .find(|(name, _)| !DC_ELEMENTS.contains(&name.as_str()))
        {
            return Err(MetsError::InvalidMetadata(format!(
                "'{}' is not a Dublin Core element",
                name
            )));
        }
        Ok(())
    }

    fn key_fields(&self, key: &mut KeyBuilder) {
        key.list_field(
            "elements",
            self.elements
                .iter()
                .map(|(name, value)| format!("{}={}", name, value)),
        );
    }

    fn write_payload(&self, w: &mut XmlWriter, _ctx: &PayloadContext<'_>) -> MetsResult<()> {
        for (name, value) in &self.elements {
            w.text_element(&format!("dc:{}", name), value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::Metadata;

    #[test]
    fn test_unknown_element_rejected() {
        let result = Metadata::try_from(DescriptiveMetadata::new().with_element("headline", "x"));
        assert!(matches!(result, Err(MetsError::InvalidMetadata(_))));
    }

    #[test]
    fn test_empty_rejected() {
        assert!(Metadata::try_from(DescriptiveMetadata::new()).is_err());
    }

    #[test]
    fn test_payload() {
        let metadata = Metadata::try_from(
            DescriptiveMetadata::new()
                .with_element("title", "Report")
                .with_element("creator", "Archive & Co"),
        )
        .unwrap();
        assert!(metadata.is_descriptive());
        let mut w = XmlWriter::new(None);
        metadata.write_payload(&mut w, &chrono::Utc::now()).unwrap();
        let xml = String::from_utf8(w.into_bytes()).unwrap();
        assert_eq!(
            xml,
            "<dc:title>Report</dc:title><dc:creator>Archive &amp; Co</dc:creator>"
        );
    }
}
