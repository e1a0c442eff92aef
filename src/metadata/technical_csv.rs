//! ADDML technical metadata for CSV files

use super::{MetadataFields, PayloadContext};
use crate::core::content_key::KeyBuilder;
use crate::core::error::{MetsError, MetsResult};
use crate::core::xml::{XmlWriter, NO_ATTRS};
use crate::types::{Charset, MetadataFormat, MetadataType};

const FLAT_FILE_DEFINITION_REFERENCE: &str = "ref001";
const FLAT_FILE_TYPE_REFERENCE: &str = "rec001";

/// Technical metadata describing the layout of one or more CSV files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TechnicalCsvMetadata {
    /// Names of the files sharing this layout
    pub filenames: Vec<String>,
    /// Header columns
    pub header: Vec<String>,
    /// Character encoding of the files
    pub charset: Charset,
    /// Field delimiter
    pub delimiter: String,
    /// Record separator
    pub record_separator: String,
    /// Quoting character, if values are quoted
    pub quoting_character: Option<String>,
}

impl TechnicalCsvMetadata {
    /// CSV metadata for the given files and columns
    pub fn new<F, H>(
        filenames: F,
        header: H,
        charset: Charset,
        delimiter: impl Into<String>,
        record_separator: impl Into<String>,
    ) -> Self
    where
        F: IntoIterator,
        F::Item: Into<String>,
        H: IntoIterator,
        H::Item: Into<String>,
    {
        Self {
            filenames: filenames.into_iter().map(Into::into).collect(),
            header: header.into_iter().map(Into::into).collect(),
            charset,
            delimiter: delimiter.into(),
            record_separator: record_separator.into(),
            quoting_character: None,
        }
    }

    /// Set the quoting character
    pub fn with_quoting_character(mut self, quoting_character: impl Into<String>) -> Self {
        self.quoting_character = Some(quoting_character.into());
        self
    }
}

impl MetadataFields for TechnicalCsvMetadata {
    fn kind(&self) -> &'static str {
        "technical-csv"
    }

    fn metadata_type(&self) -> MetadataType {
        MetadataType::Technical
    }

    fn metadata_format(&self) -> MetadataFormat {
        MetadataFormat::Other
    }

    fn other_format(&self) -> Option<&str> {
        Some("ADDML")
    }

    fn format_version(&self) -> &str {
        "8.3"
    }

    fn validate(&self) -> MetsResult<()> {
        if self.filenames.is_empty() {
            return Err(MetsError::InvalidMetadata(
                "CSV metadata needs at least one file name".to_string(),
            ));
        }
        if self.header.is_empty() {
            return Err(MetsError::InvalidMetadata(
                "CSV metadata needs at least one header column".to_string(),
            ));
        }
        Ok(())
    }

    fn key_fields(&self, key: &mut KeyBuilder) {
        key.list_field("filenames", &self.filenames)
            .list_field("header", &self.header)
            .field("charset", self.charset.as_str())
            .field("delimiter", &self.delimiter)
            .field("record_separator", &self.record_separator)
            .opt_field("quoting_character", self.quoting_character.as_deref());
    }

    fn write_payload(&self, w: &mut XmlWriter, _ctx: &PayloadContext<'_>) -> MetsResult<()> {
        w.start("addml:addml", NO_ATTRS)?;
        w.start("addml:dataset", NO_ATTRS)?;
        w.start("addml:flatFiles", NO_ATTRS)?;

        for filename in &self.filenames {
            w.empty(
                "addml:flatFile",
                [
                    ("name", filename.as_str()),
                    ("definitionReference", FLAT_FILE_DEFINITION_REFERENCE),
                ],
            )?;
        }

        w.start("addml:flatFileDefinitions", NO_ATTRS)?;
        w.start(
            "addml:flatFileDefinition",
            [
                ("name", FLAT_FILE_DEFINITION_REFERENCE),
                ("typeReference", FLAT_FILE_TYPE_REFERENCE),
            ],
        )?;
        w.start("addml:recordDefinitions", NO_ATTRS)?;
        w.start("addml:recordDefinition", [("name", "record")])?;
        w.start("addml:fieldDefinitions", NO_ATTRS)?;
        for column in &self.header {
            w.empty(
                "addml:fieldDefinition",
                [("name", column.as_str()), ("typeReference", "String")],
            )?;
        }
        w.end("addml:fieldDefinitions")?;
        w.end("addml:recordDefinition")?;
        w.end("addml:recordDefinitions")?;
        w.end("addml:flatFileDefinition")?;
        w.end("addml:flatFileDefinitions")?;

        w.start("addml:structureTypes", NO_ATTRS)?;
        w.start("addml:flatFileTypes", NO_ATTRS)?;
        w.start("addml:flatFileType", [("name", FLAT_FILE_TYPE_REFERENCE)])?;
        w.text_element("addml:charset", self.charset.as_str())?;
        w.start("addml:delimFileFormat", NO_ATTRS)?;
        w.text_element("addml:recordSeparator", &self.record_separator)?;
        w.text_element("addml:fieldSeparatingChar", &self.delimiter)?;
        w.opt_text_element("addml:quotingChar", self.quoting_character.as_deref())?;
        w.end("addml:delimFileFormat")?;
        w.end("addml:flatFileType")?;
        w.end("addml:flatFileTypes")?;
        w.start("addml:fieldTypes", NO_ATTRS)?;
        w.start("addml:fieldType", [("name", "String")])?;
        w.text_element("addml:dataType", "string")?;
        w.end("addml:fieldType")?;
        w.end("addml:fieldTypes")?;
        w.end("addml:structureTypes")?;

        w.end("addml:flatFiles")?;
        w.end("addml:dataset")?;
        w.end("addml:addml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::Metadata;

    fn csv() -> TechnicalCsvMetadata {
        TechnicalCsvMetadata::new(["data/a.csv"], ["id", "name"], Charset::Utf8, ",", "CR+LF")
            .with_quoting_character("\"")
    }

    #[test]
    fn test_requires_files_and_columns() {
        let mut no_files = csv();
        no_files.filenames.clear();
        assert!(Metadata::try_from(no_files).is_err());

        let mut no_header = csv();
        no_header.header.clear();
        assert!(Metadata::try_from(no_header).is_err());
    }

    #[test]
    fn test_header_order_matters() {
        let a = Metadata::try_from(csv()).unwrap();
        let mut swapped = csv();
        swapped.header.reverse();
        let b = Metadata::try_from(swapped).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_payload_layout() {
        let metadata = Metadata::try_from(csv()).unwrap();
        assert_eq!(metadata.other_format(), Some("ADDML"));
        assert_eq!(metadata.format_version(), "8.3");

        let mut w = XmlWriter::new(None);
        metadata.write_payload(&mut w, &chrono::Utc::now()).unwrap();
        let xml = String::from_utf8(w.into_bytes()).unwrap();
        assert!(xml.contains(r#"<addml:flatFile name="data/a.csv" definitionReference="ref001"/>"#));
        assert!(xml.contains(r#"<addml:fieldDefinition name="name" typeReference="String"/>"#));
        assert!(xml.contains("<addml:fieldSeparatingChar>,</addml:fieldSeparatingChar>"));
        assert!(xml.contains(r#"<addml:flatFileType name="rec001">"#));
    }
}
