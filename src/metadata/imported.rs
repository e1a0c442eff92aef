//! Pre-built XML fragments embedded verbatim

use super::{MetadataFields, PayloadContext};
use crate::core::content_key::{ContentKey, KeyBuilder};
use crate::core::error::{MetsError, MetsResult};
use crate::core::xml::XmlWriter;
use crate::types::{MetadataFormat, MetadataType};
use std::fs;
use std::path::{Path, PathBuf};

/// Opaque XML metadata read from a file or given as a string
///
/// The fragment is never parsed. A leading XML declaration is stripped and
/// the rest is written as the content of `mets:xmlData`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedMetadata {
    metadata_type: MetadataType,
    metadata_format: MetadataFormat,
    other_format: Option<String>,
    format_version: String,
    data_path: Option<PathBuf>,
    fragment: String,
    digest: String,
}

impl ImportedMetadata {
    /// Imported metadata from exactly one of a file path or a string
    pub fn new(
        metadata_type: MetadataType,
        metadata_format: MetadataFormat,
        other_format: Option<String>,
        format_version: impl Into<String>,
        data_path: Option<PathBuf>,
        data_string: Option<String>,
    ) -> MetsResult<Self> {
        let (data_path, raw) = match (data_path, data_string) {
            (Some(path), None) => {
                let raw = read_fragment(&path)?;
                (Some(path), raw)
            }
            (None, Some(data)) => (None, data),
            _ => {
                return Err(MetsError::InvalidMetadata(
                    "exactly one of data path and data string must be given".to_string(),
                ))
            }
        };

        let digest = ContentKey::from_bytes("imported", raw.as_bytes()).as_str().to_string();
        let fragment = strip_declaration(&raw).to_string();
        tracing::trace!(bytes = raw.len(), %digest, "imported metadata fragment");

        Ok(Self {
            metadata_type,
            metadata_format,
            other_format,
            format_version: format_version.into(),
            data_path,
            fragment,
            digest,
        })
    }

    /// Read the fragment from a file
    pub fn from_path(
        metadata_type: MetadataType,
        metadata_format: MetadataFormat,
        format_version: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> MetsResult<Self> {
        Self::new(
            metadata_type,
            metadata_format,
            None,
            format_version,
            Some(path.into()),
            None,
        )
    }

    /// Use an in-memory fragment
    pub fn from_string(
        metadata_type: MetadataType,
        metadata_format: MetadataFormat,
        format_version: impl Into<String>,
        data: impl Into<String>,
    ) -> MetsResult<Self> {
        Self::new(
            metadata_type,
            metadata_format,
            None,
            format_version,
            None,
            Some(data.into()),
        )
    }

    /// Set the free-text format name; forces the format to OTHER
    pub fn with_other_format(mut self, other_format: impl Into<String>) -> Self {
        self.other_format = Some(other_format.into());
        self
    }

    /// Source file, when the fragment was read from disk
    pub fn data_path(&self) -> Option<&Path> {
        self.data_path.as_deref()
    }

    /// Fragment as it will be embedded
    pub fn fragment(&self) -> &str {
        &self.fragment
    }
}

fn read_fragment(path: &Path) -> MetsResult<String> {
    if !path.is_file() {
        return Err(MetsError::InvalidMetadata(format!(
            "given path '{}' is not a file",
            path.display()
        )));
    }
    let bytes = fs::read(path)?;
    String::from_utf8(bytes).map_err(|_| {
        MetsError::InvalidMetadata(format!("'{}' is not valid UTF-8", path.display()))
    })
}

fn strip_declaration(raw: &str) -> &str {
    let trimmed = raw.trim_start_matches('\u{feff}').trim_start();
    // Processing instructions such as `<?xml-stylesheet ...?>` are kept
    let is_declaration = trimmed
        .strip_prefix("<?xml")
        .and_then(|rest| rest.chars().next())
        .is_some_and(char::is_whitespace);
    if is_declaration {
        if let Some(end) = trimmed.find("?>") {
            return trimmed[end + 2..].trim();
        }
    }
    trimmed.trim_end()
}

impl MetadataFields for ImportedMetadata {
    fn kind(&self) -> &'static str {
        "imported"
    }

    fn metadata_type(&self) -> MetadataType {
        self.metadata_type
    }

    fn metadata_format(&self) -> MetadataFormat {
        self.metadata_format
    }

    fn other_format(&self) -> Option<&str> {
        self.other_format.as_deref()
    }

    fn format_version(&self) -> &str {
        &self.format_version
    }

    fn validate(&self) -> MetsResult<()> {
        if self.fragment.is_empty() {
            return Err(MetsError::InvalidMetadata("imported metadata is empty".to_string()));
        }
        Ok(())
    }

    fn key_fields(&self, key: &mut KeyBuilder) {
        key.field("digest", &self.digest);
    }

    fn write_payload(&self, w: &mut XmlWriter, _ctx: &PayloadContext<'_>) -> MetsResult<()> {
        w.raw(&self.fragment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::Metadata;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const EAD: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ead3:ead><ead3:control/></ead3:ead>
"#;

    #[test]
    fn test_requires_exactly_one_source() {
        let neither = ImportedMetadata::new(MetadataType::Descriptive, MetadataFormat::Ead, None, "1.1.1", None, None);
        assert!(matches!(neither, Err(MetsError::InvalidMetadata(_))));
        let both = ImportedMetadata::new(
            MetadataType::Descriptive,
            MetadataFormat::Ead,
            None,
            "1.1.1",
            Some(PathBuf::from("x.xml")),
            Some(EAD.to_string()),
        );
        assert!(matches!(both, Err(MetsError::InvalidMetadata(_))));
    }

    #[test]
    fn test_declaration_stripped() {
        let imported =
            ImportedMetadata::from_string(MetadataType::Descriptive, MetadataFormat::Ead, "1.1.1", EAD).unwrap();
        assert_eq!(imported.fragment(), "<ead3:ead><ead3:control/></ead3:ead>");
    }

    #[test]
    fn test_stylesheet_instruction_kept() {
        let data = r#"<?xml-stylesheet type="text/xsl" href="ead.xsl"?><ead3:ead/>"#;
        let imported =
            ImportedMetadata::from_string(MetadataType::Descriptive, MetadataFormat::Ead, "1.1.1", data).unwrap();
        assert_eq!(imported.fragment(), data);

        let declared = format!("<?xml version=\"1.0\"?>\n{}", data);
        let imported =
            ImportedMetadata::from_string(MetadataType::Descriptive, MetadataFormat::Ead, "1.1.1", declared)
                .unwrap();
        assert_eq!(imported.fragment(), data);
    }

    #[test]
    fn test_read_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(EAD.as_bytes()).unwrap();
        let from_file =
            ImportedMetadata::from_path(MetadataType::Descriptive, MetadataFormat::Ead, "1.1.1", file.path())
                .unwrap();
        let from_string =
            ImportedMetadata::from_string(MetadataType::Descriptive, MetadataFormat::Ead, "1.1.1", EAD).unwrap();
        assert_eq!(from_file.data_path(), Some(file.path()));
        assert_eq!(
            Metadata::try_from(from_file).unwrap(),
            Metadata::try_from(from_string).unwrap()
        );
    }

    #[test]
    fn test_directory_is_not_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let result =
            ImportedMetadata::from_path(MetadataType::Descriptive, MetadataFormat::Ead, "1.1.1", dir.path());
        assert!(matches!(result, Err(MetsError::InvalidMetadata(_))));
    }

    #[test]
    fn test_non_utf8_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&[0x3c, 0xff, 0xfe, 0x3e]).unwrap();
        let result =
            ImportedMetadata::from_path(MetadataType::Source, MetadataFormat::Dc, "1.1", file.path());
        assert!(matches!(result, Err(MetsError::InvalidMetadata(_))));
    }

    #[test]
    fn test_raw_bytes_drive_the_key() {
        let a = ImportedMetadata::from_string(MetadataType::Rights, MetadataFormat::Dc, "1.1", "<dc:rights>a</dc:rights>")
            .unwrap();
        let b = ImportedMetadata::from_string(MetadataType::Rights, MetadataFormat::Dc, "1.1", "<dc:rights>b</dc:rights>")
            .unwrap();
        assert_ne!(Metadata::try_from(a).unwrap(), Metadata::try_from(b).unwrap());
    }

    #[test]
    fn test_other_format_forces_other() {
        let imported = ImportedMetadata::from_string(MetadataType::Source, MetadataFormat::Dc, "1.0", "<x/>")
            .unwrap()
            .with_other_format("LOCAL");
        let metadata = Metadata::try_from(imported).unwrap();
        assert_eq!(metadata.metadata_format(), MetadataFormat::Other);
        assert_eq!(metadata.other_format(), Some("LOCAL"));
        assert!(metadata.is_administrative());
    }

    #[test]
    fn test_payload_written_verbatim() {
        let metadata = Metadata::try_from(
            ImportedMetadata::from_string(MetadataType::Descriptive, MetadataFormat::Ead, "1.1.1", EAD).unwrap(),
        )
        .unwrap();
        let mut w = XmlWriter::new(None);
        metadata.write_payload(&mut w, &chrono::Utc::now()).unwrap();
        assert_eq!(
            String::from_utf8(w.into_bytes()).unwrap(),
            "<ead3:ead><ead3:control/></ead3:ead>"
        );
    }
}
