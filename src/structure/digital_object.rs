//! Digital objects (files) and their streams

use crate::core::error::{MetsError, MetsResult};
use crate::core::identifier::is_valid_xml_id;
use crate::metadata::Metadata;
use crate::structure::handle::DigitalObjectHandle;
use std::path::{Component, Path};

/// Append technical metadata, skipping records whose content key is already present
fn append_technical<I>(target: &mut Vec<Metadata>, entries: I) -> MetsResult<()>
where
    I: IntoIterator<Item = Metadata>,
{
    let entries: Vec<Metadata> = entries.into_iter().collect();
    if let Some(bad) = entries.iter().find(|m| !m.is_technical()) {
        return Err(MetsError::InvalidPlacement(format!(
            "{} metadata cannot be added to a digital object or stream; add it to a div instead",
            bad.metadata_type()
        )));
    }
    for entry in entries {
        if target.contains(&entry) {
            tracing::trace!(key = %entry.content_key(), "skipping duplicate metadata");
            continue;
        }
        target.push(entry);
    }
    Ok(())
}

/// Sub-component of a digital object, e.g. an audio track in a container
///
/// Streams hold technical metadata only and never contain further streams.
#[derive(Debug, Clone, Default)]
pub struct DigitalObjectStream {
    metadata: Vec<Metadata>,
}

impl DigitalObjectStream {
    /// Stream without metadata
    pub fn new() -> Self {
        Self::default()
    }

    /// Stream described by the given technical metadata
    pub fn with_metadata<I>(entries: I) -> MetsResult<Self>
    where
        I: IntoIterator<Item = Metadata>,
    {
        let mut stream = Self::new();
        stream.add_metadata(entries)?;
        Ok(stream)
    }

    /// Append technical metadata
    pub fn add_metadata<I>(&mut self, entries: I) -> MetsResult<()>
    where
        I: IntoIterator<Item = Metadata>,
    {
        append_technical(&mut self.metadata, entries)
    }

    /// Metadata in insertion order
    pub fn metadata(&self) -> &[Metadata] {
        &self.metadata
    }
}

/// A file in the package
#[derive(Debug, Clone)]
pub struct DigitalObject {
    path: String,
    identifier: Option<String>,
    use_attribute: Option<String>,
    metadata: Vec<Metadata>,
    streams: Vec<DigitalObjectStream>,
}

impl DigitalObject {
    /// Digital object at `path`, relative to the package root
    ///
    /// The path is normalized. Absolute paths and paths that leave the
    /// package root are rejected.
    pub fn new(path: impl AsRef<Path>) -> MetsResult<Self> {
        Ok(Self {
            path: normalize_package_path(path.as_ref())?,
            identifier: None,
            use_attribute: None,
            metadata: Vec::new(),
            streams: Vec::new(),
        })
    }

    /// Use a fixed identifier for the `mets:file` element
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> MetsResult<Self> {
        let identifier = identifier.into();
        if !is_valid_xml_id(&identifier) {
            return Err(MetsError::InvalidValue(format!(
                "'{}' is not a valid XML identifier",
                identifier
            )));
        }
        self.identifier = Some(identifier);
        Ok(self)
    }

    /// Set the `USE` attribute
    pub fn with_use(mut self, use_attribute: impl Into<String>) -> Self {
        self.set_use(use_attribute);
        self
    }

    /// Set the `USE` attribute in place
    pub fn set_use(&mut self, use_attribute: impl Into<String>) {
        self.use_attribute = Some(use_attribute.into());
    }

    /// Append technical metadata
    ///
    /// Fails without adding anything if any entry is not technical metadata.
    /// Entries whose content key is already present are ignored.
    pub fn add_metadata<I>(&mut self, entries: I) -> MetsResult<()>
    where
        I: IntoIterator<Item = Metadata>,
    {
        append_technical(&mut self.metadata, entries)
    }

    /// Append streams
    pub fn add_streams<I>(&mut self, streams: I)
    where
        I: IntoIterator<Item = DigitalObjectStream>,
    {
        self.streams.extend(streams);
    }

    /// Normalized path inside the package
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Caller-supplied identifier
    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    /// `USE` attribute
    pub fn use_attribute(&self) -> Option<&str> {
        self.use_attribute.as_deref()
    }

    /// Metadata in insertion order
    pub fn metadata(&self) -> &[Metadata] {
        &self.metadata
    }

    /// Streams in insertion order
    pub fn streams(&self) -> &[DigitalObjectStream] {
        &self.streams
    }

    /// Move the object into a shared handle
    pub fn into_handle(self) -> DigitalObjectHandle {
        DigitalObjectHandle::new(self)
    }
}

fn normalize_package_path(path: &Path) -> MetsResult<String> {
    if path.is_absolute() || path.has_root() {
        return Err(MetsError::InvalidValue(format!(
            "path '{}' is not a relative path",
            path.display()
        )));
    }

    let mut parts: Vec<String> = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::CurDir => {}
            Component::ParentDir => {
                if parts.pop().is_none() {
                    return Err(MetsError::InvalidValue(format!(
                        "path '{}' points outside the package root",
                        path.display()
                    )));
                }
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(MetsError::InvalidValue(format!(
                    "path '{}' is not a relative path",
                    path.display()
                )));
            }
        }
    }

    if parts.is_empty() {
        return Err(MetsError::InvalidValue(format!(
            "path '{}' does not name a file",
            path.display()
        )));
    }
    Ok(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::test_support::{agent, dc, event, file_object};

    #[test]
    fn test_path_normalized() {
        let object = DigitalObject::new("./data/../data/./a.txt").unwrap();
        assert_eq!(object.path(), "data/a.txt");
    }

    #[test]
    fn test_bad_paths_rejected() {
        for path in ["/etc/passwd", "../a.txt", "data/../../a.txt", ".", ""] {
            assert!(
                matches!(DigitalObject::new(path), Err(MetsError::InvalidValue(_))),
                "path {:?} accepted",
                path
            );
        }
    }

    #[test]
    fn test_rejects_descriptive_metadata() {
        let mut object = DigitalObject::new("a.txt").unwrap();
        let result = object.add_metadata([dc("title")]);
        assert!(matches!(result, Err(MetsError::InvalidPlacement(_))));
        assert!(object.metadata().is_empty());
    }

    #[test]
    fn test_rejects_provenance_metadata() {
        let mut object = DigitalObject::new("a.txt").unwrap();
        assert!(object.add_metadata([event("creation")]).is_err());
        assert!(object.add_metadata([agent("tool")]).is_err());
    }

    #[test]
    fn test_failed_batch_adds_nothing() {
        let mut object = DigitalObject::new("a.txt").unwrap();
        let result = object.add_metadata([file_object("abc"), dc("title")]);
        assert!(result.is_err());
        assert!(object.metadata().is_empty());
    }

    #[test]
    fn test_duplicate_metadata_ignored() {
        let mut object = DigitalObject::new("a.txt").unwrap();
        object.add_metadata([file_object("abc"), file_object("abc")]).unwrap();
        object.add_metadata([file_object("abc")]).unwrap();
        assert_eq!(object.metadata().len(), 1);
    }

    #[test]
    fn test_streams() {
        let mut object = DigitalObject::new("video.mkv").unwrap();
        let stream = DigitalObjectStream::with_metadata([file_object("s1")]).unwrap();
        object.add_streams([stream, DigitalObjectStream::new()]);
        assert_eq!(object.streams().len(), 2);
        assert!(DigitalObjectStream::with_metadata([dc("x")]).is_err());
    }

    #[test]
    fn test_identifier_validated() {
        assert!(DigitalObject::new("a.txt").unwrap().with_identifier("file-a").is_ok());
        assert!(DigitalObject::new("a.txt").unwrap().with_identifier("a b").is_err());
    }
}
