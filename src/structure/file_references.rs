//! File references (`mets:fileSec`)

use crate::structure::handle::DigitalObjectHandle;
use std::collections::HashSet;

/// An entry in a file group: a digital object or one of its streams
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileMember {
    /// The digital object itself
    Object(DigitalObjectHandle),
    /// Stream `index` of the digital object
    Stream {
        /// Owning digital object
        object: DigitalObjectHandle,
        /// Position in the object's streams
        index: usize,
    },
}

/// A `mets:fileGrp`: an ordered set of digital objects with an optional `USE`
#[derive(Debug, Clone, Default)]
pub struct FileGroup {
    use_attribute: Option<String>,
    digital_objects: Vec<DigitalObjectHandle>,
    index: HashSet<DigitalObjectHandle>,
}

impl FileGroup {
    /// Group without `USE`
    pub fn new() -> Self {
        Self::default()
    }

    /// Group with a `USE` attribute
    pub fn with_use(use_attribute: impl Into<String>) -> Self {
        Self {
            use_attribute: Some(use_attribute.into()),
            ..Self::default()
        }
    }

    /// Append digital objects; objects already in the group are ignored
    pub fn add_digital_objects<I>(&mut self, objects: I)
    where
        I: IntoIterator<Item = DigitalObjectHandle>,
    {
        for object in objects {
            if self.index.insert(object.clone()) {
                self.digital_objects.push(object);
            }
        }
    }

    /// `USE` attribute
    pub fn use_attribute(&self) -> Option<&str> {
        self.use_attribute.as_deref()
    }

    /// Digital objects in insertion order
    pub fn digital_objects(&self) -> &[DigitalObjectHandle] {
        &self.digital_objects
    }

    /// Whether the group lists the object
    pub fn contains(&self, object: &DigitalObjectHandle) -> bool {
        self.index.contains(object)
    }

    /// Every object followed by its streams
    pub fn members(&self) -> Vec<FileMember> {
        let mut members = Vec::new();
        for object in &self.digital_objects {
            members.push(FileMember::Object(object.clone()));
            let stream_count = object.read().streams().len();
            members.extend((0..stream_count).map(|index| FileMember::Stream {
                object: object.clone(),
                index,
            }));
        }
        members
    }
}

/// The file section: an ordered sequence of file groups
#[derive(Debug, Clone, Default)]
pub struct FileReferences {
    file_groups: Vec<FileGroup>,
}

impl FileReferences {
    /// Empty file references
    pub fn new() -> Self {
        Self::default()
    }

    /// Append file groups
    pub fn add_file_groups<I>(&mut self, groups: I)
    where
        I: IntoIterator<Item = FileGroup>,
    {
        self.file_groups.extend(groups);
    }

    /// File groups in insertion order
    pub fn file_groups(&self) -> &[FileGroup] {
        &self.file_groups
    }

    /// Whether any group lists the object
    pub fn contains(&self, object: &DigitalObjectHandle) -> bool {
        self.file_groups.iter().any(|group| group.contains(object))
    }

    /// Distinct digital objects over all groups, in first-seen order
    pub fn digital_objects(&self) -> Vec<DigitalObjectHandle> {
        let mut seen: HashSet<&DigitalObjectHandle> = HashSet::new();
        self.file_groups
            .iter()
            .flat_map(|g| g.digital_objects())
            .filter(|object| seen.insert(*object))
            .cloned()
            .collect()
    }
}
