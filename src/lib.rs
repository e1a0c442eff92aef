//! # metskit
//!
//! Pure Rust builder and serializer for METS preservation package documents.
//!
//! A document is assembled from [`DigitalObject`]s carrying technical
//! metadata, [`StructuralMap`]s whose divs carry descriptive and provenance
//! metadata, and [`FileReferences`]. [`Mets::serialize`] renders the whole
//! graph in one pass. Identical metadata placed in several locations is
//! written once and referenced by IDREF everywhere else.
//!
//! ## Example
//!
//! ```
//! use metskit::*;
//!
//! let mut mets = Mets::new(MetsProfile::CulturalHeritage, "pkg-1", "urn:uuid:c1", "Archive")?;
//!
//! let object_md = Metadata::try_from(TechnicalObjectMetadata::file(
//!     "text/plain",
//!     "(:unap)",
//!     ChecksumAlgorithm::Md5,
//!     "d41d8cd98f00b204e9800998ecf8427e",
//! ))?;
//! let mut object = DigitalObject::new("data/readme.txt")?;
//! object.add_metadata([object_md])?;
//!
//! let mut root = StructuralMapDiv::new("directory");
//! root.add_digital_objects([object.into_handle()])?;
//! root.add_metadata([Metadata::try_from(
//!     DescriptiveMetadata::new().with_element("title", "Readme"),
//! )?]);
//!
//! mets.add_structural_maps([StructuralMap::new(root)]);
//! mets.generate_file_references()?;
//!
//! let xml = mets.to_xml_string()?;
//! assert!(xml.contains("<mets:techMD"));
//! # Ok::<(), MetsError>(())
//! ```

pub mod core;
pub mod metadata;
pub mod mets;
pub mod structure;
pub mod types;

pub use crate::core::{ns, ContentKey, MetsError, MetsResult, NamespaceMap, SerializerOptions};
pub use metadata::{
    DescriptiveMetadata, DigitalProvenanceAgentMetadata, DigitalProvenanceEventMetadata,
    ImportedMetadata, LinkedMetadata, Metadata, MetadataFields, MetadataRecord, Relationship,
    TechnicalAudioMetadata, TechnicalCsvMetadata, TechnicalImageMetadata, TechnicalObjectMetadata,
    TechnicalVideoMetadata,
};
pub use mets::{Mets, MetsAgent, METS_CATALOG, METS_SPECIFICATION};
pub use structure::{
    DigitalObject, DigitalObjectHandle, DigitalObjectStream, FileGroup, FileMember,
    FileReferences, StructuralMap, StructuralMapDiv,
};
pub use types::{
    AgentRole, AgentType, Charset, ChecksumAlgorithm, CodecQuality, Color, Created, DataRateMode,
    EventOutcome, MetadataFormat, MetadataType, MetsAgentType, MetsProfile, PremisObjectType,
    RecordStatus, Sound,
};
