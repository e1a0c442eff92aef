//! METS core module
//!
//! This module contains the document-independent machinery: errors,
//! namespaces, identifiers, content keys, the XML writer and the serializer.

pub mod content_key;
pub mod error;
pub mod identifier;
pub mod namespace;
pub mod registry;
pub mod serializer;
pub mod xml;

pub use content_key::{ContentKey, KeyBuilder};
pub use error::{MetsError, MetsResult};
pub use namespace::{ns, NamespaceMap, BUILTIN_NAMESPACES};
pub use registry::{MetadataGroup, MetadataRegistry};
pub use serializer::{MetsSerializer, SerializerOptions};
pub use xml::XmlWriter;
