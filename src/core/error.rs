//! Error types for METS operations
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Error types for METS operations
#[derive(Debug, Error)]
pub enum MetsError {
    /// Metadata record failed kind-specific validation
    #[error("Invalid metadata: {0}")]
    InvalidMetadata(String),

    /// Bad attribute value on the document, an agent, a div or a structural map
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// Metadata of the wrong type was added to a container
    #[error("Invalid placement: {0}")]
    InvalidPlacement(String),

    /// The div tree would contain a digital object or div twice
    #[error("Invalid structure: {0}")]
    InvalidStructure(String),

    /// The object graph cannot be rendered as a consistent document
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// XML writer error
    #[error("XML error: {0}")]
    XmlError(#[from] quick_xml::Error),
}

/// Result type alias for METS operations
pub type MetsResult<T> = Result<T, MetsError>;
