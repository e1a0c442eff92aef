//! METS value types
//!
//! This module defines the controlled vocabularies and date values used in
//! METS documents.

#[macro_use]
mod macros;

pub mod created;
pub mod vocabulary;

pub use created::Created;
pub use vocabulary::{
    AgentRole, AgentType, Charset, ChecksumAlgorithm, CodecQuality, Color, DataRateMode,
    EventOutcome, MetadataFormat, MetadataType, MetsAgentType, MetsProfile, PremisObjectType,
    RecordStatus, Sound,
};
