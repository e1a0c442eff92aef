//! Namespace management for METS documents
//!
//! The namespace-to-prefix table below is part of the public output contract:
//! downstream consumers address elements by these prefixes, so entries are
//! never renamed or reordered. Documents may declare additional namespaces
//! (for imported fragments) through a per-document [`NamespaceMap`].

use crate::core::error::{MetsError, MetsResult};

/// Built-in namespaces
pub mod ns {
    /// METS namespace
    pub const METS: &str = "http://www.loc.gov/METS/";
    /// XML Schema instance namespace
    pub const XSI: &str = "http://www.w3.org/2001/XMLSchema-instance";
    /// PREMIS 2 namespace
    pub const PREMIS: &str = "info:lc/xmlns/premis-v2";
    /// Finnish national METS extensions namespace
    pub const FI: &str = "http://digitalpreservation.fi/schemas/mets/fi-extensions";
    /// XLink namespace
    pub const XLINK: &str = "http://www.w3.org/1999/xlink";
    /// NISO MIX namespace
    pub const MIX: &str = "http://www.loc.gov/mix/v20";
    /// EAD3 namespace
    pub const EAD3: &str = "http://ead3.archivists.org/schema/";
    /// ADDML namespace
    pub const ADDML: &str = "http://www.arkivverket.no/standarder/addml";
    /// AudioMD namespace
    pub const AUDIOMD: &str = "http://www.loc.gov/audioMD/";
    /// VideoMD namespace
    pub const VIDEOMD: &str = "http://www.loc.gov/videoMD/";
    /// Dublin Core elements namespace
    pub const DC: &str = "http://purl.org/dc/elements/1.1/";
    /// METS prefix
    pub const METS_PREFIX: &str = "mets";
    /// XML Schema instance prefix
    pub const XSI_PREFIX: &str = "xsi";
    /// PREMIS prefix
    pub const PREMIS_PREFIX: &str = "premis";
    /// Finnish extensions prefix
    pub const FI_PREFIX: &str = "fi";
    /// XLink prefix
    pub const XLINK_PREFIX: &str = "xlink";
    /// NISO MIX prefix
    pub const MIX_PREFIX: &str = "mix";
    /// EAD3 prefix
    pub const EAD3_PREFIX: &str = "ead3";
    /// ADDML prefix
    pub const ADDML_PREFIX: &str = "addml";
    /// AudioMD prefix
    pub const AUDIOMD_PREFIX: &str = "audiomd";
    /// VideoMD prefix
    pub const VIDEOMD_PREFIX: &str = "videomd";
    /// Dublin Core prefix
    pub const DC_PREFIX: &str = "dc";

    /// Schema location of the Finnish national METS schema
    pub const METS_FI_SCHEMA: &str = "http://digitalpreservation.fi/schemas/mets/mets.xsd";
}

/// The fixed (prefix, uri) table, in declaration order
pub const BUILTIN_NAMESPACES: &[(&str, &str)] = &[
    (ns::METS_PREFIX, ns::METS),
    (ns::XSI_PREFIX, ns::XSI),
    (ns::PREMIS_PREFIX, ns::PREMIS),
    (ns::FI_PREFIX, ns::FI),
    (ns::XLINK_PREFIX, ns::XLINK),
    (ns::MIX_PREFIX, ns::MIX),
    (ns::EAD3_PREFIX, ns::EAD3),
    (ns::ADDML_PREFIX, ns::ADDML),
    (ns::AUDIOMD_PREFIX, ns::AUDIOMD),
    (ns::VIDEOMD_PREFIX, ns::VIDEOMD),
    (ns::DC_PREFIX, ns::DC),
];

/// Ordered map of namespace prefix to URI
///
/// Entries keep their registration order so the root element declares them
/// in the same order on every run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceMap {
    entries: Vec<(String, String)>,
}

impl NamespaceMap {
    /// Create a new namespace map with the built-in namespaces registered
    pub fn new() -> Self {
        Self {
            entries: BUILTIN_NAMESPACES
                .iter()
                .map(|(prefix, uri)| (prefix.to_string(), uri.to_string()))
                .collect(),
        }
    }

    /// Register a namespace URI with a prefix
    ///
    /// Returns an error if the prefix is already registered to a different URI
    /// or is not a valid XML name.
    pub fn register(&mut self, uri: &str, prefix: &str) -> MetsResult<()> {
        if uri.is_empty() {
            return Err(MetsError::InvalidValue("URI cannot be empty".to_string()));
        }
        if !crate::core::identifier::is_valid_xml_id(prefix) {
            return Err(MetsError::InvalidValue(format!(
                "'{}' is not a valid namespace prefix",
                prefix
            )));
        }

        if let Some(existing_uri) = self.get_uri(prefix) {
            if existing_uri != uri {
                return Err(MetsError::InvalidValue(format!(
                    "Prefix '{}' is already registered to '{}'",
                    prefix, existing_uri
                )));
            }
            // Already registered to the same URI, no-op
            return Ok(());
        }

        self.entries.push((prefix.to_string(), uri.to_string()));
        Ok(())
    }

    /// Get the prefix for a namespace URI
    pub fn get_prefix(&self, uri: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, u)| u == uri)
            .map(|(p, _)| p.as_str())
    }

    /// Get the URI for a namespace prefix
    pub fn get_uri(&self, prefix: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(p, _)| p == prefix)
            .map(|(_, u)| u.as_str())
    }

    /// Check if a namespace prefix is registered
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.get_uri(prefix).is_some()
    }

    /// Iterate over (prefix, uri) pairs in registration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(p, u)| (p.as_str(), u.as_str()))
    }
}
