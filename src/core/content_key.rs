//! Content keys for metadata deduplication
//!
//! A content key is a SHA-256 digest over the semantic fields of a metadata
//! record. Fields are sorted by name before hashing, so the key does not
//! depend on the order in which a record registers them. Two records with the
//! same key are interchangeable and serialize into one shared section.

use sha2::{Digest, Sha256};
use std::fmt;
use uuid::Uuid;

/// Hex-encoded SHA-256 digest of a record's semantic fields
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContentKey(String);

impl ContentKey {
    /// Hash raw bytes directly
    ///
    /// Used for opaque payloads that are never interpreted.
    pub fn from_bytes(kind: &str, bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(kind.as_bytes());
        hasher.update(b"\0");
        hasher.update(bytes);
        Self(hex::encode(hasher.finalize()))
    }

    /// Get the key as a hex string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Deterministic UUID (version 5) derived from this key
    pub fn to_uuid(&self) -> Uuid {
        Uuid::new_v5(&Uuid::NAMESPACE_OID, self.0.as_bytes())
    }
}

impl fmt::Display for ContentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ContentKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Collects (field name, value) pairs and hashes them into a [`ContentKey`]
#[derive(Debug, Clone, Default)]
pub struct KeyBuilder {
    fields: Vec<(String, String)>,
}

impl KeyBuilder {
    /// Start a key for the given record kind
    pub fn new(kind: &str) -> Self {
        let mut builder = Self::default();
        builder.field("kind", kind);
        builder
    }

    /// Add a required field
    pub fn field(&mut self, name: &str, value: impl AsRef<str>) -> &mut Self {
        self.fields
            .push((name.to_string(), value.as_ref().to_string()));
        self
    }

    /// Add an optional field; `None` is recorded distinctly from an empty string
    pub fn opt_field(&mut self, name: &str, value: Option<impl AsRef<str>>) -> &mut Self {
        match value {
            Some(value) => self.field(name, format!("some:{}", value.as_ref())),
            None => self.field(name, "none"),
        }
    }

    /// Add an ordered list of values
    ///
    /// Each entry is recorded under `name[index]` together with the list length,
    /// so reordering the list changes the key.
    pub fn list_field<I, S>(&mut self, name: &str, values: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut count = 0usize;
        for (index, value) in values.into_iter().enumerate() {
            self.field(&format!("{}[{}]", name, index), value);
            count += 1;
        }
        self.field(&format!("{}.len", name), count.to_string())
    }

    /// Hash the collected fields
    pub fn finish(&self) -> ContentKey {
        let mut sorted: Vec<_> = self.fields.iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));

        let mut hasher = Sha256::new();
        for (name, value) in sorted {
            hasher.update(name.as_bytes());
            hasher.update(b"\0");
            hasher.update(value.len().to_string().as_bytes());
            hasher.update(b"\0");
            hasher.update(value.as_bytes());
            hasher.update(b"\n");
        }
        ContentKey(hex::encode(hasher.finalize()))
    }
}
