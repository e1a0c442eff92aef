//! Creation dates of metadata records
//!
//! Exact timestamps are written with second resolution in the `CREATED`
//! attribute. Approximate dates are free-form extended ISO 8601 strings and are
//! written in the `fi:CREATED` extension attribute instead.

use chrono::{DateTime, SecondsFormat, Utc};

/// When a metadata record was created
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Created {
    /// Precise creation time
    Exact(DateTime<Utc>),
    /// Approximate creation time, e.g. `2020-03`
    Approximate(String),
}

impl Created {
    /// Value written to the document
    pub fn to_attribute_value(&self) -> String {
        match self {
            Created::Exact(dt) => format_datetime(dt),
            Created::Approximate(s) => s.clone(),
        }
    }

    /// Whether the date has to go into the extension attribute
    pub fn is_approximate(&self) -> bool {
        matches!(self, Created::Approximate(_))
    }
}

impl From<DateTime<Utc>> for Created {
    fn from(dt: DateTime<Utc>) -> Self {
        Created::Exact(dt)
    }
}

impl From<&str> for Created {
    fn from(s: &str) -> Self {
        Created::Approximate(s.to_string())
    }
}

impl From<String> for Created {
    fn from(s: String) -> Self {
        Created::Approximate(s)
    }
}

/// Format a timestamp as ISO 8601 with second resolution
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, false)
}
