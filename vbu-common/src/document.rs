//! Versioned configuration documents
//!
//! Every configuration domain is stored as a JSON object carrying an
//! integer `versionFormat` field. Anything without that field is treated
//! as the domain's legacy text format.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// On-disk key of the format version field
///
/// **IMPORTANT:** Older builds read this exact key; never rename it.
pub const VERSION_KEY: &str = "versionFormat";

/// Configuration domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Categories,
    Playlists,
    Presets,
    Settings,
}

impl Domain {
    /// All domains in load order
    pub const ALL: [Domain; 4] = [
        Domain::Settings,
        Domain::Categories,
        Domain::Playlists,
        Domain::Presets,
    ];

    /// Stable storage name
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Categories => "categories",
            Domain::Playlists => "playlists",
            Domain::Presets => "presets",
            Domain::Settings => "settings",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured document with an explicit format version
///
/// The version is held outside `fields` so that no migration step can
/// forget or corrupt it; it is written back under [`VERSION_KEY`] on
/// serialization.
#[derive(Debug, Clone, PartialEq)]
pub struct VersionedDocument {
    domain: Domain,
    version: u64,
    fields: Map<String, Value>,
}

impl VersionedDocument {
    pub fn new(domain: Domain, version: u64, fields: Map<String, Value>) -> Self {
        Self {
            domain,
            version,
            fields,
        }
    }

    /// Parse a JSON text into a document
    pub fn parse(domain: Domain, raw: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(raw)?;
        Self::from_value(domain, value)
    }

    /// Build a document from a JSON value, validating the version field
    ///
    /// A missing or non-integer version is fatal; it is never treated as a
    /// migration case.
    pub fn from_value(domain: Domain, value: Value) -> Result<Self> {
        let Value::Object(mut fields) = value else {
            return Err(Error::format(domain, "document root is not an object"));
        };

        let raw_version = fields
            .remove(VERSION_KEY)
            .ok_or(Error::MissingVersion { domain })?;

        let version = raw_version.as_u64().ok_or_else(|| Error::InvalidVersion {
            domain,
            value: raw_version.to_string(),
        })?;

        Ok(Self {
            domain,
            version,
            fields,
        })
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Same content stamped with another version
    pub(crate) fn with_version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    /// JSON form including the version field
    pub fn to_value(&self) -> Value {
        let mut object = self.fields.clone();
        object.insert(VERSION_KEY.to_string(), Value::from(self.version));
        Value::Object(object)
    }

    /// Decode the fields into a typed model
    pub fn decode<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(Value::Object(self.fields.clone()))
            .map_err(|e| Error::format(self.domain, e.to_string()))
    }
}

/// Shape of stored content
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentShape {
    /// JSON object carrying a version field
    Versioned(Value),
    /// Anything else: the domain's pre-versioning text format
    Legacy,
}

/// Decide whether stored content is versioned or legacy-shaped
pub fn detect_shape(raw: &str) -> DocumentShape {
    match serde_json::from_str::<Value>(raw) {
        Ok(value) if value.get(VERSION_KEY).is_some() => DocumentShape::Versioned(value),
        _ => DocumentShape::Legacy,
    }
}
