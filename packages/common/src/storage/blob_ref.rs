use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::StorageError;

/// Name of a stored blob inside the storage directory.
///
/// Always a flat, non-hidden file name, so it can be joined onto the storage
/// root and onto the public upload path without escaping either.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BlobRef(String);

impl BlobRef {
    /// Parse and validate a stored blob name.
    pub fn parse(s: &str) -> Result<Self, StorageError> {
        if s.is_empty() {
            return Err(StorageError::InvalidRef("empty name".into()));
        }
        if s.starts_with('.') {
            return Err(StorageError::InvalidRef(format!("hidden name: {s}")));
        }
        if s.contains(['/', '\\', '\0']) || s.chars().any(|c| c.is_ascii_control()) {
            return Err(StorageError::InvalidRef(format!("not a flat name: {s:?}")));
        }
        Ok(Self(s.to_string()))
    }

    /// Wrap a name produced by this crate's name generator.
    pub(crate) fn from_generated(name: String) -> Self {
        Self(name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BlobRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlobRef({})", self.0)
    }
}

impl fmt::Display for BlobRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for BlobRef {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for BlobRef {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
