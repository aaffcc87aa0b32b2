// SPDX-License-Identifier: MIT
//! Four-byte type tags for records and fields
//!
//! Plugin files identify record schemas (`IDLE`, `NPC_`, ...) and field
//! types (`EDID`, `CTDA`, ...) with four raw bytes. A [`Tag`] keeps those
//! bytes as-is and only interprets them as ASCII for display and parsing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Errors that can occur when parsing a tag
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TagError {
    #[error("tag must be exactly 4 bytes, got {0}")]
    InvalidLength(usize),

    #[error("tag must be ASCII: {0:?}")]
    NonAscii(String),
}

/// A 4-byte record or field type tag
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tag(pub [u8; 4]);

impl Tag {
    pub const fn new(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// Tag as stored on disk (little-endian u32)
    pub const fn to_u32(self) -> u32 {
        u32::from_le_bytes(self.0)
    }

    pub const fn from_u32(value: u32) -> Self {
        Self(value.to_le_bytes())
    }

    fn is_printable(&self) -> bool {
        self.0.iter().all(|b| b.is_ascii_graphic() || *b == b' ')
    }
}

/// Record type of idle animations
pub const IDLE: Tag = Tag(*b"IDLE");

/// Condition data
pub const CTDA: Tag = Tag(*b"CTDA");

/// Idle animation editor name
pub const ENAM: Tag = Tag(*b"ENAM");

/// Editor id
pub const EDID: Tag = Tag(*b"EDID");

/// Model filename
pub const MODL: Tag = Tag(*b"MODL");

/// Idle animation data
pub const DATA: Tag = Tag(*b"DATA");

/// Plugin header record
pub const TES4: Tag = Tag(*b"TES4");

/// Group container
pub const GRUP: Tag = Tag(*b"GRUP");

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_printable() {
            for &b in &self.0 {
                write!(f, "{}", b as char)?;
            }
            Ok(())
        } else {
            write!(f, "0x{}", hex::encode(self.0))
        }
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag({self})")
    }
}

impl FromStr for Tag {
    type Err = TagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !s.is_ascii() {
            return Err(TagError::NonAscii(s.to_string()));
        }

        let bytes: [u8; 4] = s
            .as_bytes()
            .try_into()
            .map_err(|_| TagError::InvalidLength(s.len()))?;
        Ok(Self(bytes))
    }
}

impl From<[u8; 4]> for Tag {
    fn from(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }
}

impl Serialize for Tag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Tag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        if let Some(digits) = s.strip_prefix("0x").filter(|d| d.len() == 8) {
            let bytes = hex::decode(digits).map_err(serde::de::Error::custom)?;
            let bytes: [u8; 4] = bytes
                .try_into()
                .map_err(|v: Vec<u8>| serde::de::Error::custom(TagError::InvalidLength(v.len())))?;
            return Ok(Self(bytes));
        }

        s.parse().map_err(serde::de::Error::custom)
    }
}
