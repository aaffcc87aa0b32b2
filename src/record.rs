// SPDX-License-Identifier: MIT
//! Record and field value types
//!
//! These are produced by an external plugin loader. The equivalence engine
//! only reads them; normalization works on private copies of payloads.

use serde::{Deserialize, Serialize};

use crate::tag::Tag;

/// A typed binary payload inside a record
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Field {
    pub field_type: Tag,

    /// Raw bytes; length is a per-type convention and is not validated here
    #[serde(with = "hex_payload")]
    pub payload: Vec<u8>,
}

impl Field {
    pub fn new(field_type: Tag, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            field_type,
            payload: payload.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

/// A record: id, flags, schema tag and its fields in on-disk order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: u32,
    pub flags: u32,
    pub record_type: Tag,
    #[serde(default)]
    pub fields: Vec<Field>,
}

impl Record {
    pub fn new(id: u32, record_type: Tag) -> Self {
        Self {
            id,
            flags: 0,
            record_type,
            fields: Vec::new(),
        }
    }

    pub fn with_flags(mut self, flags: u32) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// First field with the given type, if any
    pub fn field(&self, field_type: Tag) -> Option<&Field> {
        self.fields.iter().find(|f| f.field_type == field_type)
    }

    /// All fields with the given type, in storage order
    pub fn fields_of(&self, field_type: Tag) -> impl Iterator<Item = &Field> + '_ {
        self.fields.iter().filter(move |f| f.field_type == field_type)
    }
}

/// Payloads travel as lowercase hex strings in JSON dumps
mod hex_payload {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(s.trim()).map_err(serde::de::Error::custom)
    }
}
