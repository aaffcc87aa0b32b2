// SPDX-License-Identifier: MIT
//! # Bethesda Record Equivalence
//!
//! Decides whether an override record in a derivative plugin is a semantic
//! no-op relative to its master record ("identical to master"), so a
//! cleaning tool can drop it.
//!
//! ## Overview
//!
//! Two records are equivalent when their id, flags, record type and field
//! count match and every field pair is equal once both field lists are put
//! in canonical order. Some field types carry bytes the game ignores, so
//! they are normalized on private copies before the byte comparison:
//!
//! - **Condition data** (`CTDA` in `IDLE` records): unused padding bytes are
//!   cleared.
//! - **Editor names** (`ENAM` in `IDLE` records): compared ASCII
//!   case-insensitively; the length still has to match.
//!
//! Every other field is compared byte for byte.
//!
//! The crate does not parse plugin files. Records come from an external
//! loader, either as [`Record`] values or through the [`RecordTree`] trait.
//!
//! ## Modules
//!
//! - [`buffer`]: zero-copy array positions and the bulk-copy primitive
//! - [`tag`]: four-byte type tags
//! - [`record`]: records and fields
//! - [`order`]: canonical field order
//! - [`rules`]: the equivalence engine
//! - [`config`]: rule configuration (env / TOML)
//! - [`extract`]: record extraction from plugin trees
//! - [`clean`]: cleaning pass over a whole plugin
//!
//! ## Usage
//!
//! ```rust
//! use beth_record_equiv::{is_identical, Field, Record};
//! use beth_record_equiv::tag::{EDID, ENAM, IDLE};
//!
//! let master = Record::new(0x13344, IDLE)
//!     .with_field(Field::new(EDID, b"LookAround\0".to_vec()))
//!     .with_field(Field::new(ENAM, b"LookAround".to_vec()));
//!
//! // same fields, different order and case
//! let current = Record::new(0x13344, IDLE)
//!     .with_field(Field::new(ENAM, b"lookaround".to_vec()))
//!     .with_field(Field::new(EDID, b"LookAround\0".to_vec()));
//!
//! assert!(is_identical(&current, Some(&master)));
//! assert!(!is_identical(&current, None));
//! ```

pub mod buffer;
pub mod clean;
pub mod config;
pub mod extract;
pub mod order;
pub mod record;
pub mod rules;
pub mod tag;

// Re-export main types
pub use buffer::{
    block_copy, copy_bytes, copy_within, try_block_copy, try_copy_bytes, ArrayPosition,
    ArrayPositionMut, ArraySegment, ArraySegmentMut, BufferError,
};
pub use clean::{find_identical_overrides, CleanReport, MasterIndex};
pub use config::{ConfigError, EditorNameMode, RulesConfig};
pub use extract::{extract_all_records, extract_records, Group, Node, PluginFile, RecordTree};
pub use order::{canonical_cmp, canonical_cmp_for, sorted_fields, sorted_fields_for, FieldOrder};
pub use record::{Field, Record};
pub use rules::{
    can_normalize, fields_are_identical, is_identical, normalized_payload, FieldRule, Mismatch,
    RecordComparer,
};
pub use tag::{Tag, TagError};
