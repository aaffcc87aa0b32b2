// SPDX-License-Identifier: MIT
//! Record equivalence rules
//!
//! Decides whether an override record is a semantic no-op relative to its
//! master: same id, flags, schema and field count, and every field pair
//! equal after type-directed normalization.
//!
//! ## Field rules
//!
//! | Record | Field | Rule |
//! |--------|-------|------|
//! | `IDLE` | `CTDA` | Condition data: clear unused bytes 1..4 and 10..12, then compare bytes |
//! | `IDLE` | `ENAM` | Editor name: equal length required, then compare with ASCII case folded |
//! | any | any | Byte-for-byte equality, length included |
//!
//! Normalization always happens on private copies; the records passed in
//! are never modified.
//!
//! The condition-data rule is a heuristic. At least one shipped record
//! (`IDLE:00013344`) carries a condition whose remaining bytes differ even
//! though the override is known to be redundant, so such records are
//! reported as changed.

use std::borrow::Cow;
use std::fmt;

use tracing::debug;

use crate::buffer::{block_copy, ArrayPositionMut};
use crate::config::{EditorNameMode, RulesConfig};
use crate::order::sorted_fields_for;
use crate::record::{Field, Record};
use crate::tag::{Tag, CTDA, ENAM, IDLE};

/// Offset of the condition type byte, widened to a `u32` on normalization
pub const CONDITION_TYPE_OFFSET: usize = 0;

/// Offset of the two unused bytes after the condition function index
pub const CONDITION_PADDING_OFFSET: usize = 10;

/// Shortest condition payload the normalization can address
pub const CONDITION_DATA_MIN_LEN: usize = CONDITION_PADDING_OFFSET + 2;

/// Mask that clears the ASCII lowercase bit
pub const CASE_FOLD_MASK: u8 = 0xDF;

/// Normalization applied to a field pair before comparing bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    /// Raw byte equality
    Exact,
    /// Idle animation condition data
    ConditionData,
    /// Idle animation editor name
    EditorName,
}

/// Look up the rule for a `(record type, field type)` pair
///
/// Anything not listed falls back to [`FieldRule::Exact`].
pub fn field_rule(record_type: Tag, field_type: Tag) -> FieldRule {
    match (record_type, field_type) {
        (IDLE, CTDA) => FieldRule::ConditionData,
        (IDLE, ENAM) => FieldRule::EditorName,
        _ => FieldRule::Exact,
    }
}

/// First reason two records are not equivalent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mismatch {
    MissingMaster,
    IdDiffers { current: u32, master: u32 },
    FlagsDiffer { current: u32, master: u32 },
    FieldCountDiffers { current: usize, master: usize },
    RecordTypeDiffers { current: Tag, master: Tag },
    /// Field types differ at `index` in canonical order
    FieldTypeDiffers {
        index: usize,
        current: Tag,
        master: Tag,
    },
    /// Payloads differ at `index` in canonical order
    PayloadDiffers { index: usize, field_type: Tag },
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mismatch::MissingMaster => write!(f, "no master record"),
            Mismatch::IdDiffers { current, master } => {
                write!(f, "id {current:08X} != {master:08X}")
            }
            Mismatch::FlagsDiffer { current, master } => {
                write!(f, "flags {current:#010x} != {master:#010x}")
            }
            Mismatch::FieldCountDiffers { current, master } => {
                write!(f, "{current} fields vs {master} in master")
            }
            Mismatch::RecordTypeDiffers { current, master } => {
                write!(f, "record type {current} != {master}")
            }
            Mismatch::FieldTypeDiffers {
                index,
                current,
                master,
            } => write!(f, "field #{index}: type {current} != {master}"),
            Mismatch::PayloadDiffers { index, field_type } => {
                write!(f, "field #{index} ({field_type}): payload differs")
            }
        }
    }
}

/// Compares records under a [`RulesConfig`]
///
/// Holds no mutable state, so one comparer can be shared across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordComparer {
    config: RulesConfig,
}

impl RecordComparer {
    pub fn new(config: RulesConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    /// Whether `current` is a redundant copy of `master`
    pub fn is_identical(&self, current: &Record, master: Option<&Record>) -> bool {
        self.compare(current, master).is_ok()
    }

    /// Like [`is_identical`](Self::is_identical), but names the first difference
    pub fn compare(&self, current: &Record, master: Option<&Record>) -> Result<(), Mismatch> {
        let result = self.compare_records(current, master);
        if let Err(reason) = &result {
            if self.config.log_mismatches {
                debug!(
                    "[{}:{:08X}] differs from master: {}",
                    current.record_type, current.id, reason
                );
            }
        }

        result
    }

    fn compare_records(&self, current: &Record, master: Option<&Record>) -> Result<(), Mismatch> {
        let Some(master) = master else {
            return Err(Mismatch::MissingMaster);
        };

        if current.id != master.id {
            return Err(Mismatch::IdDiffers {
                current: current.id,
                master: master.id,
            });
        }

        if current.flags != master.flags {
            return Err(Mismatch::FlagsDiffer {
                current: current.flags,
                master: master.flags,
            });
        }

        if current.fields.len() != master.fields.len() {
            return Err(Mismatch::FieldCountDiffers {
                current: current.fields.len(),
                master: master.fields.len(),
            });
        }

        if current.record_type != master.record_type {
            return Err(Mismatch::RecordTypeDiffers {
                current: current.record_type,
                master: master.record_type,
            });
        }

        let ours = sorted_fields_for(current.record_type, &current.fields);
        let theirs = sorted_fields_for(master.record_type, &master.fields);
        for (index, (f1, f2)) in ours.into_iter().zip(theirs).enumerate() {
            if f1.field_type != f2.field_type {
                return Err(Mismatch::FieldTypeDiffers {
                    index,
                    current: f1.field_type,
                    master: f2.field_type,
                });
            }

            if !self.fields_are_identical(current.record_type, f1, f2) {
                return Err(Mismatch::PayloadDiffers {
                    index,
                    field_type: f1.field_type,
                });
            }
        }

        Ok(())
    }

    /// Compare two fields of a `record_type` record
    ///
    /// The rule is chosen by `f1`'s type; callers pair fields of equal type.
    ///
    /// # Panics
    ///
    /// Condition data shorter than [`CONDITION_DATA_MIN_LEN`] cannot be
    /// normalized and panics with an out-of-range error.
    pub fn fields_are_identical(&self, record_type: Tag, f1: &Field, f2: &Field) -> bool {
        match field_rule(record_type, f1.field_type) {
            FieldRule::Exact => f1.payload == f2.payload,
            FieldRule::ConditionData => {
                normalize_condition_data(&f1.payload) == normalize_condition_data(&f2.payload)
            }
            FieldRule::EditorName => {
                if f1.payload.len() != f2.payload.len() {
                    return false;
                }

                let (ours, theirs) = match self.config.editor_name_mode {
                    EditorNameMode::Independent => (fold_case(&f1.payload), fold_case(&f2.payload)),
                    EditorNameMode::MirrorCurrent => {
                        let folded = fold_case(&f1.payload);
                        (folded.clone(), folded)
                    }
                };
                ours == theirs
            }
        }
    }
}

/// Copy of a condition payload with its unused bytes cleared
///
/// The type byte is rewritten as a little-endian `u32`, which zeroes the
/// three padding bytes after it; the two bytes at offset 10 are zeroed.
pub fn normalize_condition_data(payload: &[u8]) -> Vec<u8> {
    let mut copy = payload.to_vec();
    let mut pos = ArrayPositionMut::from(copy.as_mut_slice());

    let widened = u32::from(pos[CONDITION_TYPE_OFFSET]);
    block_copy(&widened.to_le_bytes(), 0, &mut pos, CONDITION_TYPE_OFFSET, 4);

    let mut padding = pos + CONDITION_PADDING_OFFSET as isize;
    block_copy(&0u16.to_le_bytes(), 0, &mut padding, 0, 2);

    copy
}

/// Copy of `payload` with the ASCII lowercase bit cleared on every byte
pub fn fold_case(payload: &[u8]) -> Vec<u8> {
    payload.iter().map(|b| b & CASE_FOLD_MASK).collect()
}

/// Payload of `field` as its rule in a `record_type` record sees it
///
/// Borrows the payload for exact fields and for condition data too short
/// to normalize; never panics.
pub fn normalized_payload(record_type: Tag, field: &Field) -> Cow<'_, [u8]> {
    match field_rule(record_type, field.field_type) {
        FieldRule::Exact => Cow::Borrowed(&field.payload),
        FieldRule::ConditionData if field.payload.len() < CONDITION_DATA_MIN_LEN => {
            Cow::Borrowed(&field.payload)
        }
        FieldRule::ConditionData => Cow::Owned(normalize_condition_data(&field.payload)),
        FieldRule::EditorName => Cow::Owned(fold_case(&field.payload)),
    }
}

/// Whether every field of `record` can go through its rule's normalization
///
/// False only for condition data shorter than [`CONDITION_DATA_MIN_LEN`],
/// which [`RecordComparer::fields_are_identical`] rejects with a panic.
pub fn can_normalize(record: &Record) -> bool {
    record.fields.iter().all(|field| {
        field_rule(record.record_type, field.field_type) != FieldRule::ConditionData
            || field.payload.len() >= CONDITION_DATA_MIN_LEN
    })
}

/// [`RecordComparer::is_identical`] with default settings
pub fn is_identical(current: &Record, master: Option<&Record>) -> bool {
    RecordComparer::default().is_identical(current, master)
}

/// [`RecordComparer::fields_are_identical`] with default settings
pub fn fields_are_identical(record_type: Tag, f1: &Field, f2: &Field) -> bool {
    RecordComparer::default().fields_are_identical(record_type, f1, f2)
}
