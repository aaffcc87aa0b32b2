// SPDX-License-Identifier: MIT
//! Canonical field order
//!
//! Two records may store the same fields in different orders. Sorting both
//! field lists with [`canonical_cmp`] lines them up for pairwise comparison.
//! The order is total: type tag bytes, then payload length, then payload
//! bytes.
//!
//! Inside a record, fields are sorted with [`canonical_cmp_for`], which
//! orders by the payload as the record type's field rule sees it and falls
//! back to raw bytes. Fields that compare equal under their rule end up
//! next to each other, so padding noise never changes the pairing.

use std::borrow::Cow;
use std::cmp::Ordering;

use crate::record::Field;
use crate::rules::normalized_payload;
use crate::tag::Tag;

#[inline]
fn cmp_keyed(a: &Field, a_key: &[u8], b: &Field, b_key: &[u8]) -> Ordering {
    a.field_type
        .as_bytes()
        .cmp(b.field_type.as_bytes())
        .then_with(|| a_key.len().cmp(&b_key.len()))
        .then_with(|| a_key.cmp(b_key))
        .then_with(|| a.payload.len().cmp(&b.payload.len()))
        .then_with(|| a.payload.cmp(&b.payload))
}

/// Strict total order over fields, on raw payloads
#[inline]
pub fn canonical_cmp(a: &Field, b: &Field) -> Ordering {
    cmp_keyed(a, &a.payload, b, &b.payload)
}

/// Strict total order over fields of a `record_type` record
///
/// Payloads are compared after the field rule's normalization, then raw.
pub fn canonical_cmp_for(record_type: Tag, a: &Field, b: &Field) -> Ordering {
    cmp_keyed(
        a,
        &normalized_payload(record_type, a),
        b,
        &normalized_payload(record_type, b),
    )
}

/// Borrow `fields` in canonical order; payloads are untouched
pub fn sorted_fields(fields: &[Field]) -> Vec<&Field> {
    let mut sorted: Vec<&Field> = fields.iter().collect();
    sorted.sort_by(|a, b| canonical_cmp(a, b));
    sorted
}

/// Borrow the fields of a `record_type` record in [`canonical_cmp_for`] order
pub fn sorted_fields_for(record_type: Tag, fields: &[Field]) -> Vec<&Field> {
    let mut keyed: Vec<(Cow<'_, [u8]>, &Field)> = fields
        .iter()
        .map(|field| (normalized_payload(record_type, field), field))
        .collect();
    keyed.sort_by(|(a_key, a), (b_key, b)| cmp_keyed(a, a_key, b, b_key));
    keyed.into_iter().map(|(_, field)| field).collect()
}

/// Wrapper that orders fields canonically in ordered collections
#[derive(Debug, Clone, Copy)]
pub struct FieldOrder<'a>(pub &'a Field);

impl PartialEq for FieldOrder<'_> {
    fn eq(&self, other: &Self) -> bool {
        canonical_cmp(self.0, other.0) == Ordering::Equal
    }
}

impl Eq for FieldOrder<'_> {}

impl PartialOrd for FieldOrder<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FieldOrder<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        canonical_cmp(self.0, other.0)
    }
}
