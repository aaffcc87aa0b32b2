// SPDX-License-Identifier: MIT
//! Property-based tests using proptest
//!
//! These tests generate random records and buffers to check the invariants
//! the cleaner relies on: reflexivity, order independence, sensitivity to
//! real changes, and copy semantics.

use proptest::prelude::*;

use beth_record_equiv::tag::{Tag, CTDA, DATA, EDID, ENAM, IDLE, MODL};
use beth_record_equiv::{
    canonical_cmp, copy_bytes, copy_within, fields_are_identical, is_identical, sorted_fields,
    Field, Record,
};

/// Strategy for field types that always use exact comparison
fn exact_tag_strategy() -> impl Strategy<Value = Tag> {
    prop_oneof![Just(EDID), Just(MODL), Just(DATA), Just(Tag(*b"ANAM"))]
}

fn field_strategy() -> impl Strategy<Value = Field> {
    prop_oneof![
        (exact_tag_strategy(), prop::collection::vec(any::<u8>(), 0..32))
            .prop_map(|(tag, payload)| Field::new(tag, payload)),
        prop::collection::vec(any::<u8>(), 24..=24).prop_map(|payload| Field::new(CTDA, payload)),
        "[A-Za-z]{1,16}".prop_map(|name| Field::new(ENAM, name.into_bytes())),
    ]
}

/// Strategy for records; IDLE shows up often so the special rules run
fn record_strategy() -> impl Strategy<Value = Record> {
    (
        any::<u32>(),
        any::<u32>(),
        prop_oneof![3 => Just(IDLE), 1 => Just(Tag(*b"NPC_")), 1 => Just(Tag(*b"PACK"))],
        prop::collection::vec(field_strategy(), 0..8),
    )
        .prop_map(|(id, flags, record_type, fields)| Record {
            id,
            flags,
            record_type,
            fields,
        })
}

proptest! {
    /// A record always matches itself
    #[test]
    fn record_is_identical_to_itself(record in record_strategy()) {
        prop_assert!(is_identical(&record, Some(&record)));
    }

    /// Storage order of fields never changes the verdict
    #[test]
    fn permuting_fields_keeps_identity(
        record in record_strategy(),
        seed in any::<u64>(),
    ) {
        let mut shuffled = record.clone();
        let len = shuffled.fields.len();
        if len > 1 {
            let mut state = seed;
            for i in (1..len).rev() {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                let j = (state >> 33) as usize % (i + 1);
                shuffled.fields.swap(i, j);
            }
        }
        prop_assert!(is_identical(&shuffled, Some(&record)));
    }

    /// Changing id, flags or record type breaks identity
    #[test]
    fn header_changes_are_detected(record in record_strategy(), delta in 1u32..) {
        let mut other = record.clone();
        other.id = other.id.wrapping_add(delta);
        prop_assert!(!is_identical(&other, Some(&record)));

        let mut other = record.clone();
        other.flags ^= delta;
        prop_assert!(!is_identical(&other, Some(&record)));

        let mut other = record.clone();
        other.record_type = Tag(*b"XXXX");
        prop_assert!(!is_identical(&other, Some(&record)));
    }

    /// Adding a field always breaks identity
    #[test]
    fn extra_field_is_detected(record in record_strategy(), field in field_strategy()) {
        let mut other = record.clone();
        other.fields.push(field);
        prop_assert!(!is_identical(&other, Some(&record)));
        prop_assert!(!is_identical(&record, Some(&other)));
    }

    /// Exact fields notice any single flipped byte
    #[test]
    fn exact_fields_detect_byte_flips(
        tag in exact_tag_strategy(),
        payload in prop::collection::vec(any::<u8>(), 1..64),
        index in any::<prop::sample::Index>(),
        mask in 1u8..,
    ) {
        let a = Field::new(tag, payload.clone());
        let mut flipped = payload;
        let i = index.index(flipped.len());
        flipped[i] ^= mask;
        let b = Field::new(tag, flipped);

        prop_assert!(fields_are_identical(IDLE, &a, &a.clone()));
        prop_assert!(!fields_are_identical(IDLE, &a, &b));
    }

    /// Condition data ignores its padding bytes and nothing else
    #[test]
    fn condition_data_masks_only_padding(
        payload in prop::collection::vec(any::<u8>(), 24..=24),
        index in 0usize..24,
        mask in 1u8..,
    ) {
        let a = Field::new(CTDA, payload.clone());
        let mut changed = payload;
        changed[index] ^= mask;
        let b = Field::new(CTDA, changed);

        let padding = matches!(index, 1..=3 | 10 | 11);
        prop_assert_eq!(fields_are_identical(IDLE, &a, &b), padding);
    }

    /// Padding noise on several conditions never changes how they pair up
    #[test]
    fn condition_padding_noise_keeps_identity(
        payloads in prop::collection::vec(prop::collection::vec(any::<u8>(), 24..=24), 1..6),
        noise in prop::collection::vec(any::<[u8; 5]>(), 6..=6),
    ) {
        let master = Record {
            id: 0x0001_3344,
            flags: 0,
            record_type: IDLE,
            fields: payloads.iter().cloned().map(|p| Field::new(CTDA, p)).collect(),
        };
        let mut current = master.clone();
        for (field, bytes) in current.fields.iter_mut().zip(&noise) {
            field.payload[1..4].copy_from_slice(&bytes[..3]);
            field.payload[10..12].copy_from_slice(&bytes[3..]);
        }
        current.fields.reverse();

        prop_assert!(is_identical(&current, Some(&master)));
    }

    /// Editor names compare equal regardless of letter case
    #[test]
    fn editor_names_ignore_case(name in "[A-Za-z]{1,32}") {
        let a = Field::new(ENAM, name.to_ascii_uppercase().into_bytes());
        let b = Field::new(ENAM, name.to_ascii_lowercase().into_bytes());
        prop_assert!(fields_are_identical(IDLE, &a, &b));

        let mut longer = name.into_bytes();
        longer.push(b'a');
        prop_assert!(!fields_are_identical(IDLE, &a, &Field::new(ENAM, longer)));
    }

    /// Canonical sort output is itself sorted and a permutation of the input
    #[test]
    fn canonical_sort_is_ordered(fields in prop::collection::vec(field_strategy(), 0..12)) {
        let sorted = sorted_fields(&fields);
        prop_assert_eq!(sorted.len(), fields.len());
        for pair in sorted.windows(2) {
            prop_assert!(canonical_cmp(pair[0], pair[1]).is_le());
        }
    }

    /// Disjoint copies reproduce the source bytes exactly
    #[test]
    fn disjoint_copy_reproduces_source(
        src in prop::collection::vec(any::<u8>(), 1..64),
        dst_len in 1usize..64,
        src_offset in any::<prop::sample::Index>(),
        dst_offset in any::<prop::sample::Index>(),
    ) {
        let src_offset = src_offset.index(src.len());
        let dst_offset = dst_offset.index(dst_len);
        let count = (src.len() - src_offset).min(dst_len - dst_offset);

        let mut dst = vec![0xAAu8; dst_len];
        copy_bytes(&src, src_offset, &mut dst, dst_offset, count);

        prop_assert_eq!(&dst[dst_offset..dst_offset + count], &src[src_offset..src_offset + count]);
        prop_assert!(dst[..dst_offset].iter().all(|&b| b == 0xAA));
        prop_assert!(dst[dst_offset + count..].iter().all(|&b| b == 0xAA));
    }

    /// Overlapping copies inside one array behave like a copy through a temporary
    #[test]
    fn overlapping_copy_matches_temporary(
        buf in prop::collection::vec(any::<u8>(), 1..64),
        a in any::<prop::sample::Index>(),
        b in any::<prop::sample::Index>(),
        c in any::<prop::sample::Index>(),
    ) {
        let src_offset = a.index(buf.len());
        let dst_offset = b.index(buf.len());
        let max = buf.len() - src_offset.max(dst_offset);
        let count = c.index(max + 1);

        let mut expected = buf.clone();
        let tmp = buf[src_offset..src_offset + count].to_vec();
        expected[dst_offset..dst_offset + count].copy_from_slice(&tmp);

        let mut actual = buf;
        copy_within(&mut actual, src_offset, dst_offset, count);
        prop_assert_eq!(actual, expected);
    }
}
