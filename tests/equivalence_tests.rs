// SPDX-License-Identifier: MIT
//! End-to-end checks of the equivalence rules on realistic idle records

use std::collections::HashSet;

use beth_record_equiv::tag::{Tag, CTDA, DATA, EDID, ENAM, IDLE, MODL};
use beth_record_equiv::{
    extract_all_records, extract_records, find_identical_overrides, is_identical, EditorNameMode,
    Field, Group, MasterIndex, Mismatch, PluginFile, Record, RecordComparer, RulesConfig,
};

fn condition(type_byte: u8, function: u16, param: u32) -> Vec<u8> {
    let mut payload = vec![0u8; 24];
    payload[0] = type_byte;
    payload[4..8].copy_from_slice(&0.5f32.to_le_bytes());
    payload[8..10].copy_from_slice(&function.to_le_bytes());
    payload[12..16].copy_from_slice(&param.to_le_bytes());
    payload
}

fn sit_idle() -> Record {
    Record::new(0x0001_3344, IDLE)
        .with_flags(0x0000_0040)
        .with_field(Field::new(EDID, b"SitIdle\0".to_vec()))
        .with_field(Field::new(MODL, b"Characters\\_Male\\IdleAnims\\sit.kf\0".to_vec()))
        .with_field(Field::new(CTDA, condition(0x00, 0x0048, 0)))
        .with_field(Field::new(CTDA, condition(0x20, 0x00B6, 3)))
        .with_field(Field::new(ENAM, b"SitIdle".to_vec()))
        .with_field(Field::new(DATA, vec![0x0C, 0, 0, 0, 0, 0, 0, 0]))
}

#[test]
fn reflexive() {
    let record = sit_idle();
    assert!(is_identical(&record, Some(&record)));
}

#[test]
fn header_changes_break_identity() {
    let master = sit_idle();

    let mut r = sit_idle();
    r.id = 0x0001_3345;
    assert!(!is_identical(&r, Some(&master)));

    let mut r = sit_idle();
    r.flags |= 0x0000_0800;
    assert!(!is_identical(&r, Some(&master)));

    let mut r = sit_idle();
    r.record_type = Tag(*b"ANIO");
    assert!(!is_identical(&r, Some(&master)));
}

#[test]
fn field_count_matters() {
    let master = sit_idle();

    let extra = sit_idle().with_field(Field::new(CTDA, condition(0x00, 0x0048, 0)));
    assert!(!is_identical(&extra, Some(&master)));

    let mut fewer = sit_idle();
    fewer.fields.remove(1);
    assert!(!is_identical(&fewer, Some(&master)));
}

#[test]
fn storage_order_does_not_matter() {
    let master = sit_idle();
    let mut current = sit_idle();
    current.fields.reverse();
    current.fields.swap(0, 3);
    assert!(is_identical(&current, Some(&master)));
}

#[test]
fn repeated_conditions_pair_by_content() {
    let master = sit_idle();
    let mut current = sit_idle();
    // swap the two conditions' storage slots
    current.fields.swap(2, 3);
    assert!(is_identical(&current, Some(&master)));

    current.fields[2].payload[12] = 9;
    assert!(!is_identical(&current, Some(&master)));
}

#[test]
fn default_rule_is_exact() {
    for field_index in [0usize, 1, 5] {
        let master = sit_idle();
        let mut current = sit_idle();
        current.fields[field_index].payload[0] ^= 0x01;
        assert!(
            !is_identical(&current, Some(&master)),
            "field {field_index} flip went unnoticed"
        );
    }

    let master = sit_idle();
    let mut longer = sit_idle();
    longer.fields[5].payload.push(0);
    assert!(!is_identical(&longer, Some(&master)));
}

#[test]
fn condition_padding_noise_is_ignored() {
    let master = sit_idle();
    let mut current = sit_idle();
    for field in current.fields.iter_mut().filter(|f| f.field_type == CTDA) {
        field.payload[1] = 0x90;
        field.payload[2] = 0x1F;
        field.payload[3] = 0x7C;
        field.payload[10] = 0xEE;
        field.payload[11] = 0x01;
    }
    assert!(is_identical(&current, Some(&master)));
}

#[test]
fn condition_real_bytes_are_compared() {
    for byte in [0usize, 4, 8, 9, 12, 16, 20, 23] {
        let master = sit_idle();
        let mut current = sit_idle();
        current.fields[3].payload[byte] ^= 0x02;
        assert!(
            !is_identical(&current, Some(&master)),
            "condition byte {byte} flip went unnoticed"
        );
    }
}

#[test]
fn conditions_with_padding_noise_pair_by_content() {
    let master = Record::new(0x0001_3344, IDLE)
        .with_field(Field::new(CTDA, condition(0x00, 0x0048, 0)))
        .with_field(Field::new(CTDA, condition(0x00, 0x0049, 0)));

    let mut noisy = condition(0x00, 0x0048, 0);
    noisy[1] = 0xFF;
    noisy[2] = 0xFF;
    noisy[3] = 0xFF;
    let current = Record::new(0x0001_3344, IDLE)
        .with_field(Field::new(CTDA, noisy))
        .with_field(Field::new(CTDA, condition(0x00, 0x0049, 0)));

    assert!(is_identical(&current, Some(&master)));
    assert!(is_identical(&master, Some(&current)));

    let mut noisy = condition(0x00, 0x0049, 0);
    noisy[10] = 0x7F;
    let current = Record::new(0x0001_3344, IDLE)
        .with_field(Field::new(CTDA, noisy))
        .with_field(Field::new(CTDA, condition(0x00, 0x0048, 0)));
    assert!(is_identical(&current, Some(&master)));
}

#[test]
fn condition_lengths_must_match() {
    let master = sit_idle();
    let mut longer = sit_idle();
    longer.fields[3].payload.extend_from_slice(&[0; 4]);
    assert_eq!(longer.fields[3].payload.len(), 28);

    assert!(!is_identical(&longer, Some(&master)));
    assert!(!is_identical(&master, Some(&longer)));
}

#[test]
fn short_condition_data_is_reported_as_malformed() {
    let master = PluginFile {
        header: None,
        groups: vec![Group::top(*b"IDLE").with_record(sit_idle())],
    };
    let mut short = sit_idle();
    short.fields[2].payload.truncate(8);
    let plugin = PluginFile {
        header: Some(Record::new(0, Tag(*b"TES4"))),
        groups: vec![Group::top(*b"IDLE").with_record(short)],
    };

    let masters = [master];
    let index = MasterIndex::from_masters(&masters);
    let report = find_identical_overrides(&plugin, &index, None, &RecordComparer::default());
    assert_eq!(report.malformed, vec![0x0001_3344]);
    assert_eq!(report.examined, 1);
    assert!(report.identical.is_empty());
}

#[test]
fn condition_outside_idle_records_is_exact() {
    let make = |noise: u8| {
        let mut payload = condition(0x00, 0x0048, 0);
        payload[10] = noise;
        Record::new(0x0002_0000, Tag(*b"PACK")).with_field(Field::new(CTDA, payload))
    };
    assert!(!is_identical(&make(1), Some(&make(0))));
}

#[test]
fn editor_name_ignores_case_not_length() {
    let master = sit_idle();

    let mut lower = sit_idle();
    lower.fields[4].payload = b"sitidle".to_vec();
    assert!(is_identical(&lower, Some(&master)));

    let mut longer = sit_idle();
    longer.fields[4].payload = b"SitIdle\0".to_vec();
    assert!(!is_identical(&longer, Some(&master)));

    let mut renamed = sit_idle();
    renamed.fields[4].payload = b"SitIdlf".to_vec();
    assert!(!is_identical(&renamed, Some(&master)));
}

#[test]
fn editor_name_mirror_current_mode() {
    let master = sit_idle();
    let mut renamed = sit_idle();
    renamed.fields[4].payload = b"Stretch".to_vec();

    let mirror = RecordComparer::new(
        RulesConfig::default().with_editor_name_mode(EditorNameMode::MirrorCurrent),
    );
    assert!(mirror.is_identical(&renamed, Some(&master)));
    assert!(!RecordComparer::default().is_identical(&renamed, Some(&master)));
}

#[test]
fn comparison_does_not_mutate_inputs() {
    let mut master = sit_idle();
    master.fields[2].payload[10] = 0x55;
    let mut current = sit_idle();
    current.fields[4].payload = b"sitidle".to_vec();
    current.fields[2].payload[1] = 0x44;

    let master_before = master.clone();
    let current_before = current.clone();
    assert!(is_identical(&current, Some(&master)));
    assert_eq!(master, master_before);
    assert_eq!(current, current_before);
}

#[test]
fn mismatch_reason_names_the_field() {
    let master = sit_idle();
    let mut current = sit_idle();
    current.fields[1].payload[0] = b'c';

    let reason = RecordComparer::default()
        .compare(&current, Some(&master))
        .unwrap_err();
    assert!(matches!(
        reason,
        Mismatch::PayloadDiffers {
            field_type: MODL,
            ..
        }
    ));
}

#[test]
fn extraction_preserves_order() {
    let a = Record::new(0xA, IDLE);
    let b = Record::new(0xB, IDLE);
    let c = Record::new(0xC, IDLE);
    let plugin = PluginFile {
        header: None,
        groups: vec![Group::top(*b"IDLE")
            .with_record(a)
            .with_group(Group::top(*b"IDLE").with_record(b))
            .with_record(c)],
    };

    let wanted: HashSet<u32> = [0xC, 0xB].into_iter().collect();
    let ids: Vec<u32> = extract_records(&plugin, Some(&wanted))
        .iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(ids, vec![0xB, 0xC]);
    assert_eq!(extract_all_records(&plugin).len(), 3);
}

#[test]
fn cleaning_pass_over_json_dumps() {
    let master = PluginFile {
        header: None,
        groups: vec![Group::top(*b"IDLE").with_record(sit_idle())],
    };
    let mut edited = sit_idle();
    edited.fields[4].payload = b"SITIDLE".to_vec();
    let plugin = PluginFile {
        header: None,
        groups: vec![Group::top(*b"IDLE").with_record(edited)],
    };

    let master: PluginFile =
        serde_json::from_str(&serde_json::to_string(&master).unwrap()).unwrap();
    let plugin: PluginFile =
        serde_json::from_str(&serde_json::to_string(&plugin).unwrap()).unwrap();

    let masters = [master];
    let index = MasterIndex::from_masters(&masters);
    let report = find_identical_overrides(&plugin, &index, None, &RecordComparer::default());
    assert_eq!(report.identical, vec![0x0001_3344]);
}
