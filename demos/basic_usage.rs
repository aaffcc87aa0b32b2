// SPDX-License-Identifier: MIT
//! Basic usage example for record equivalence checks

use beth_record_equiv::tag::{CTDA, EDID, ENAM, IDLE};
use beth_record_equiv::{
    find_identical_overrides, Field, Group, MasterIndex, PluginFile, Record, RecordComparer,
    RulesConfig,
};

fn condition(type_byte: u8, padding: u8) -> Vec<u8> {
    let mut payload = vec![0u8; 24];
    payload[0] = type_byte;
    payload[1] = padding;
    payload[8] = 0x48;
    payload[10] = padding;
    payload
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Record Equivalence - Basic Usage ===\n");

    // Step 1: Build a master record and an override of it
    println!("1. Building records...");
    let master = Record::new(0x0001_3344, IDLE)
        .with_field(Field::new(EDID, b"LookAround\0".to_vec()))
        .with_field(Field::new(CTDA, condition(0x00, 0x00)))
        .with_field(Field::new(ENAM, b"LookAround".to_vec()));

    // Same content: fields reordered, padding garbage, editor name re-cased
    let override_record = Record::new(0x0001_3344, IDLE)
        .with_field(Field::new(ENAM, b"LOOKAROUND".to_vec()))
        .with_field(Field::new(EDID, b"LookAround\0".to_vec()))
        .with_field(Field::new(CTDA, condition(0x00, 0xCD)));

    println!("   Master:   {} fields", master.fields.len());
    println!("   Override: {} fields", override_record.fields.len());

    // Step 2: Compare
    println!("\n2. Comparing...");
    let comparer = RecordComparer::new(RulesConfig::from_env()?);
    match comparer.compare(&override_record, Some(&master)) {
        Ok(()) => println!("   Override is identical to master"),
        Err(reason) => println!("   Override differs: {}", reason),
    }

    // Step 3: Clean a whole plugin
    println!("\n3. Cleaning a plugin...");
    let masters = [PluginFile {
        header: None,
        groups: vec![Group::top(*b"IDLE").with_record(master.clone())],
    }];
    let plugin = PluginFile {
        header: None,
        groups: vec![Group::top(*b"IDLE")
            .with_record(override_record)
            .with_record(Record::new(0x0100_0800, IDLE))],
    };

    let index = MasterIndex::from_masters(&masters);
    let report = find_identical_overrides(&plugin, &index, None, &comparer);
    println!("   {}", report.summary());
    for id in &report.identical {
        println!("   Redundant: [IDLE:{:08X}]", id);
    }

    println!("\n=== Done ===");
    Ok(())
}
