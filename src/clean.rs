// SPDX-License-Identifier: MIT
//! Cleaning pass: find override records that are identical to their master
//!
//! The pass only reports; removing the records is up to the caller.
//! File headers (`TES4`) are never candidates and are skipped.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::extract::{extract_records, RecordTree};
use crate::record::Record;
use crate::rules::{can_normalize, Mismatch, RecordComparer};
use crate::tag::TES4;

/// Master records by id
///
/// Built from masters in load order; a later master replaces an earlier
/// record with the same id, as it would in game.
#[derive(Debug, Default)]
pub struct MasterIndex<'a> {
    records: HashMap<u32, &'a Record>,
}

impl<'a> MasterIndex<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index the records of `master`, overriding earlier entries
    pub fn add_master<T: RecordTree + ?Sized>(&mut self, master: &'a T) {
        master.walk(&mut |record: &'a Record| {
            self.records.insert(record.id, record);
        });
    }

    pub fn from_masters<T: RecordTree>(masters: &'a [T]) -> Self {
        let mut index = Self::new();
        for master in masters {
            index.add_master(master);
        }
        index
    }

    pub fn get(&self, id: u32) -> Option<&'a Record> {
        self.records.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Outcome of a cleaning pass
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct CleanReport {
    /// Records looked at
    pub examined: usize,
    /// Ids of overrides identical to their master, in traversal order
    pub identical: Vec<u32>,
    /// Overrides that differ from their master
    pub changed: usize,
    /// Records with no master (new in this plugin)
    pub new_records: usize,
    /// Ids of records skipped because a field could not be normalized
    pub malformed: Vec<u32>,
}

impl CleanReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn identical_count(&self) -> usize {
        self.identical.len()
    }

    /// True if nothing in the plugin is redundant
    pub fn is_clean(&self) -> bool {
        self.identical.is_empty()
    }

    /// Record one comparison outcome
    pub fn record(&mut self, id: u32, outcome: Result<(), Mismatch>) {
        self.examined += 1;
        match outcome {
            Ok(()) => self.identical.push(id),
            Err(Mismatch::MissingMaster) => self.new_records += 1,
            Err(_) => self.changed += 1,
        }
    }

    /// Record a pair that could not be compared
    pub fn record_malformed(&mut self, id: u32) {
        self.examined += 1;
        self.malformed.push(id);
    }

    pub fn merge(&mut self, other: CleanReport) {
        self.examined += other.examined;
        self.identical.extend(other.identical);
        self.changed += other.changed;
        self.new_records += other.new_records;
        self.malformed.extend(other.malformed);
    }

    pub fn summary(&self) -> String {
        format!(
            "{} records examined: {} identical to master, {} changed, {} new, {} malformed",
            self.examined,
            self.identical.len(),
            self.changed,
            self.new_records,
            self.malformed.len()
        )
    }
}

/// Compare every record of `plugin` (or only `ids`) against `masters`
///
/// Pairs where either side holds condition data too short to normalize are
/// reported as malformed instead of compared.
pub fn find_identical_overrides<T>(
    plugin: &T,
    masters: &MasterIndex<'_>,
    ids: Option<&HashSet<u32>>,
    comparer: &RecordComparer,
) -> CleanReport
where
    T: RecordTree + ?Sized,
{
    let mut report = CleanReport::new();
    for record in extract_records(plugin, ids) {
        if record.record_type == TES4 {
            continue;
        }

        let master = masters.get(record.id);
        if !can_normalize(record) || master.is_some_and(|m| !can_normalize(m)) {
            warn!(
                "[{}:{:08X}] skipped: condition data too short",
                record.record_type, record.id
            );
            report.record_malformed(record.id);
            continue;
        }

        let outcome = comparer.compare(record, master);
        if outcome.is_ok() {
            debug!("[{}:{:08X}] identical to master", record.record_type, record.id);
        }
        report.record(record.id, outcome);
    }

    info!("{}", report.summary());
    report
}
