// SPDX-License-Identifier: MIT
//! Record extraction from an already-parsed plugin tree
//!
//! A plugin is a header record followed by nested groups of records. The
//! loader that builds the tree lives outside this crate; anything that can
//! walk its records in pre-order implements [`RecordTree`].

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::record::Record;

/// Pre-order walk over the records of a tree
pub trait RecordTree {
    fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a Record));
}

/// A group container and its children in storage order
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Group {
    /// Raw label bytes; meaning depends on `group_type`
    #[serde(default)]
    pub label: [u8; 4],
    #[serde(default)]
    pub group_type: u32,
    #[serde(default)]
    pub children: Vec<Node>,
}

impl Group {
    /// Top-level group holding records of one type
    pub fn top(label: [u8; 4]) -> Self {
        Self {
            label,
            group_type: 0,
            children: Vec::new(),
        }
    }

    pub fn with_record(mut self, record: Record) -> Self {
        self.children.push(Node::Record(record));
        self
    }

    pub fn with_group(mut self, group: Group) -> Self {
        self.children.push(Node::Group(group));
        self
    }
}

/// A child of a group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Node {
    Record(Record),
    Group(Group),
}

/// A whole plugin: optional header record plus top-level groups
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PluginFile {
    #[serde(default)]
    pub header: Option<Record>,
    #[serde(default)]
    pub groups: Vec<Group>,
}

impl PluginFile {
    pub fn from_json_slice(data: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(data)
    }

    pub fn record_count(&self) -> usize {
        let mut count = 0;
        self.walk(&mut |_| count += 1);
        count
    }
}

impl RecordTree for Record {
    fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a Record)) {
        visit(self);
    }
}

impl RecordTree for Node {
    fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a Record)) {
        match self {
            Node::Record(record) => visit(record),
            Node::Group(group) => group.walk(visit),
        }
    }
}

impl RecordTree for Group {
    fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a Record)) {
        self.children.walk(visit);
    }
}

impl<T: RecordTree> RecordTree for [T] {
    fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a Record)) {
        for item in self {
            item.walk(visit);
        }
    }
}

impl<T: RecordTree> RecordTree for Vec<T> {
    fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a Record)) {
        self.as_slice().walk(visit);
    }
}

impl RecordTree for PluginFile {
    fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a Record)) {
        if let Some(header) = &self.header {
            visit(header);
        }
        self.groups.walk(visit);
    }
}

/// Records of `tree` in pre-order, keeping only ids in `ids` when given
pub fn extract_records<'a, T>(tree: &'a T, ids: Option<&HashSet<u32>>) -> Vec<&'a Record>
where
    T: RecordTree + ?Sized,
{
    let mut records = Vec::new();
    tree.walk(&mut |record: &'a Record| {
        if ids.map_or(true, |ids| ids.contains(&record.id)) {
            records.push(record);
        }
    });
    records
}

/// Every record of `tree` in pre-order
pub fn extract_all_records<T>(tree: &T) -> Vec<&Record>
where
    T: RecordTree + ?Sized,
{
    extract_records(tree, None)
}
