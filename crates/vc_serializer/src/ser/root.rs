//! Merging of root-flattened association sequences.

use alloc::string::String;
use alloc::vec::Vec;

use crate::{Map, Value};

/// Keeps the first occurrence of every structurally equal entry.
fn dedupe(entries: Vec<Value>) -> Vec<Value> {
    let mut unique: Vec<Value> = Vec::with_capacity(entries.len());
    for entry in entries {
        if !unique.contains(&entry) {
            unique.push(entry);
        }
    }
    unique
}

fn into_entries(data: Value) -> Vec<Value> {
    match data {
        Value::Array(entries) => entries,
        Value::Null => Vec::new(),
        other => alloc::vec![other],
    }
}

/// Appends `data` to the sequence under `key`, then drops duplicates.
///
/// `data` is normally a sequence; `null` contributes nothing and any other
/// value is one entry.
///
/// Entries are compared pairwise, so one merge costs `O(n^2)` in the length
/// of the merged sequence.
pub(crate) fn merge(root: &mut Map<String, Value>, key: &str, data: Value) {
    let incoming = into_entries(data);
    match root.get_mut(key) {
        Some(existing) => {
            let mut entries = into_entries(core::mem::take(existing));
            let before = entries.len();
            entries.extend(incoming);
            let merged = dedupe(entries);
            log::trace!("root `{key}`: merged into {before} entries, {} now", merged.len());
            *existing = Value::Array(merged);
        }
        None => {
            root.insert(key.into(), Value::Array(dedupe(incoming)));
        }
    }
}

/// Merges every sequence of `other` into `root`.
pub(crate) fn merge_all(root: &mut Map<String, Value>, other: Map<String, Value>) {
    for (key, data) in other {
        merge(root, &key, data);
    }
}

// -----------------------------------------------------------------------------
// Tests
