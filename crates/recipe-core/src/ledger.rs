//! Resource ledger
//!
//! The ledger is the per-run record of every dispatched resource. Entries are
//! appended in dispatch order and never deduplicated; a runner replaces the
//! whole ledger at the start of each converge.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::resource::{Action, Resource};

/// One dispatch: the resource plus the action actually run.
#[derive(Debug, Clone)]
pub struct LedgerEntry {
    sequence: usize,
    resource: Arc<Resource>,
    action: Action,
}

impl LedgerEntry {
    /// Zero-based dispatch position within the run.
    pub fn sequence(&self) -> usize {
        self.sequence
    }

    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    /// Shared handle to the declared resource.
    pub fn resource_handle(&self) -> &Arc<Resource> {
        &self.resource
    }

    pub fn resource_type(&self) -> &str {
        self.resource.resource_type()
    }

    pub fn name(&self) -> &str {
        self.resource.name()
    }

    /// The dispatched action (may differ from the declared one for notifications).
    pub fn action(&self) -> &Action {
        &self.action
    }

    pub fn record(&self) -> LedgerRecord {
        LedgerRecord {
            sequence: self.sequence,
            resource_type: self.resource_type().to_string(),
            name: self.name().to_string(),
            declared_action: self.resource.action().to_string(),
            action: self.action.to_string(),
        }
    }
}

/// Serializable view of a ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRecord {
    pub sequence: usize,
    #[serde(rename = "type")]
    pub resource_type: String,
    pub name: String,
    pub declared_action: String,
    pub action: String,
}

/// Lazy, restartable iteration over the ledger in dispatch order.
pub type Entries<'a> = std::slice::Iter<'a, LedgerEntry>;

/// Append-only record of dispatched resources for one converge.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    entries: Vec<LedgerEntry>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one dispatch.
    pub fn record(&mut self, resource: Arc<Resource>, action: Action) -> &LedgerEntry {
        let sequence = self.entries.len();
        self.entries.push(LedgerEntry {
            sequence,
            resource,
            action,
        });
        &self.entries[sequence]
    }

    /// Most recent entry for `(type, name)`.
    pub fn find(&self, resource_type: &str, name: &str) -> Option<&LedgerEntry> {
        self.entries
            .iter()
            .rev()
            .find(|entry| entry.resource.is(resource_type, name))
    }

    /// Every entry in dispatch order. Call again to restart.
    pub fn all(&self) -> Entries<'_> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn records(&self) -> Vec<LedgerRecord> {
        self.entries.iter().map(LedgerEntry::record).collect()
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = &'a LedgerEntry;
    type IntoIter = Entries<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.all()
    }
}
