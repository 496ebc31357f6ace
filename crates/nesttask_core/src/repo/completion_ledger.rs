//! Session-scoped completion ledger.
//!
//! # Responsibility
//! - Map task ids to completion timestamps under one storage key.
//! - Apply `LedgerEffect`s emitted by the tree engine.
//!
//! # Invariants
//! - The ledger is authoritative for completion state on every reload.
//! - Reads never fail: malformed data is treated as an empty ledger, and an
//!   entry with an unparsable timestamp is treated as absent.
//! - Writes are best effort and never surface errors.

use crate::engine::LedgerEffect;
use crate::model::task::TaskId;
use crate::model::time::CompletedAt;
use crate::repo::kv_repo::KvRepository;
use log::warn;
use std::collections::BTreeMap;

/// Storage key holding the serialized ledger.
pub const COMPLETION_KEY: &str = "todo-completions";

/// Point-in-time copy of every ledger entry.
pub type LedgerSnapshot = BTreeMap<TaskId, CompletedAt>;

/// Completion ledger over any key/value repository.
pub struct CompletionLedger<R: KvRepository> {
    repo: R,
}

impl<R: KvRepository> CompletionLedger<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn get(&self, id: &TaskId) -> Option<CompletedAt> {
        self.get_all().get(id).copied()
    }

    pub fn set(&self, id: &TaskId, completed_at: CompletedAt) {
        let mut entries = self.get_all();
        entries.insert(id.clone(), completed_at);
        self.write(&entries);
    }

    pub fn remove(&self, id: &TaskId) {
        self.remove_many(std::slice::from_ref(id));
    }

    /// Removes several entries with a single write.
    pub fn remove_many(&self, ids: &[TaskId]) {
        let mut entries = self.get_all();
        let before = entries.len();
        for id in ids {
            entries.remove(id);
        }
        if entries.len() != before {
            self.write(&entries);
        }
    }

    /// Returns every entry; degrades to empty on read or decode failure.
    pub fn get_all(&self) -> LedgerSnapshot {
        let raw = match self.repo.get(COMPLETION_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return LedgerSnapshot::new(),
            Err(err) => {
                warn!(
                    "event=ledger_load module=ledger status=degraded error_code=read_failed error={err}"
                );
                return LedgerSnapshot::new();
            }
        };

        let decoded = match serde_json::from_str::<BTreeMap<String, String>>(&raw) {
            Ok(decoded) => decoded,
            Err(err) => {
                warn!(
                    "event=ledger_load module=ledger status=degraded error_code=malformed_data error={err}"
                );
                return LedgerSnapshot::new();
            }
        };

        let mut skipped = 0usize;
        let entries = decoded
            .into_iter()
            .filter_map(|(id, stamp)| match CompletedAt::parse(&stamp) {
                Some(completed_at) => Some((TaskId::from(id), completed_at)),
                None => {
                    skipped += 1;
                    None
                }
            })
            .collect();
        if skipped > 0 {
            warn!(
                "event=ledger_load module=ledger status=degraded error_code=malformed_entry skipped={skipped}"
            );
        }
        entries
    }

    /// Applies one engine effect.
    pub fn apply(&self, effect: &LedgerEffect) {
        match effect {
            LedgerEffect::Record { id, completed_at } => self.set(id, *completed_at),
            LedgerEffect::Erase { id } => self.remove(id),
        }
    }

    /// Drops every entry, ending the completion session.
    pub fn clear(&self) {
        if let Err(err) = self.repo.delete(COMPLETION_KEY) {
            warn!(
                "event=ledger_clear module=ledger status=error error_code=write_failed error={err}"
            );
        }
    }

    fn write(&self, entries: &LedgerSnapshot) {
        let encoded: BTreeMap<&str, String> = entries
            .iter()
            .map(|(id, completed_at)| (id.as_str(), completed_at.to_string()))
            .collect();
        let encoded = match serde_json::to_string(&encoded) {
            Ok(encoded) => encoded,
            Err(err) => {
                warn!(
                    "event=ledger_save module=ledger status=error error_code=encode_failed error={err}"
                );
                return;
            }
        };

        if let Err(err) = self.repo.put(COMPLETION_KEY, &encoded) {
            warn!(
                "event=ledger_save module=ledger status=error error_code=write_failed error={err}"
            );
        }
    }
}
