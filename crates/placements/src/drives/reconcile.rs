use std::collections::BTreeSet;

/// Partition of current vs desired key sets: the minimal delete/reset/insert
/// buckets needed to converge stored state onto a freshly derived set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciliationPlan<K: Ord> {
    /// Present today, absent from the desired set: delete.
    pub removed: BTreeSet<K>,
    /// Present in both: retain, but refresh.
    pub stayed: BTreeSet<K>,
    /// Absent today, present in the desired set: insert.
    pub added: BTreeSet<K>,
}

impl<K: Ord> ReconciliationPlan<K> {
    pub fn is_noop(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty()
    }
}

/// Symmetric-difference reconciliation over two sets. Pure and independent of
/// storage; deterministic regardless of how the inputs were assembled.
pub fn plan<K: Ord + Clone>(
    existing: &BTreeSet<K>,
    desired: &BTreeSet<K>,
) -> ReconciliationPlan<K> {
    ReconciliationPlan {
        removed: existing.difference(desired).cloned().collect(),
        stayed: existing.intersection(desired).cloned().collect(),
        added: desired.difference(existing).cloned().collect(),
    }
}
