//! Transitive-closure finalization of one care unit's dominance edges.
//!
//! Pairwise verdicts are computed independently of iteration order. This
//! step then adds every edge implied by chaining, so the relation does not
//! depend on which pairs happened to be examined first.

use std::collections::BTreeSet;

use crate::models::{CareUnitSubsumptions, DayId};

/// Closes `edges` under transitivity and strips self edges.
///
/// Mutual dominance (equal calendars) would otherwise chain into a day
/// dominating itself. Returns the number of edges added.
pub fn close_transitively(edges: &mut CareUnitSubsumptions) -> usize {
    let direct = edges.clone();
    let mut added = 0;

    for (more, dominated) in edges.iter_mut() {
        let mut reached: BTreeSet<DayId> = BTreeSet::new();
        let mut stack: Vec<&DayId> = direct[more].iter().collect();
        while let Some(day) = stack.pop() {
            if !reached.insert(day.clone()) {
                continue;
            }
            if let Some(next) = direct.get(day) {
                stack.extend(next.iter());
            }
        }
        reached.remove(more);
        dominated.remove(more);

        added += reached.len() - dominated.len();
        *dominated = reached;
    }

    added
}
