//! Per-care-unit day dominance relation.
//!
//! `relation[cu][more]` is the sorted set of days whose operator calendar for
//! `cu` can always be absorbed by `more`'s calendar. The analyzer guarantees
//! the relation is irreflexive and transitively closed per care unit; it is
//! neither antisymmetric (equal calendars dominate each other) nor total.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::{CareUnitId, DayId};

/// Dominated days of every more-day within one care unit.
pub type CareUnitSubsumptions = BTreeMap<DayId, BTreeSet<DayId>>;

/// `subsumptions.json`: CareUnit → MoreDay → sorted LessDay list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubsumptionRelation {
    care_units: BTreeMap<CareUnitId, CareUnitSubsumptions>,
}

impl SubsumptionRelation {
    /// Creates an empty relation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a care unit with no edge yet.
    pub fn add_care_unit(&mut self, care_unit: impl Into<CareUnitId>) {
        self.care_units.entry(care_unit.into()).or_default();
    }

    /// Records that `more` dominates `less` within `care_unit`.
    ///
    /// Self edges are ignored.
    pub fn insert(
        &mut self,
        care_unit: impl Into<CareUnitId>,
        more: impl Into<DayId>,
        less: impl Into<DayId>,
    ) {
        let (more, less) = (more.into(), less.into());
        let unit = self.care_units.entry(care_unit.into()).or_default();
        if more != less {
            unit.entry(more).or_default().insert(less);
        }
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with_edge(
        mut self,
        care_unit: impl Into<CareUnitId>,
        more: impl Into<DayId>,
        less: impl Into<DayId>,
    ) -> Self {
        self.insert(care_unit, more, less);
        self
    }

    /// Replaces a care unit's edges wholesale.
    ///
    /// More-days with an empty dominated set are dropped so the persisted
    /// form never carries empty lists.
    pub fn set_care_unit(&mut self, care_unit: impl Into<CareUnitId>, edges: CareUnitSubsumptions) {
        let edges = edges
            .into_iter()
            .filter_map(|(more, mut less)| {
                less.remove(&more);
                (!less.is_empty()).then_some((more, less))
            })
            .collect();
        self.care_units.insert(care_unit.into(), edges);
    }

    /// Whether `more` dominates `less` within `care_unit`.
    pub fn dominates(&self, care_unit: &str, more: &str, less: &str) -> bool {
        self.dominated_by(care_unit, more)
            .is_some_and(|dominated| dominated.contains(less))
    }

    /// Days dominated by `more` within `care_unit`.
    pub fn dominated_by(&self, care_unit: &str, more: &str) -> Option<&BTreeSet<DayId>> {
        self.care_units.get(care_unit).and_then(|unit| unit.get(more))
    }

    /// Edges of one care unit.
    pub fn care_unit(&self, care_unit: &str) -> Option<&CareUnitSubsumptions> {
        self.care_units.get(care_unit)
    }

    /// Care units present in the relation, sorted.
    pub fn care_units(&self) -> impl Iterator<Item = &CareUnitId> {
        self.care_units.keys()
    }

    /// Iterates `(care unit, edges)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&CareUnitId, &CareUnitSubsumptions)> {
        self.care_units.iter()
    }

    /// Total number of (more, less) edges across care units.
    pub fn edge_count(&self) -> usize {
        self.care_units
            .values()
            .flat_map(|unit| unit.values())
            .map(BTreeSet::len)
            .sum()
    }
}
