//! Operator calendars.
//!
//! An operator belongs to exactly one (day, care unit) pair and is active
//! during a single [`Window`]. The calendar is the persisted
//! `operators.json` mapping: Day → CareUnit → Operator → window.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::{CareUnitId, DayId, LabeledWindow, OperatorId, Window};

/// Operators of one care unit on one day.
pub type CareUnitOperators = BTreeMap<OperatorId, Window>;

/// Operators of every care unit on one day.
pub type DayOperators = BTreeMap<CareUnitId, CareUnitOperators>;

/// Full operator calendar of an instance.
///
/// Keys are kept in sorted order so every traversal is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperatorCalendar {
    days: BTreeMap<DayId, DayOperators>,
}

impl OperatorCalendar {
    /// Creates an empty calendar.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an operator, creating the day and care unit entries as needed.
    pub fn with_operator(
        mut self,
        day: impl Into<DayId>,
        care_unit: impl Into<CareUnitId>,
        operator: impl Into<OperatorId>,
        window: Window,
    ) -> Self {
        self.insert(day, care_unit, operator, window);
        self
    }

    /// Inserts an operator.
    pub fn insert(
        &mut self,
        day: impl Into<DayId>,
        care_unit: impl Into<CareUnitId>,
        operator: impl Into<OperatorId>,
        window: Window,
    ) {
        self.days
            .entry(day.into())
            .or_default()
            .entry(care_unit.into())
            .or_default()
            .insert(operator.into(), window);
    }

    /// Registers a day without any operator.
    pub fn with_empty_day(mut self, day: impl Into<DayId>) -> Self {
        self.days.entry(day.into()).or_default();
        self
    }

    /// All day identifiers, sorted.
    pub fn days(&self) -> impl Iterator<Item = &DayId> {
        self.days.keys()
    }

    /// Whether the calendar knows the given day.
    pub fn has_day(&self, day: &str) -> bool {
        self.days.contains_key(day)
    }

    /// Per-day operator mapping.
    pub fn day(&self, day: &str) -> Option<&DayOperators> {
        self.days.get(day)
    }

    /// Iterates `(day, care-unit mapping)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&DayId, &DayOperators)> {
        self.days.iter()
    }

    /// Every care unit appearing on any day, sorted.
    pub fn care_units(&self) -> BTreeSet<CareUnitId> {
        self.days
            .values()
            .flat_map(|day| day.keys().cloned())
            .collect()
    }

    /// Operators of a care unit on a day (`None` if the day or unit is absent).
    pub fn operators(&self, day: &str, care_unit: &str) -> Option<&CareUnitOperators> {
        self.days.get(day).and_then(|d| d.get(care_unit))
    }

    /// Windows of a care unit on a day, tagged with operator ids.
    ///
    /// Empty when the day has no operator for that unit.
    pub fn labeled_windows(&self, day: &str, care_unit: &str) -> Vec<LabeledWindow> {
        self.operators(day, care_unit)
            .map(|ops| {
                ops.iter()
                    .map(|(id, w)| LabeledWindow::new(id.clone(), *w))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Number of days.
    pub fn day_count(&self) -> usize {
        self.days.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_and_lookup() {
        let cal = OperatorCalendar::new()
            .with_operator("0", "cu00", "op0", Window::new(0, 10))
            .with_operator("1", "cu00", "op0", Window::new(0, 4))
            .with_operator("1", "cu01", "op0", Window::new(2, 4))
            .with_empty_day("2");

        assert_eq!(cal.day_count(), 3);
        assert_eq!(
            cal.care_units().into_iter().collect::<Vec<_>>(),
            vec!["cu00".to_string(), "cu01".to_string()]
        );
        assert!(cal.operators("0", "cu01").is_none());
        assert!(cal.operators("2", "cu00").is_none());
        assert_eq!(cal.labeled_windows("1", "cu01").len(), 1);
        assert!(cal.labeled_windows("2", "cu00").is_empty());
    }

    #[test]
    fn test_deserialize_persisted_shape() {
        let json = r#"{
            "0": {"cu00": {"op0": {"start": 0, "duration": 10}}},
            "1": {"cu00": {"op0": {"start": 0, "duration": 4}, "op1": {"start": 4, "duration": 4}}}
        }"#;
        let cal: OperatorCalendar = serde_json::from_str(json).unwrap();
        assert_eq!(cal.days().collect::<Vec<_>>(), vec!["0", "1"]);
        let ops = cal.operators("1", "cu00").unwrap();
        assert_eq!(ops["op1"], Window::new(4, 4));
    }
}
