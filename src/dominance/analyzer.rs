//! Pairwise day dominance and relation assembly.

use std::collections::BTreeSet;

use tracing::{debug, debug_span, info, warn};

use super::closure::close_transitively;
use crate::config::AnalysisConfig;
use crate::exec::map_units;
use crate::matching::{DirectMatcher, MatchingOracle};
use crate::models::{
    any_overlap, total_duration, CareUnitId, CareUnitSubsumptions, DayId, LabeledWindow,
    OperatorCalendar, SubsumptionRelation, Window,
};

/// Outcome of comparing one more-day calendar against one less-day calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Less-day operators work longer in total.
    RejectedByDuration,
    /// Some less-day operator fits in no more-day operator.
    RejectedByContainment,
    /// Single less-day operator with a covering container.
    AcceptedSingleOperator,
    /// Less-day operators are pairwise disjoint and each is covered.
    AcceptedDisjoint,
    /// The oracle found a conflict-free assignment.
    AcceptedByOracle,
    /// The oracle proved no conflict-free assignment exists.
    RejectedByOracle,
    /// The oracle gave no answer; treated as not dominated.
    OracleFailed,
}

impl Verdict {
    /// Whether the more-day dominates the less-day.
    pub fn is_dominated(self) -> bool {
        matches!(
            self,
            Self::AcceptedSingleOperator | Self::AcceptedDisjoint | Self::AcceptedByOracle
        )
    }
}

/// Counters collected during one analysis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DominanceStats {
    /// Ordered (more, less) pairs compared.
    pub pairs: usize,
    pub rejected_by_duration: usize,
    pub rejected_by_containment: usize,
    pub accepted_single_operator: usize,
    pub accepted_disjoint: usize,
    pub oracle_accepted: usize,
    pub oracle_rejected: usize,
    pub oracle_failures: usize,
    /// Edges contributed by transitive closure rather than a direct verdict.
    pub closure_edges: usize,
}

impl DominanceStats {
    fn record(&mut self, verdict: Verdict) {
        self.pairs += 1;
        let counter = match verdict {
            Verdict::RejectedByDuration => &mut self.rejected_by_duration,
            Verdict::RejectedByContainment => &mut self.rejected_by_containment,
            Verdict::AcceptedSingleOperator => &mut self.accepted_single_operator,
            Verdict::AcceptedDisjoint => &mut self.accepted_disjoint,
            Verdict::AcceptedByOracle => &mut self.oracle_accepted,
            Verdict::RejectedByOracle => &mut self.oracle_rejected,
            Verdict::OracleFailed => &mut self.oracle_failures,
        };
        *counter += 1;
    }

    fn merge(&mut self, other: &Self) {
        self.pairs += other.pairs;
        self.rejected_by_duration += other.rejected_by_duration;
        self.rejected_by_containment += other.rejected_by_containment;
        self.accepted_single_operator += other.accepted_single_operator;
        self.accepted_disjoint += other.accepted_disjoint;
        self.oracle_accepted += other.oracle_accepted;
        self.oracle_rejected += other.oracle_rejected;
        self.oracle_failures += other.oracle_failures;
        self.closure_edges += other.closure_edges;
    }

    /// Pairs accepted by a direct verdict.
    pub fn accepted(&self) -> usize {
        self.accepted_single_operator + self.accepted_disjoint + self.oracle_accepted
    }
}

/// Relation plus the counters that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DominanceOutcome {
    pub relation: SubsumptionRelation,
    pub stats: DominanceStats,
}

/// Dominated days of one (care unit, more-day) work unit.
struct Row {
    care_unit: CareUnitId,
    more_day: DayId,
    dominated: BTreeSet<DayId>,
    stats: DominanceStats,
}

/// Computes the per-care-unit dominance relation of an operator calendar.
///
/// # Example
/// ```
/// use u_carecut::dominance::DominanceAnalyzer;
/// use u_carecut::models::{OperatorCalendar, Window};
/// use u_carecut::AnalysisConfig;
///
/// let calendar = OperatorCalendar::new()
///     .with_operator("0", "cu00", "op0", Window::new(0, 10))
///     .with_operator("1", "cu00", "op0", Window::new(0, 4))
///     .with_operator("1", "cu00", "op1", Window::new(4, 4));
///
/// let relation = DominanceAnalyzer::new(AnalysisConfig::default()).compute_subsumptions(&calendar);
/// assert!(relation.dominates("cu00", "0", "1"));
/// assert!(!relation.dominates("cu00", "1", "0"));
/// ```
#[derive(Debug, Clone)]
pub struct DominanceAnalyzer<O = DirectMatcher> {
    oracle: O,
    config: AnalysisConfig,
}

impl DominanceAnalyzer<DirectMatcher> {
    /// Creates an analyzer backed by [`DirectMatcher`] with the config's limits.
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            oracle: DirectMatcher::from_config(&config),
            config,
        }
    }
}

impl Default for DominanceAnalyzer<DirectMatcher> {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}

impl<O: MatchingOracle + Sync> DominanceAnalyzer<O> {
    /// Creates an analyzer backed by a custom oracle.
    pub fn with_oracle(oracle: O, config: AnalysisConfig) -> Self {
        Self { oracle, config }
    }

    /// Decides whether `more` dominates `less` for one care unit.
    ///
    /// Checks run cheapest first: total duration, per-operator containment,
    /// single operator, pairwise disjointness, and finally the oracle.
    pub fn compare(&self, more: &[LabeledWindow], less: &[LabeledWindow]) -> Verdict {
        let more_windows: Vec<Window> = more.iter().map(|m| m.window).collect();
        let less_windows: Vec<Window> = less.iter().map(|l| l.window).collect();

        if total_duration(&less_windows) > total_duration(&more_windows) {
            return Verdict::RejectedByDuration;
        }
        let all_covered = less_windows
            .iter()
            .all(|l| more_windows.iter().any(|m| m.contains(l)));
        if !all_covered {
            return Verdict::RejectedByContainment;
        }
        if less_windows.len() == 1 {
            return Verdict::AcceptedSingleOperator;
        }
        if !any_overlap(&less_windows) {
            return Verdict::AcceptedDisjoint;
        }

        match self.oracle.is_feasible(more, less) {
            Ok(true) => Verdict::AcceptedByOracle,
            Ok(false) => Verdict::RejectedByOracle,
            Err(error) => {
                warn!(%error, "matching oracle failed, assuming not dominated");
                Verdict::OracleFailed
            }
        }
    }

    /// Computes the relation only.
    pub fn compute_subsumptions(&self, calendar: &OperatorCalendar) -> SubsumptionRelation {
        self.analyze(calendar).relation
    }

    /// Computes the relation and its statistics.
    ///
    /// Every (care unit, more-day) pair is an independent work unit; only the
    /// closure step per care unit sees all of a unit's rows together.
    pub fn analyze(&self, calendar: &OperatorCalendar) -> DominanceOutcome {
        let care_units = calendar.care_units();
        let units: Vec<(&CareUnitId, &DayId)> = care_units
            .iter()
            .flat_map(|cu| {
                calendar
                    .days()
                    .filter(move |day| !calendar.labeled_windows(day, cu).is_empty())
                    .map(move |day| (cu, day))
            })
            .collect();

        let rows = map_units(self.config.run_parallel(), &units, |&(cu, day)| {
            self.analyze_row(calendar, cu, day)
        });

        let mut relation = SubsumptionRelation::new();
        let mut stats = DominanceStats::default();
        for cu in &care_units {
            let mut edges = CareUnitSubsumptions::new();
            let mut unit_stats = DominanceStats::default();
            for row in rows.iter().filter(|row| &row.care_unit == cu) {
                unit_stats.merge(&row.stats);
                if !row.dominated.is_empty() {
                    edges.insert(row.more_day.clone(), row.dominated.clone());
                }
            }
            unit_stats.closure_edges = close_transitively(&mut edges);
            debug!(
                care_unit = %cu,
                pairs = unit_stats.pairs,
                accepted = unit_stats.accepted(),
                closure_edges = unit_stats.closure_edges,
                "Compared day calendars"
            );
            stats.merge(&unit_stats);
            relation.set_care_unit(cu.clone(), edges);
        }

        info!(
            care_units = care_units.len(),
            pairs = stats.pairs,
            edges = relation.edge_count(),
            oracle_failures = stats.oracle_failures,
            "Computed subsumptions"
        );
        DominanceOutcome { relation, stats }
    }

    fn analyze_row(&self, calendar: &OperatorCalendar, cu: &CareUnitId, more_day: &DayId) -> Row {
        let _span = debug_span!("dominance", care_unit = %cu, more_day = %more_day).entered();
        let more = calendar.labeled_windows(more_day, cu);
        let mut dominated = BTreeSet::new();
        let mut stats = DominanceStats::default();

        for less_day in calendar.days().filter(|&day| day != more_day) {
            let less = calendar.labeled_windows(less_day, cu);
            if less.is_empty() {
                continue;
            }
            let verdict = self.compare(&more, &less);
            stats.record(verdict);
            if verdict.is_dominated() {
                dominated.insert(less_day.clone());
            }
        }

        Row {
            care_unit: cu.clone(),
            more_day: more_day.clone(),
            dominated,
            stats,
        }
    }
}

/// Computes the relation with the default analyzer.
pub fn compute_subsumptions(calendar: &OperatorCalendar) -> SubsumptionRelation {
    DominanceAnalyzer::default().compute_subsumptions(calendar)
}
