//! Day dominance (subsumption) analysis.
//!
//! Day A dominates day B for a care unit when every workload B's operators
//! can serve, A's operators can serve too. For fixed operator windows this
//! holds iff each of B's windows can be mapped into one of A's windows such
//! that windows sharing an A-operator never overlap.
//!
//! # Algorithm
//!
//! For each care unit and each ordered pair of days with operators:
//!
//! 1. Reject if B's total operator time exceeds A's.
//! 2. Reject if some B-window fits in no A-window.
//! 3. Accept if B has one operator, or if B's windows are pairwise disjoint.
//! 4. Otherwise ask the [`MatchingOracle`](crate::matching::MatchingOracle).
//!    A failing oracle means "not dominated".
//!
//! Each care unit's accepted edges are then closed transitively, with self
//! edges removed.

mod analyzer;
mod closure;

pub use analyzer::{
    compute_subsumptions, DominanceAnalyzer, DominanceOutcome, DominanceStats, Verdict,
};
pub use closure::close_transitively;
