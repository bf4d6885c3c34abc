//! Matching oracle for entangled operator windows.
//!
//! Decides whether every "contained" window can be assigned to one
//! "containing" window that covers it, such that windows sharing a container
//! never overlap in time. The dominance analysis only asks this question when
//! cheaper arguments fail.
//!
//! # Implementations
//!
//! - [`DirectMatcher`]: augmenting-path matching onto distinct containers,
//!   then an exact bounded search that lets non-overlapping windows share a
//!   container.
//!
//! Any other decision procedure (a SAT/ILP/ASP query, a remote service) can
//! be plugged in through [`MatchingOracle`].
//!
//! # Reference
//! Kolen et al. (2007), "Interval scheduling: A survey", Naval Research
//! Logistics 54(5)

mod direct;

pub use direct::DirectMatcher;

use std::time::Duration;

use crate::models::LabeledWindow;

/// Why an oracle could not answer.
///
/// Callers must treat both cases as "no feasible assignment known".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OracleError {
    #[error("matching oracle unavailable: {0}")]
    Unavailable(String),

    #[error("matching oracle gave up after {explored} nodes in {elapsed:?}")]
    Timeout { explored: usize, elapsed: Duration },
}

/// A decision procedure for the entangled assignment question.
///
/// `contained` windows are known to be covered by at least one `containing`
/// window each. Returns `Ok(true)` iff an assignment exists where each
/// contained window maps to exactly one covering container and no two
/// windows mapped to the same container overlap.
pub trait MatchingOracle {
    fn is_feasible(
        &self,
        containing: &[LabeledWindow],
        contained: &[LabeledWindow],
    ) -> Result<bool, OracleError>;
}

impl<O: MatchingOracle + ?Sized> MatchingOracle for &O {
    fn is_feasible(
        &self,
        containing: &[LabeledWindow],
        contained: &[LabeledWindow],
    ) -> Result<bool, OracleError> {
        (**self).is_feasible(containing, contained)
    }
}
