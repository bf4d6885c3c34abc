//! Direct decision procedure for the entangled assignment question.
//!
//! # Algorithm
//!
//! 1. Build the containment-compatibility graph. A contained window with no
//!    covering container is infeasible right away.
//! 2. Run augmenting-path bipartite matching onto *distinct* containers. A
//!    perfect matching is a valid assignment since no container is shared.
//! 3. Otherwise search exactly. Windows are placed in start order, so a
//!    container accepts a new window iff the last window placed on it ends
//!    no later than the new start. Containers with identical window and
//!    occupancy are interchangeable and only one of them is tried.
//!
//! Step 3 is exponential in the worst case and runs under the node and time
//! budgets of [`DirectMatcher`].
//!
//! # Complexity
//! Steps 1-2: O(l * m * (l + m)) for l contained and m containing windows.

use std::cmp::Reverse;
use std::time::{Duration, Instant};

use super::{MatchingOracle, OracleError};
use crate::config::AnalysisConfig;
use crate::models::{LabeledWindow, Window};

/// Matching oracle solving the question in-process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectMatcher {
    time_limit: Option<Duration>,
    node_limit: Option<usize>,
}

impl DirectMatcher {
    /// Creates a matcher without limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a matcher with the oracle limits of `config`.
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            time_limit: config.oracle_time_limit_ms.map(Duration::from_millis),
            node_limit: config.oracle_node_limit,
        }
    }

    /// Sets the wall-clock budget of one query.
    pub fn with_time_limit(mut self, limit: Option<Duration>) -> Self {
        self.time_limit = limit;
        self
    }

    /// Sets the search-node budget of one query.
    pub fn with_node_limit(mut self, limit: Option<usize>) -> Self {
        self.node_limit = limit;
        self
    }
}

impl MatchingOracle for DirectMatcher {
    fn is_feasible(
        &self,
        containing: &[LabeledWindow],
        contained: &[LabeledWindow],
    ) -> Result<bool, OracleError> {
        let eligible: Vec<Vec<usize>> = contained
            .iter()
            .map(|less| {
                containing
                    .iter()
                    .enumerate()
                    .filter(|(_, more)| more.window.contains(&less.window))
                    .map(|(j, _)| j)
                    .collect()
            })
            .collect();

        if eligible.iter().any(Vec::is_empty) {
            return Ok(false);
        }
        if distinct_matching_size(&eligible, containing.len()) == contained.len() {
            return Ok(true);
        }

        let more: Vec<Window> = containing.iter().map(|m| m.window).collect();
        let less: Vec<Window> = contained.iter().map(|l| l.window).collect();
        Search::new(self, &more, &less, &eligible).run()
    }
}

/// Size of a maximum matching where every container takes at most one window.
///
/// Kuhn's augmenting-path algorithm.
fn distinct_matching_size(eligible: &[Vec<usize>], containers: usize) -> usize {
    let mut owner: Vec<Option<usize>> = vec![None; containers];
    let mut size = 0;
    for less in 0..eligible.len() {
        let mut seen = vec![false; containers];
        if augment(less, eligible, &mut owner, &mut seen) {
            size += 1;
        }
    }
    size
}

fn augment(
    less: usize,
    eligible: &[Vec<usize>],
    owner: &mut [Option<usize>],
    seen: &mut [bool],
) -> bool {
    for &more in &eligible[less] {
        if seen[more] {
            continue;
        }
        seen[more] = true;
        let free = match owner[more] {
            None => true,
            Some(other) => augment(other, eligible, owner, seen),
        };
        if free {
            owner[more] = Some(less);
            return true;
        }
    }
    false
}

/// Exact backtracking over shared containers.
struct Search<'a> {
    more: &'a [Window],
    less: &'a [Window],
    eligible: &'a [Vec<usize>],
    order: Vec<usize>,
    /// End of the last window placed on each container.
    last_end: Vec<Option<i64>>,
    explored: usize,
    started: Instant,
    time_limit: Option<Duration>,
    node_limit: Option<usize>,
}

impl<'a> Search<'a> {
    fn new(
        matcher: &DirectMatcher,
        more: &'a [Window],
        less: &'a [Window],
        eligible: &'a [Vec<usize>],
    ) -> Self {
        let mut order: Vec<usize> = (0..less.len()).collect();
        order.sort_by_key(|&i| (less[i].start, less[i].end()));
        Self {
            more,
            less,
            eligible,
            order,
            last_end: vec![None; more.len()],
            explored: 0,
            started: Instant::now(),
            time_limit: matcher.time_limit,
            node_limit: matcher.node_limit,
        }
    }

    fn run(mut self) -> Result<bool, OracleError> {
        self.place(0)
    }

    fn tick(&mut self) -> Result<(), OracleError> {
        self.explored += 1;
        let over_nodes = self.node_limit.is_some_and(|limit| self.explored > limit);
        let over_time = self.explored % 256 == 0
            && self
                .time_limit
                .is_some_and(|limit| self.started.elapsed() > limit);
        if over_nodes || over_time {
            return Err(OracleError::Timeout {
                explored: self.explored,
                elapsed: self.started.elapsed(),
            });
        }
        Ok(())
    }

    fn place(&mut self, k: usize) -> Result<bool, OracleError> {
        if k == self.order.len() {
            return Ok(true);
        }
        self.tick()?;

        let window = self.less[self.order[k]];
        let mut candidates: Vec<usize> = self.eligible[self.order[k]]
            .iter()
            .copied()
            .filter(|&j| self.last_end[j].map_or(true, |end| end <= window.start))
            .collect();
        // Best fit first: tightest occupied container, then the earliest-ending free one.
        candidates.sort_by_key(|&j| {
            (
                self.last_end[j].is_none(),
                Reverse(self.last_end[j]),
                self.more[j].end(),
            )
        });

        let mut tried: Vec<(Window, Option<i64>)> = Vec::with_capacity(candidates.len());
        for j in candidates {
            let state = (self.more[j], self.last_end[j]);
            if tried.contains(&state) {
                continue;
            }
            tried.push(state);

            let previous = self.last_end[j].replace(window.end());
            if self.place(k + 1)? {
                return Ok(true);
            }
            self.last_end[j] = previous;
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn labeled(windows: &[(i64, i64)]) -> Vec<LabeledWindow> {
        windows
            .iter()
            .enumerate()
            .map(|(i, &(start, duration))| {
                LabeledWindow::new(format!("op{i}"), Window::new(start, duration))
            })
            .collect()
    }

    /// Enumerates every assignment.
    fn brute_force(more: &[LabeledWindow], less: &[LabeledWindow]) -> bool {
        fn go(k: usize, more: &[LabeledWindow], less: &[LabeledWindow], chosen: &mut Vec<usize>) -> bool {
            if k == less.len() {
                return true;
            }
            for j in 0..more.len() {
                if !more[j].window.contains(&less[k].window) {
                    continue;
                }
                let clash = chosen
                    .iter()
                    .enumerate()
                    .any(|(i, &c)| c == j && less[i].window.overlaps(&less[k].window));
                if clash {
                    continue;
                }
                chosen.push(j);
                if go(k + 1, more, less, chosen) {
                    return true;
                }
                chosen.pop();
            }
            false
        }
        go(0, more, less, &mut Vec::new())
    }

    #[test]
    fn test_overlapping_share_single_container() {
        let more = labeled(&[(0, 10)]);
        let less = labeled(&[(0, 6), (3, 6)]);
        assert_eq!(DirectMatcher::new().is_feasible(&more, &less), Ok(false));
    }

    #[test]
    fn test_overlapping_spread_over_two_containers() {
        let more = labeled(&[(0, 10), (2, 8)]);
        let less = labeled(&[(0, 6), (3, 6)]);
        assert_eq!(DirectMatcher::new().is_feasible(&more, &less), Ok(true));
    }

    #[test]
    fn test_disjoint_windows_share_container() {
        let more = labeled(&[(0, 10)]);
        let less = labeled(&[(0, 4), (4, 4), (8, 2)]);
        assert_eq!(DirectMatcher::new().is_feasible(&more, &less), Ok(true));
    }

    #[test]
    fn test_uncovered_window_is_infeasible() {
        let more = labeled(&[(0, 5)]);
        let less = labeled(&[(3, 5)]);
        assert_eq!(DirectMatcher::new().is_feasible(&more, &less), Ok(false));
    }

    #[test]
    fn test_empty_contained_is_feasible() {
        let more = labeled(&[(0, 5)]);
        assert_eq!(DirectMatcher::new().is_feasible(&more, &[]), Ok(true));
    }

    #[test]
    fn test_search_needs_sharing_and_spreading() {
        // [0,4) and [4,8) must share the wide container so [1,6) can take the narrow one.
        let more = labeled(&[(0, 10), (1, 5)]);
        let less = labeled(&[(0, 4), (1, 5), (4, 4)]);
        assert_eq!(DirectMatcher::new().is_feasible(&more, &less), Ok(true));
    }

    #[test]
    fn test_node_limit_reports_timeout() {
        let more = labeled(&[(0, 10)]);
        let less = labeled(&[(0, 6), (3, 6)]);
        let matcher = DirectMatcher::new().with_node_limit(Some(0));
        assert!(matches!(
            matcher.is_feasible(&more, &less),
            Err(OracleError::Timeout { .. })
        ));
    }

    #[test]
    fn test_fast_path_ignores_node_limit() {
        // A perfect distinct matching answers before any search node.
        let more = labeled(&[(0, 10), (0, 10)]);
        let less = labeled(&[(0, 6), (3, 6)]);
        let matcher = DirectMatcher::new().with_node_limit(Some(0));
        assert_eq!(matcher.is_feasible(&more, &less), Ok(true));
    }

    #[test]
    fn test_from_config() {
        let config = AnalysisConfig::default()
            .with_oracle_time_limit_ms(Some(5))
            .with_oracle_node_limit(None);
        let matcher = DirectMatcher::from_config(&config);
        assert_eq!(
            matcher,
            DirectMatcher::new().with_time_limit(Some(Duration::from_millis(5)))
        );
    }

    #[test]
    fn test_matches_brute_force_on_random_instances() {
        let mut rng = StdRng::seed_from_u64(42);
        let matcher = DirectMatcher::new();
        for _ in 0..500 {
            let n_more = rng.random_range(1..=3);
            let n_less = rng.random_range(1..=5);
            let more: Vec<(i64, i64)> = (0..n_more)
                .map(|_| (rng.random_range(0..6), rng.random_range(4..14)))
                .collect();
            let less: Vec<(i64, i64)> = (0..n_less)
                .map(|_| (rng.random_range(0..10), rng.random_range(1..5)))
                .collect();
            let (more, less) = (labeled(&more), labeled(&less));
            assert_eq!(
                matcher.is_feasible(&more, &less),
                Ok(brute_force(&more, &less)),
                "more={more:?} less={less:?}"
            );
        }
    }
}
