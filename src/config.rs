//! Analysis configuration.
//!
//! [`AnalysisConfig`] holds the knobs shared by the dominance analysis and
//! the core extraction.

/// Configuration for both analyses.
///
/// # Defaults
///
/// ```
/// use u_carecut::AnalysisConfig;
///
/// let config = AnalysisConfig::default();
/// assert!(config.parallel);
/// assert_eq!(config.oracle_time_limit_ms, Some(1_000));
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_carecut::AnalysisConfig;
///
/// let config = AnalysisConfig::default()
///     .with_parallel(false)
///     .with_oracle_time_limit_ms(None)
///     .with_oracle_node_limit(Some(10_000));
/// assert_eq!(config.oracle_node_limit, Some(10_000));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisConfig {
    /// Whether to spread independent work units over a rayon pool.
    ///
    /// Ignored when the crate is built without the `parallel` feature.
    /// Output is identical either way.
    pub parallel: bool,

    /// Wall-clock budget of one matching query in milliseconds.
    ///
    /// A query exceeding it is answered "not dominated".
    /// `None` disables the limit.
    pub oracle_time_limit_ms: Option<u64>,

    /// Maximum number of search nodes explored by one matching query.
    ///
    /// Deterministic counterpart of the time limit. `None` disables it.
    pub oracle_node_limit: Option<usize>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            oracle_time_limit_ms: Some(1_000),
            oracle_node_limit: Some(1_000_000),
        }
    }
}

impl AnalysisConfig {
    /// Enables or disables parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the per-query time limit.
    pub fn with_oracle_time_limit_ms(mut self, limit: Option<u64>) -> Self {
        self.oracle_time_limit_ms = limit;
        self
    }

    /// Sets the per-query node limit.
    pub fn with_oracle_node_limit(mut self, limit: Option<usize>) -> Self {
        self.oracle_node_limit = limit;
        self
    }

    /// Whether work should actually run in parallel in this build.
    pub(crate) fn run_parallel(&self) -> bool {
        cfg!(feature = "parallel") && self.parallel
    }
}
