//! Operator availability windows.
//!
//! Every operator is active during one fixed window `[start, start + duration)`
//! on its day. Dominance reasoning only needs two predicates over these
//! windows: containment and overlap.
//!
//! # Time Model
//! Times are integer slots relative to the start of the day. The consumer
//! defines what a slot means.

use serde::{Deserialize, Serialize};

/// A half-open time window `[start, start + duration)`.
///
/// Serialized as `{"start": .., "duration": ..}`, which is exactly the
/// persisted operator shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Window {
    /// Window start (inclusive).
    pub start: i64,
    /// Window length.
    pub duration: i64,
}

impl Window {
    /// Creates a new window.
    pub fn new(start: i64, duration: i64) -> Self {
        Self { start, duration }
    }

    /// Window end (exclusive). Saturates at `i64::MAX`.
    #[inline]
    pub fn end(&self) -> i64 {
        self.start.saturating_add(self.duration)
    }

    /// Whether `self` fully covers `less`.
    ///
    /// True iff `self.start <= less.start` and `self.end() >= less.end()`.
    /// Equal windows contain each other.
    #[inline]
    pub fn contains(&self, less: &Self) -> bool {
        self.start <= less.start && self.end() >= less.end()
    }

    /// Whether two windows intersect.
    ///
    /// Touching windows (`a.end() == b.start`) do not overlap.
    #[inline]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end() && other.start < self.end()
    }
}

/// Free-function form of [`Window::contains`].
#[inline]
pub fn contains(more: &Window, less: &Window) -> bool {
    more.contains(less)
}

/// Free-function form of [`Window::overlaps`].
#[inline]
pub fn overlaps(a: &Window, b: &Window) -> bool {
    a.overlaps(b)
}

/// Whether any two windows in the slice overlap.
///
/// Sorts a copy by start, so only neighbours need comparing.
pub fn any_overlap(windows: &[Window]) -> bool {
    let mut sorted: Vec<Window> = windows.to_vec();
    sorted.sort_by_key(|w| (w.start, w.end()));
    sorted.windows(2).any(|pair| pair[0].overlaps(&pair[1]))
}

/// Sum of durations, widened so long calendars cannot overflow.
pub fn total_duration(windows: &[Window]) -> i128 {
    windows.iter().map(|w| i128::from(w.duration)).sum()
}

/// A window tagged with the identifier of the operator that owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledWindow {
    /// Operator identifier.
    pub id: String,
    /// The operator's window.
    pub window: Window,
}

impl LabeledWindow {
    /// Creates a labeled window.
    pub fn new(id: impl Into<String>, window: Window) -> Self {
        Self {
            id: id.into(),
            window,
        }
    }
}
