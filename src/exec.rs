//! Optional data parallelism over independent work units.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Maps `f` over `items`, on the rayon pool when `parallel` is set.
///
/// Results keep the order of `items` in both modes.
pub(crate) fn map_units<T, R, F>(parallel: bool, items: &[T], f: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        if parallel {
            return items.par_iter().map(f).collect();
        }
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    items.iter().map(f).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_preserved() {
        let items: Vec<u32> = (0..1_000).collect();
        let sequential = map_units(false, &items, |x| x * 2);
        let parallel = map_units(true, &items, |x| x * 2);
        assert_eq!(sequential, parallel);
        assert_eq!(sequential[999], 1_998);
    }
}
