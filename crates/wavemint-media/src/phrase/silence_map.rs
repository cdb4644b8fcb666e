//! Lookups over a sorted, merged silence map.

use wavemint_models::SilenceInterval;

/// Read-only view over silences sorted by start and non-overlapping.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SilenceMap<'a> {
    intervals: &'a [SilenceInterval],
}

impl<'a> SilenceMap<'a> {
    pub(crate) fn new(intervals: &'a [SilenceInterval]) -> Self {
        Self { intervals }
    }

    /// The interval strictly enclosing `t`, if any.
    pub(crate) fn enclosing(&self, t: f64) -> Option<SilenceInterval> {
        let idx = self.intervals.partition_point(|s| s.start < t);
        idx.checked_sub(1)
            .map(|i| self.intervals[i])
            .filter(|s| s.encloses(t))
    }

    /// The interval a clip starting at `t` would open inside: `start <= t < end`.
    pub(crate) fn opening_at(&self, t: f64) -> Option<SilenceInterval> {
        let idx = self.intervals.partition_point(|s| s.start <= t);
        idx.checked_sub(1)
            .map(|i| self.intervals[i])
            .filter(|s| t < s.end)
    }
}

/// Edges of `silence` ordered by distance from `t`; ties favour the start edge.
pub(crate) fn edges_by_distance(silence: SilenceInterval, t: f64) -> [f64; 2] {
    if (silence.end - t).abs() < (t - silence.start).abs() {
        [silence.end, silence.start]
    } else {
        [silence.start, silence.end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(start: f64, end: f64) -> SilenceInterval {
        SilenceInterval::new(start, end).unwrap()
    }

    #[test]
    fn test_enclosing_is_strict() {
        let intervals = [iv(1.0, 2.0), iv(5.0, 7.0)];
        let map = SilenceMap::new(&intervals);

        assert_eq!(map.enclosing(1.5), Some(iv(1.0, 2.0)));
        assert_eq!(map.enclosing(6.0), Some(iv(5.0, 7.0)));
        assert_eq!(map.enclosing(1.0), None);
        assert_eq!(map.enclosing(2.0), None);
        assert_eq!(map.enclosing(3.0), None);
        assert_eq!(map.enclosing(0.0), None);
        assert_eq!(map.enclosing(9.0), None);
    }

    #[test]
    fn test_opening_at_includes_start_edge() {
        let intervals = [iv(1.0, 2.0)];
        let map = SilenceMap::new(&intervals);

        assert_eq!(map.opening_at(1.0), Some(iv(1.0, 2.0)));
        assert_eq!(map.opening_at(1.9), Some(iv(1.0, 2.0)));
        assert_eq!(map.opening_at(2.0), None);
        assert_eq!(map.opening_at(0.5), None);
    }

    #[test]
    fn test_edges_by_distance() {
        assert_eq!(edges_by_distance(iv(10.0, 14.0), 11.0), [10.0, 14.0]);
        assert_eq!(edges_by_distance(iv(10.0, 14.0), 13.0), [14.0, 10.0]);
        assert_eq!(edges_by_distance(iv(10.0, 14.0), 12.0), [10.0, 14.0]);
    }
}
