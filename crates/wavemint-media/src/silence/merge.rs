//! Coalescing of overlapping or nearly touching silence intervals.

use wavemint_models::SilenceInterval;

/// Sort by start and merge intervals separated by at most `tolerance` seconds.
///
/// The result is sorted, non-overlapping, and no two consecutive intervals
/// are within `tolerance` of each other.
pub fn merge_silences(mut intervals: Vec<SilenceInterval>, tolerance: f64) -> Vec<SilenceInterval> {
    intervals.sort_by(|a, b| a.start.total_cmp(&b.start));

    let mut merged: Vec<SilenceInterval> = Vec::with_capacity(intervals.len());
    for candidate in intervals {
        match merged.last_mut() {
            Some(running) if candidate.start <= running.end + tolerance => {
                running.end = running.end.max(candidate.end);
            }
            _ => merged.push(candidate),
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(start: f64, end: f64) -> SilenceInterval {
        SilenceInterval::new(start, end).unwrap()
    }

    #[test]
    fn test_gap_within_tolerance_merges() {
        let merged = merge_silences(vec![iv(1.0, 2.0), iv(2.05, 3.0)], 0.1);
        assert_eq!(merged, vec![iv(1.0, 3.0)]);
    }

    #[test]
    fn test_gap_beyond_tolerance_kept_apart() {
        let merged = merge_silences(vec![iv(1.0, 2.0), iv(2.5, 3.0)], 0.1);
        assert_eq!(merged, vec![iv(1.0, 2.0), iv(2.5, 3.0)]);
    }

    #[test]
    fn test_unsorted_and_contained_intervals() {
        let intervals = vec![iv(8.0, 9.0), iv(1.0, 5.0), iv(2.0, 3.0), iv(4.5, 6.0)];
        let merged = merge_silences(intervals, 0.1);
        assert_eq!(merged, vec![iv(1.0, 6.0), iv(8.0, 9.0)]);
    }

    #[test]
    fn test_empty() {
        assert!(merge_silences(Vec::new(), 0.1).is_empty());
    }

    #[test]
    fn test_result_invariants() {
        let input: Vec<SilenceInterval> = (0..40)
            .map(|i| {
                let start = ((i * 37) % 50) as f64 * 0.31;
                iv(start, start + 0.05 + (i % 4) as f64 * 0.2)
            })
            .collect();
        let merged = merge_silences(input, 0.1);

        for pair in merged.windows(2) {
            assert!(pair[0].start <= pair[1].start);
            assert!(pair[1].start > pair[0].end + 0.1);
        }
    }
}
