use super::{round2, TOLERANCE};

/// Replaces near-equal coordinate values with one representative.
///
/// Values are sorted and chained into groups: a value joins the previous
/// group when it lies closer than `tolerance` to that group's largest
/// member. Each group is represented by its most frequent member, ties going
/// to the smaller value. Distinct representatives therefore stay at least
/// `tolerance` apart, which makes snapping idempotent.
#[derive(Debug, Clone)]
pub struct ValueSnapper {
    /// `(value, representative)` pairs sorted by value.
    table: Vec<(f64, f64)>,
}

impl ValueSnapper {
    /// Builds the snapping table from every occurrence of every value.
    #[must_use]
    pub fn new(values: impl IntoIterator<Item = f64>, tolerance: f64) -> Self {
        let mut all: Vec<f64> = values.into_iter().map(round2).collect();
        all.sort_by(f64::total_cmp);

        // Run-length encode into (value, count).
        let mut counted: Vec<(f64, usize)> = Vec::new();
        for v in all {
            match counted.last_mut() {
                Some((last, count)) if (*last - v).abs() <= TOLERANCE => *count += 1,
                _ => counted.push((v, 1)),
            }
        }

        let mut table = Vec::with_capacity(counted.len());
        let mut start = 0;
        while start < counted.len() {
            let mut end = start + 1;
            while end < counted.len() && counted[end].0 - counted[end - 1].0 < tolerance {
                end += 1;
            }
            let group = &counted[start..end];
            // Sorted ascending, so a strict comparison keeps the smaller value on ties.
            let mut best = group[0];
            for &candidate in &group[1..] {
                if candidate.1 > best.1 {
                    best = candidate;
                }
            }
            table.extend(group.iter().map(|&(v, _)| (v, best.0)));
            start = end;
        }

        Self { table }
    }

    /// Returns the representative for `value`, or the rounded value itself
    /// when it was not part of the table.
    #[must_use]
    pub fn snap(&self, value: f64) -> f64 {
        let v = round2(value);
        let idx = self.table.partition_point(|&(k, _)| k < v - TOLERANCE);
        match self.table.get(idx) {
            Some(&(k, rep)) if (k - v).abs() <= TOLERANCE => rep,
            _ => v,
        }
    }

    /// Number of distinct values in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` when no values were collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn most_frequent_value_wins() {
        let snapper = ValueSnapper::new([10.0, 10.0, 10.1, 20.0], 0.2);
        assert_relative_eq!(snapper.snap(10.1), 10.0);
        assert_relative_eq!(snapper.snap(10.0), 10.0);
        assert_relative_eq!(snapper.snap(20.0), 20.0);
    }

    #[test]
    fn ties_go_to_the_smaller_value() {
        let snapper = ValueSnapper::new([5.05, 5.0], 0.2);
        assert_relative_eq!(snapper.snap(5.05), 5.0);
    }

    #[test]
    fn groups_chain_through_close_neighbours() {
        let snapper = ValueSnapper::new([1.0, 1.15, 1.15, 1.3], 0.2);
        assert_relative_eq!(snapper.snap(1.0), 1.15);
        assert_relative_eq!(snapper.snap(1.3), 1.15);
    }

    #[test]
    fn values_at_tolerance_stay_apart() {
        let snapper = ValueSnapper::new([39.04, 39.26], 0.2);
        assert_relative_eq!(snapper.snap(39.04), 39.04);
        assert_relative_eq!(snapper.snap(39.26), 39.26);
    }

    #[test]
    fn snapping_twice_changes_nothing() {
        let raw = [0.0, 0.11, 0.19, 3.0, 3.05, 7.4, 7.5, 7.61, 7.61];
        let once = ValueSnapper::new(raw, 0.2);
        let snapped: Vec<f64> = raw.iter().map(|&v| once.snap(v)).collect();
        let twice = ValueSnapper::new(snapped.iter().copied(), 0.2);
        for &v in &snapped {
            assert_relative_eq!(twice.snap(v), v);
        }
    }

    #[test]
    fn unknown_values_are_rounded() {
        let snapper = ValueSnapper::new(std::iter::empty(), 0.2);
        assert!(snapper.is_empty());
        assert_relative_eq!(snapper.snap(1.234_5), 1.23);
    }
}
