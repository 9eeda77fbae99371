//! Position-based lag of a series.

/// Shift `values` back by `periods` positions.
///
/// The value at index `i` of the result is `values[i - periods]`, and `None`
/// for the first `periods` positions. A lag of zero returns the series as-is.
pub fn lagged(values: &[f64], periods: usize) -> Vec<Option<f64>> {
    (0..values.len())
        .map(|i| i.checked_sub(periods).map(|j| values[j]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lagged_shifts_by_position() {
        let values = vec![20.0, 18.0, 22.0, 19.0];

        assert_eq!(
            lagged(&values, 1),
            vec![None, Some(20.0), Some(18.0), Some(22.0)]
        );
        assert_eq!(lagged(&values, 3), vec![None, None, None, Some(20.0)]);
    }

    #[test]
    fn test_lag_longer_than_series() {
        let values = vec![1.0, 2.0];
        assert_eq!(lagged(&values, 7), vec![None, None]);
        assert!(lagged(&[], 1).is_empty());
    }

    #[test]
    fn test_zero_lag_is_identity() {
        let values = vec![3.0, 4.0];
        assert_eq!(lagged(&values, 0), vec![Some(3.0), Some(4.0)]);
    }
}
