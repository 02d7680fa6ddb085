//! Helpers for the sorted value vectors backing enumerated and set domains.
//! All lookups are tolerance-aware so that fractional values within the
//! configured tolerance of a stored value are treated as present.

use super::DomainValue;
use crate::acorn_assert_moderate;

/// Locates `value` in the sorted slice. `Ok(index)` if a value within
/// tolerance is present, `Err(index)` with the insertion point otherwise.
pub(crate) fn search<T: DomainValue>(values: &[T], value: T, tolerance: T) -> Result<usize, usize> {
    match values.binary_search_by(|probe| probe.total_cmp(value)) {
        Ok(index) => Ok(index),
        Err(index) => {
            if index < values.len() && values[index].eq_within(value, tolerance) {
                Ok(index)
            } else if index > 0 && values[index - 1].eq_within(value, tolerance) {
                Ok(index - 1)
            } else {
                Err(index)
            }
        }
    }
}

pub(crate) fn contains<T: DomainValue>(values: &[T], value: T, tolerance: T) -> bool {
    search(values, value, tolerance).is_ok()
}

/// Inserts `value` keeping the slice sorted. Returns false if an equal value
/// was already present.
pub(crate) fn insert<T: DomainValue>(values: &mut Vec<T>, value: T, tolerance: T) -> bool {
    match search(values, value, tolerance) {
        Ok(_) => false,
        Err(index) => {
            values.insert(index, value);
            acorn_assert_moderate!(is_sorted(values), "insertion broke the sort order");
            true
        }
    }
}

fn is_sorted<T: DomainValue>(values: &[T]) -> bool {
    values
        .windows(2)
        .all(|pair| pair[0].total_cmp(pair[1]) != std::cmp::Ordering::Greater)
}

/// Removes the value equal to `value` within tolerance. Returns false if it
/// was not present.
pub(crate) fn remove<T: DomainValue>(values: &mut Vec<T>, value: T, tolerance: T) -> bool {
    match search(values, value, tolerance) {
        Ok(index) => {
            let _ = values.remove(index);
            true
        }
        Err(_) => false,
    }
}

/// Deduplicates and sorts raw input values for domain construction.
pub(crate) fn normalise<T: DomainValue>(mut values: Vec<T>, tolerance: T) -> Vec<T> {
    values.sort_by(|a, b| a.total_cmp(*b));
    values.dedup_by(|a, b| a.eq_within(*b, tolerance));
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_finds_values_within_tolerance() {
        let values = vec![1.0_f64, 2.0, 3.0];
        assert_eq!(search(&values, 2.0, 1e-9), Ok(1));
        assert_eq!(search(&values, 2.0 + 1e-10, 1e-9), Ok(1));
        assert_eq!(search(&values, 2.5, 1e-9), Err(2));
    }

    #[test]
    fn insert_rejects_duplicates() {
        let mut values = vec![1, 3];
        assert!(insert(&mut values, 2, 0));
        assert!(!insert(&mut values, 2, 0));
        assert_eq!(values, vec![1, 2, 3]);
    }

    #[test]
    fn insertions_at_either_end_keep_the_slice_sorted() {
        let mut values = vec![2.0_f64, 4.0];
        assert!(insert(&mut values, 3.0, 1e-9));
        assert!(insert(&mut values, 0.5, 1e-9));
        assert!(insert(&mut values, 7.0, 1e-9));
        assert_eq!(values, vec![0.5, 2.0, 3.0, 4.0, 7.0]);
    }

    #[test]
    fn normalise_sorts_and_dedups() {
        let values = normalise(vec![3, 1, 2, 1], 0);
        assert_eq!(values, vec![1, 2, 3]);
    }
}
