use std::collections::HashMap;
use std::hash::Hash;

/// Stable deduplication with an inverse map.
///
/// Returns the distinct items in first-seen order and, for every input
/// position, the slot of its distinct item, so that
/// `unique[inverse[i]] == items[i]`.
pub fn unique_with_inverse<T: Copy + Eq + Hash>(items: &[T]) -> (Vec<T>, Vec<usize>) {
    let mut slots: HashMap<T, usize> = HashMap::with_capacity(items.len());
    let mut unique = Vec::new();
    let inverse = items
        .iter()
        .map(|item| {
            *slots.entry(*item).or_insert_with(|| {
                unique.push(*item);
                unique.len() - 1
            })
        })
        .collect();
    (unique, inverse)
}

/// Broadcast per-unique values back to the original rows.
pub fn broadcast<T: Copy>(values: &[T], inverse: &[usize]) -> Vec<T> {
    inverse.iter().map(|&slot| values[slot]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_preserves_first_seen_order() {
        let items = [[1, 2, 3], [0, 0, 1], [1, 2, 3], [5, 5, 5], [0, 0, 1]];
        let (unique, inverse) = unique_with_inverse(&items);
        assert_eq!(unique, vec![[1, 2, 3], [0, 0, 1], [5, 5, 5]]);
        assert_eq!(inverse, vec![0, 1, 0, 2, 1]);
        assert_eq!(broadcast(&unique, &inverse), items.to_vec());
    }

    #[test]
    fn test_unique_of_empty_input() {
        let (unique, inverse) = unique_with_inverse::<u8>(&[]);
        assert!(unique.is_empty());
        assert!(inverse.is_empty());
    }
}
