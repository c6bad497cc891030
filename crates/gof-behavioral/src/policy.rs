//! Strategy: sorting algorithms behind one interface, chosen at runtime.

use tracing::debug;

use crate::error::{BehavioralError, Result};

pub trait SortPolicy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Sort `data` ascending in place.
    fn sort(&self, data: &mut [i32]);
}

/// Bubbles the smallest remaining value to the front on each pass and stops
/// after a pass without swaps.
#[derive(Clone, Copy, Debug, Default)]
pub struct BubbleSort;

impl SortPolicy for BubbleSort {
    fn name(&self) -> &'static str {
        "BubbleSort"
    }

    fn sort(&self, data: &mut [i32]) {
        let mut passes = 0;
        loop {
            let mut changed = false;
            for i in (1..data.len()).rev() {
                if data[i - 1] > data[i] {
                    data.swap(i - 1, i);
                    changed = true;
                }
            }
            passes += 1;
            if !changed {
                break;
            }
        }
        debug!(len = data.len(), passes, "bubble sort");
    }
}

/// Swaps the minimum of the unsorted tail into place, one position at a
/// time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SelectionSort;

impl SortPolicy for SelectionSort {
    fn name(&self) -> &'static str {
        "SelectSort"
    }

    fn sort(&self, data: &mut [i32]) {
        for i in 0..data.len().saturating_sub(1) {
            let min = (i + 1..data.len())
                .min_by_key(|&j| data[j])
                .unwrap_or(i);
            if data[min] < data[i] {
                data.swap(i, min);
            }
        }
        debug!(len = data.len(), "selection sort");
    }
}

/// Look up a policy by its short name: `bubble` or `selection`.
pub fn policy_by_name(name: &str) -> Result<Box<dyn SortPolicy>> {
    match name.trim().to_ascii_lowercase().as_str() {
        "bubble" => Ok(Box::new(BubbleSort)),
        "selection" | "select" => Ok(Box::new(SelectionSort)),
        other => Err(BehavioralError::UnknownPolicy(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn policies() -> Vec<Box<dyn SortPolicy>> {
        vec![Box::new(BubbleSort), Box::new(SelectionSort)]
    }

    #[test]
    fn sorts_small_inputs() {
        for policy in policies() {
            let mut data = [5, 3, 9, 1, 3, 0];
            policy.sort(&mut data);
            assert_eq!(data, [0, 1, 3, 3, 5, 9], "{}", policy.name());

            let mut empty: [i32; 0] = [];
            policy.sort(&mut empty);
            let mut one = [4];
            policy.sort(&mut one);
            assert_eq!(one, [4]);
        }
    }

    #[test]
    fn lookup_by_name() {
        assert_eq!(policy_by_name("bubble").unwrap().name(), "BubbleSort");
        assert_eq!(policy_by_name(" Selection ").unwrap().name(), "SelectSort");
        assert!(matches!(
            policy_by_name("quick"),
            Err(BehavioralError::UnknownPolicy(ref n)) if n == "quick"
        ));
    }

    proptest! {
        #[test]
        fn both_policies_agree_with_std(data in prop::collection::vec(any::<i32>(), 0..64)) {
            let mut expected = data.clone();
            expected.sort();
            for policy in policies() {
                let mut actual = data.clone();
                policy.sort(&mut actual);
                prop_assert_eq!(&actual, &expected);
            }
        }
    }
}
