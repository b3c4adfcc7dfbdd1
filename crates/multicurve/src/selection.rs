//! Curve selection state.

use serde::{Deserialize, Serialize};

/// `None` when nothing is selected, otherwise the selected curve indices in
/// the order they were added. Never holds an empty or duplicated set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<Vec<u32>>", into = "Option<Vec<u32>>")]
pub struct Selection(Option<Vec<u32>>);

impl Selection {
    pub fn none() -> Self {
        Self(None)
    }

    /// Build a selection, dropping duplicates. An empty input yields `none`.
    pub fn of(indices: impl IntoIterator<Item = u32>) -> Self {
        let mut unique: Vec<u32> = Vec::new();
        for index in indices {
            if !unique.contains(&index) {
                unique.push(index);
            }
        }
        if unique.is_empty() {
            Self(None)
        } else {
            Self(Some(unique))
        }
    }

    pub fn indices(&self) -> Option<&[u32]> {
        self.0.as_deref()
    }

    pub fn is_none(&self) -> bool {
        self.0.is_none()
    }

    pub fn contains(&self, index: u32) -> bool {
        self.indices().is_some_and(|indices| indices.contains(&index))
    }

    /// Selection after clicking curve `index`.
    ///
    /// Without the accelerator the click replaces the selection. With it the
    /// curve is toggled in or out; removing the last curve yields `none`.
    pub fn apply_click(&self, index: u32, accelerator: bool) -> Selection {
        if !accelerator {
            return Selection::of([index]);
        }
        let current = self.indices().unwrap_or_default();
        if current.contains(&index) {
            Selection::of(current.iter().copied().filter(|i| *i != index))
        } else {
            Selection::of(current.iter().copied().chain([index]))
        }
    }
}

/// Index of the first value not less than `target` in an ascending slice.
pub fn bisect_left(values: &[f64], target: f64) -> usize {
    values.partition_point(|v| *v < target)
}

/// [`bisect_left`] clamped to the last valid index; 0 for an empty slice.
pub fn nearest_index(values: &[f64], target: f64) -> usize {
    bisect_left(values, target).min(values.len().saturating_sub(1))
}

impl From<Option<Vec<u32>>> for Selection {
    fn from(indices: Option<Vec<u32>>) -> Self {
        indices.map(Selection::of).unwrap_or_default()
    }
}

impl From<Selection> for Option<Vec<u32>> {
    fn from(selection: Selection) -> Self {
        selection.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_sequence() {
        let s = Selection::none().apply_click(2, false);
        assert_eq!(s.indices(), Some(&[2][..]));
        let s = s.apply_click(5, true);
        assert_eq!(s.indices(), Some(&[2, 5][..]));
        let s = s.apply_click(2, true);
        assert_eq!(s.indices(), Some(&[5][..]));
        let s = s.apply_click(0, false);
        assert_eq!(s.indices(), Some(&[0][..]));
    }

    #[test]
    fn test_emptied_selection_is_none() {
        let s = Selection::of([3]).apply_click(3, true);
        assert!(s.is_none());
        assert_eq!(Selection::of([]), Selection::none());
    }

    #[test]
    fn test_accelerator_on_empty_selection_adds() {
        assert_eq!(Selection::none().apply_click(4, true), Selection::of([4]));
    }

    #[test]
    fn test_bisect() {
        let xs = [0.0, 10.0, 20.0];
        assert_eq!(bisect_left(&xs, -1.0), 0);
        assert_eq!(bisect_left(&xs, 10.0), 1);
        assert_eq!(bisect_left(&xs, 11.0), 2);
        assert_eq!(bisect_left(&xs, 99.0), 3);
        assert_eq!(nearest_index(&xs, 99.0), 2);
        assert_eq!(nearest_index(&[], 5.0), 0);
    }

    #[test]
    fn test_serde_null_and_dedup() {
        assert_eq!(serde_json::to_string(&Selection::none()).unwrap(), "null");
        let s: Selection = serde_json::from_str("[1,1,2]").unwrap();
        assert_eq!(s.indices(), Some(&[1, 2][..]));
        let empty: Selection = serde_json::from_str("[]").unwrap();
        assert!(empty.is_none());
    }
}
