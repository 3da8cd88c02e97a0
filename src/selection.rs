//! Position-keyed selection over the currently displayed records.

use crate::error::{Error, Result};
use std::collections::BTreeSet;

/// Selected positions of one view
///
/// Positions are zero-based indexes into the displayed list and are only
/// meaningful for one load; [`reset`](Self::reset) must be called whenever
/// the list is replaced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionSet {
    selected: BTreeSet<usize>,
    len: usize,
}

impl SelectionSet {
    /// Empty selection over `len` records
    pub fn new(len: usize) -> Self {
        Self {
            selected: BTreeSet::new(),
            len,
        }
    }

    /// Forget every position and bind to a new list length
    pub fn reset(&mut self, len: usize) {
        self.selected.clear();
        self.len = len;
    }

    /// Number of records the positions refer to
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the underlying list is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of selected positions
    pub fn count(&self) -> usize {
        self.selected.len()
    }

    /// Whether nothing is selected
    pub fn is_none_selected(&self) -> bool {
        self.selected.is_empty()
    }

    /// Whether `position` is selected
    pub fn contains(&self, position: usize) -> bool {
        self.selected.contains(&position)
    }

    /// Whether every position of a non-empty list is selected
    pub fn is_all_selected(&self) -> bool {
        self.len > 0 && self.selected.len() == self.len
    }

    /// Flip `position`; returns whether it is selected afterwards
    pub fn toggle(&mut self, position: usize) -> Result<bool> {
        if position >= self.len {
            return Err(Error::InvalidPosition {
                position,
                len: self.len,
            });
        }
        if self.selected.remove(&position) {
            Ok(false)
        } else {
            self.selected.insert(position);
            Ok(true)
        }
    }

    /// Select everything, or clear when everything is already selected
    ///
    /// Returns whether positions are selected afterwards.
    pub fn toggle_all(&mut self) -> bool {
        if self.is_all_selected() {
            self.selected.clear();
            false
        } else {
            self.selected = (0..self.len).collect();
            self.len > 0
        }
    }

    /// Selected positions in ascending order
    pub fn positions(&self) -> Vec<usize> {
        self.selected.iter().copied().collect()
    }

    /// Selected records of `records`, in ascending position order
    pub fn pick<'a, T>(&self, records: &'a [T]) -> Vec<&'a T> {
        self.selected
            .iter()
            .filter_map(|&position| records.get(position))
            .collect()
    }
}
