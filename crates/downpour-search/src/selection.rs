//! Page-scoped selection of search results for batch operations.

use std::collections::HashSet;

use downpour_core::SearchResult;

/// Tracks which results on the current page are marked for a batch action.
///
/// The owner is responsible for clearing the selection whenever the result
/// set changes identity (new search, new page, new filters); ids are only
/// unique within a single response.
#[derive(Debug, Default)]
pub struct SelectionManager {
    selected: HashSet<String>,
}

impl SelectionManager {
    /// Create an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip one result's membership; returns whether it is now selected.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.selected.remove(id) {
            false
        } else {
            self.selected.insert(id.to_string());
            true
        }
    }

    /// Select every displayed result, unless everything is already
    /// selected, in which case the selection is cleared instead (the
    /// toggle-off behaviour of a "select all" button at the boundary).
    pub fn select_all(&mut self, results: &[SearchResult]) {
        let everything_selected = !results.is_empty()
            && self.selected.len() == results.len()
            && results.iter().all(|result| self.selected.contains(&result.id));
        if everything_selected {
            self.selected.clear();
        } else {
            self.selected = results.iter().map(|result| result.id.clone()).collect();
        }
    }

    /// Drop the whole selection.
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Whether the given result id is selected.
    #[must_use]
    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    /// Selected ids in a stable (sorted) order.
    #[must_use]
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.selected.iter().cloned().collect();
        ids.sort();
        ids
    }

    /// Number of selected results.
    #[must_use]
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Whether nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}
