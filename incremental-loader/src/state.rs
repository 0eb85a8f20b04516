use crate::PageRange;

/// A lightweight, serializable snapshot of a loader's progress.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoaderState {
    pub len: usize,
    pub cursor: usize,
    pub page_size: usize,
    pub generation: u64,
    pub in_flight: Option<PageRange>,
    pub trigger_bound: bool,
}

impl LoaderState {
    pub fn remaining(&self) -> usize {
        self.len.saturating_sub(self.cursor)
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.len
    }

    /// Number of pages already rendered for the current collection.
    pub fn pages_loaded(&self) -> usize {
        if self.page_size == 0 {
            return 0;
        }
        self.cursor.div_ceil(self.page_size)
    }
}
