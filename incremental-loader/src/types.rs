/// A half-open range of item indexes rendered (or being rendered) as one page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageRange {
    pub start_index: usize,
    pub end_index: usize, // exclusive
}

impl PageRange {
    pub fn len(&self) -> usize {
        self.end_index.saturating_sub(self.start_index)
    }

    pub fn is_empty(&self) -> bool {
        self.start_index >= self.end_index
    }
}

/// Outcome of a load request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LoadStatus {
    /// Every item has been rendered; nothing happened.
    Exhausted,
    /// A render is already in flight (or the loader is mid-update); nothing happened.
    Busy,
    /// The renderer delivered before returning and the page was applied to the viewport.
    Loaded(PageRange),
    /// The renderer took a [`crate::Deliver`] handle and will deliver later.
    Pending(PageRange),
}

impl LoadStatus {
    /// The page this request rendered or started rendering, if any.
    pub fn page(&self) -> Option<PageRange> {
        match self {
            Self::Loaded(page) | Self::Pending(page) => Some(*page),
            Self::Exhausted | Self::Busy => None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }
}
