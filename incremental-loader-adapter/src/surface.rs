use incremental_loader::ProximityHandler;

/// A viewport whose scroll position the adapter controls.
///
/// [`crate::Controller`] uses this to apply scroll/resize events before asking the bound
/// [`ProximityHandler`] whether the next page is due.
pub trait ScrollSurface {
    fn scroll_top(&self) -> u64;

    /// Sets the scroll position; implementations clamp to `max_scroll_top`.
    fn set_scroll_top(&mut self, top: u64);

    fn max_scroll_top(&self) -> u64;

    fn set_viewport_height(&mut self, height: u32);

    /// The handler currently bound by the loader, if any.
    fn proximity_handler(&self) -> Option<ProximityHandler>;
}
