use alloc::rc::Rc;
use alloc::vec::Vec;
use core::fmt;

use incremental_loader::{ProximityHandler, Viewport};

use crate::ScrollSurface;

/// A serializable snapshot of a [`MemoryViewport`]'s scroll geometry.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`, so a scroll position
/// can be saved and restored with [`MemoryViewport::restore_metrics`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewportMetrics {
    pub scroll_top: u64,
    pub height: u32,
    pub content_height: u64,
    pub affordance: bool,
}

/// A headless [`Viewport`] that stores appended content and simulates a vertical scroll
/// container.
///
/// Layout: blocks are stacked top to bottom, each `measure(&block)` units tall, followed by the
/// loading affordance (`affordance_height` units) when it is shown. The visible window starts at
/// `scroll_top` and is `height` units tall. `origin` is the window's top in page coordinates.
pub struct MemoryViewport<C> {
    blocks: Vec<C>,
    content_height: u64,
    measure: Rc<dyn Fn(&C) -> u32>,
    affordance: bool,
    affordance_height: u32,
    origin: i64,
    height: u32,
    scroll_top: u64,
    handler: Option<ProximityHandler>,
    bind_count: usize,
}

impl<C> MemoryViewport<C> {
    /// Creates an empty viewport `height` units tall where every block is one unit tall.
    pub fn new(height: u32) -> Self {
        Self {
            blocks: Vec::new(),
            content_height: 0,
            measure: Rc::new(|_: &C| 1),
            affordance: false,
            affordance_height: 1,
            origin: 0,
            height,
            scroll_top: 0,
            handler: None,
            bind_count: 0,
        }
    }

    /// Sets how tall each appended block is.
    ///
    /// Only affects blocks appended afterwards.
    pub fn with_measure(mut self, measure: impl Fn(&C) -> u32 + 'static) -> Self {
        self.measure = Rc::new(measure);
        self
    }

    pub fn with_affordance_height(mut self, affordance_height: u32) -> Self {
        self.affordance_height = affordance_height;
        self
    }

    pub fn with_origin(mut self, origin: i64) -> Self {
        self.origin = origin;
        self
    }

    pub fn blocks(&self) -> &[C] {
        &self.blocks
    }

    pub fn into_blocks(self) -> Vec<C> {
        self.blocks
    }

    pub fn content_height(&self) -> u64 {
        self.content_height
    }

    /// Content height plus the affordance, when shown.
    pub fn total_height(&self) -> u64 {
        if self.affordance {
            self.content_height
                .saturating_add(self.affordance_height as u64)
        } else {
            self.content_height
        }
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn scroll_top(&self) -> u64 {
        self.scroll_top
    }

    pub fn max_scroll_top(&self) -> u64 {
        self.total_height().saturating_sub(self.height as u64)
    }

    pub fn set_scroll_top(&mut self, top: u64) {
        self.scroll_top = top.min(self.max_scroll_top());
    }

    pub fn scroll_by(&mut self, delta: i64) {
        let top = if delta >= 0 {
            self.scroll_top.saturating_add(delta as u64)
        } else {
            self.scroll_top.saturating_sub(delta.unsigned_abs())
        };
        self.set_scroll_top(top);
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_top = self.max_scroll_top();
    }

    pub fn set_height(&mut self, height: u32) {
        self.height = height;
        self.set_scroll_top(self.scroll_top);
    }

    pub fn metrics(&self) -> ViewportMetrics {
        ViewportMetrics {
            scroll_top: self.scroll_top,
            height: self.height,
            content_height: self.content_height,
            affordance: self.affordance,
        }
    }

    /// Restores height and scroll position from a snapshot, clamped to the current content.
    ///
    /// Content and the affordance are owned by the loader and are left as they are.
    pub fn restore_metrics(&mut self, metrics: ViewportMetrics) {
        self.height = metrics.height;
        self.set_scroll_top(metrics.scroll_top);
    }

    pub fn is_bound(&self) -> bool {
        self.handler.is_some()
    }

    pub fn bound_handler(&self) -> Option<&ProximityHandler> {
        self.handler.as_ref()
    }

    /// How many times a loader has bound its proximity handler.
    pub fn bind_count(&self) -> usize {
        self.bind_count
    }
}

impl<C> Viewport<C> for MemoryViewport<C> {
    fn append_content(&mut self, content: C) {
        let h = (self.measure)(&content);
        self.content_height = self.content_height.saturating_add(h as u64);
        self.blocks.push(content);
    }

    fn show_loading_affordance(&mut self) {
        self.affordance = true;
    }

    fn remove_loading_affordance(&mut self) {
        self.affordance = false;
    }

    fn has_loading_affordance(&self) -> bool {
        self.affordance
    }

    fn loading_affordance_top(&self) -> Option<i64> {
        if !self.affordance {
            return None;
        }
        let rel = self.content_height as i64 - self.scroll_top as i64;
        Some(self.origin.saturating_add(rel))
    }

    fn viewport_top(&self) -> i64 {
        self.origin
    }

    fn viewport_height(&self) -> u32 {
        self.height
    }

    fn bind_proximity_handler(&mut self, handler: ProximityHandler) {
        self.bind_count = self.bind_count.saturating_add(1);
        self.handler = Some(handler);
    }

    fn unbind_proximity_handler(&mut self) {
        self.handler = None;
    }

    fn clear_content(&mut self) {
        self.blocks.clear();
        self.content_height = 0;
        self.scroll_top = 0;
    }
}

impl<C> ScrollSurface for MemoryViewport<C> {
    fn scroll_top(&self) -> u64 {
        MemoryViewport::scroll_top(self)
    }

    fn set_scroll_top(&mut self, top: u64) {
        MemoryViewport::set_scroll_top(self, top);
    }

    fn max_scroll_top(&self) -> u64 {
        MemoryViewport::max_scroll_top(self)
    }

    fn set_viewport_height(&mut self, height: u32) {
        self.set_height(height);
    }

    fn proximity_handler(&self) -> Option<ProximityHandler> {
        self.handler.clone()
    }
}

impl<C: fmt::Debug> fmt::Debug for MemoryViewport<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryViewport")
            .field("blocks", &self.blocks)
            .field("content_height", &self.content_height)
            .field("affordance", &self.affordance)
            .field("origin", &self.origin)
            .field("height", &self.height)
            .field("scroll_top", &self.scroll_top)
            .field("bound", &self.handler.is_some())
            .finish_non_exhaustive()
    }
}
