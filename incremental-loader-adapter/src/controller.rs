use alloc::rc::Rc;
use core::cell::Ref;

use incremental_loader::{LoadStatus, Loader, LoaderOptions, Viewport};

use crate::ScrollSurface;

/// A framework-neutral controller that wraps an `incremental_loader::Loader` and turns UI events
/// into load requests.
///
/// This type does not hold any UI objects. Adapters drive it by calling:
/// - `show(items)` when the collection changes (e.g. a new filter)
/// - `on_scroll` / `on_resize` when UI events occur
/// - `fill(max_pages)` after layout, so a viewport taller than the loaded content keeps loading
///   without waiting for a scroll event that will never come
pub struct Controller<T, C, V> {
    loader: Loader<T, C, V>,
}

impl<T, C, V> Controller<T, C, V>
where
    T: 'static,
    C: 'static,
    V: Viewport<C> + ScrollSurface + 'static,
{
    pub fn new(options: LoaderOptions<T, C>, viewport: V) -> Self {
        Self {
            loader: Loader::new(options, viewport),
        }
    }

    pub fn from_loader(loader: Loader<T, C, V>) -> Self {
        Self { loader }
    }

    pub fn loader(&self) -> &Loader<T, C, V> {
        &self.loader
    }

    pub fn loader_mut(&mut self) -> &mut Loader<T, C, V> {
        &mut self.loader
    }

    pub fn into_loader(self) -> Loader<T, C, V> {
        self.loader
    }

    pub fn viewport(&self) -> Ref<'_, V> {
        self.loader.viewport()
    }

    /// Replaces the collection, clears the viewport and loads the first page.
    pub fn show(&mut self, items: impl Into<Rc<[T]>>) -> LoadStatus {
        self.loader.replace_data(items)
    }

    /// Call this when the UI reports a scroll position change.
    ///
    /// Returns the load status when the scroll brought the loading affordance near the visible
    /// area, `None` otherwise.
    pub fn on_scroll(&mut self, scroll_top: u64) -> Option<LoadStatus> {
        let handler = {
            let mut v = self.loader.viewport_mut();
            v.set_scroll_top(scroll_top);
            v.proximity_handler()
        };
        if let Some(page) = self.loader.flush() {
            return Some(LoadStatus::Loaded(page));
        }
        handler?.on_scroll()
    }

    pub fn scroll_to_bottom(&mut self) -> Option<LoadStatus> {
        let bottom = self.loader.viewport().max_scroll_top();
        self.on_scroll(bottom)
    }

    /// Call this when the viewport is resized; a taller viewport may reveal the affordance.
    pub fn on_resize(&mut self, height: u32) -> Option<LoadStatus> {
        let handler = {
            let mut v = self.loader.viewport_mut();
            v.set_viewport_height(height);
            v.proximity_handler()
        };
        if let Some(page) = self.loader.flush() {
            return Some(LoadStatus::Loaded(page));
        }
        handler?.on_scroll()
    }

    /// Loads pages while the loading affordance is near the visible area, up to `max_pages`.
    ///
    /// Stops early when a page goes pending (the renderer is asynchronous); call again after it
    /// is delivered. Returns the number of pages applied.
    pub fn fill(&mut self, max_pages: usize) -> usize {
        let mut loaded = 0usize;
        if max_pages > 0 && self.loader.flush().is_some() {
            loaded += 1;
        }
        while loaded < max_pages {
            let handler = self.loader.viewport().proximity_handler();
            let Some(handler) = handler else {
                break;
            };
            match handler.on_scroll() {
                Some(LoadStatus::Loaded(_)) => loaded += 1,
                _ => break,
            }
        }
        loaded
    }
}
