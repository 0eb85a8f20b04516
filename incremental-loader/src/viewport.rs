use crate::ProximityHandler;

/// The UI region a [`crate::Loader`] renders into.
///
/// Offsets are in the adapter's own units (pixels, rows, cells). Only their differences matter:
/// the near-bottom heuristic compares the affordance's top against the viewport's top.
///
/// Implementations must not call back into the loader (e.g. fire the bound handler) from inside
/// these methods; the loader is mid-update while it calls them and such events are ignored.
pub trait Viewport<C> {
    fn append_content(&mut self, content: C);

    /// Attaches the "loading" affordance after the current content.
    fn show_loading_affordance(&mut self);

    fn remove_loading_affordance(&mut self);

    fn has_loading_affordance(&self) -> bool;

    /// Top offset of the loading affordance, or `None` when it is not attached.
    fn loading_affordance_top(&self) -> Option<i64>;

    fn viewport_top(&self) -> i64;

    fn viewport_height(&self) -> u32;

    /// Stores `handler`; the adapter calls [`ProximityHandler::on_scroll`] on scroll events
    /// until the binding is released.
    fn bind_proximity_handler(&mut self, handler: ProximityHandler);

    fn unbind_proximity_handler(&mut self);

    /// Drops all appended content. Used by [`crate::Loader::replace_data`].
    fn clear_content(&mut self) {}
}

/// Returns `true` when the loading affordance is attached and its top lies within one viewport
/// height of the viewport's top (it is about to enter, or has entered, the visible area).
pub fn is_affordance_near<C, V: Viewport<C> + ?Sized>(viewport: &V) -> bool {
    if !viewport.has_loading_affordance() {
        return false;
    }
    let Some(top) = viewport.loading_affordance_top() else {
        return false;
    };
    let distance = top.saturating_sub(viewport.viewport_top());
    distance < i64::from(viewport.viewport_height())
}
