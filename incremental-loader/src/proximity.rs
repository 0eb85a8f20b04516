use alloc::rc::Weak;

use crate::LoadStatus;

pub(crate) trait ProximityTarget {
    fn fire(&self) -> LoadStatus;
    fn on_scroll(&self) -> Option<LoadStatus>;
}

/// The near-bottom trigger a loader binds to its viewport while items remain.
///
/// Each handler is scoped to the loader that created it, so independent loaders on different
/// regions never interfere. Handlers hold a weak reference: once the loader is dropped, every
/// method returns `None`.
#[derive(Clone)]
pub struct ProximityHandler {
    target: Weak<dyn ProximityTarget>,
}

impl ProximityHandler {
    pub(crate) fn new(target: Weak<dyn ProximityTarget>) -> Self {
        Self { target }
    }

    /// Call this on scroll/intersection events while the handler is bound.
    ///
    /// Loads the next page when the loading affordance is near the visible area. Returns `None`
    /// when the affordance is not near, the trigger is not bound, or the loader is gone.
    pub fn on_scroll(&self) -> Option<LoadStatus> {
        self.target.upgrade()?.on_scroll()
    }

    /// Requests the next page regardless of geometry.
    pub fn fire(&self) -> Option<LoadStatus> {
        Some(self.target.upgrade()?.fire())
    }

    /// Returns `true` while the owning loader is alive.
    pub fn is_attached(&self) -> bool {
        self.target.strong_count() > 0
    }

    /// Returns `true` if both handlers belong to the same loader.
    pub fn same_loader(&self, other: &ProximityHandler) -> bool {
        Weak::ptr_eq(&self.target, &other.target)
    }
}

impl core::fmt::Debug for ProximityHandler {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ProximityHandler")
            .field("attached", &self.is_attached())
            .finish()
    }
}
