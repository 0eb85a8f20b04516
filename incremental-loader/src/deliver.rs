use alloc::rc::Weak;

use crate::PageRange;

/// Identifies one render request: the collection generation it was issued against and the page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Ticket {
    pub(crate) generation: u64,
    pub(crate) page: PageRange,
}

pub(crate) trait DeliveryTarget<C> {
    fn complete(&self, ticket: Ticket, content: C) -> bool;
    fn generation(&self) -> u64;
}

/// Single-shot completion handle handed to a renderer.
///
/// Calling [`Deliver::deliver`] consumes the handle, so a page can be completed at most once.
/// The handle does not keep the loader alive; delivering after the loader was dropped, or after
/// [`crate::Loader::set_data`] replaced the collection, is a no-op that returns `false`.
pub struct Deliver<C> {
    target: Weak<dyn DeliveryTarget<C>>,
    ticket: Ticket,
    delivered: bool,
}

impl<C> Deliver<C> {
    pub(crate) fn new(target: Weak<dyn DeliveryTarget<C>>, ticket: Ticket) -> Self {
        Self {
            target,
            ticket,
            delivered: false,
        }
    }

    pub fn page(&self) -> PageRange {
        self.ticket.page
    }

    /// Index of the first item of the page.
    pub fn start(&self) -> usize {
        self.ticket.page.start_index
    }

    /// Index one past the last item of the page.
    pub fn end(&self) -> usize {
        self.ticket.page.end_index
    }

    /// Number of items in the page.
    pub fn len(&self) -> usize {
        self.ticket.page.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticket.page.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.ticket.generation
    }

    /// Returns `false` once the loader is gone or its collection has been replaced, i.e. when
    /// delivering would be discarded.
    pub fn is_current(&self) -> bool {
        self.target
            .upgrade()
            .is_some_and(|t| t.generation() == self.ticket.generation)
    }

    /// Hands the rendered content to the loader.
    ///
    /// Returns `true` when the content was accepted, `false` when it was discarded as stale. If
    /// the loader is borrowed at that moment (e.g. a `viewport()` guard is alive), the content is
    /// parked and applied by the next `load_more`, proximity event or [`crate::Loader::flush`].
    pub fn deliver(mut self, content: C) -> bool {
        self.delivered = true;
        let Some(target) = self.target.upgrade() else {
            ldebug!(
                start = self.ticket.page.start_index,
                "Deliver: loader dropped; content discarded"
            );
            return false;
        };
        target.complete(self.ticket, content)
    }
}

impl<C> Drop for Deliver<C> {
    fn drop(&mut self) {
        if !self.delivered && self.is_current() {
            lwarn!(
                start = self.ticket.page.start_index,
                end = self.ticket.page.end_index,
                "Deliver dropped without content; loader stays in flight until set_data"
            );
        }
    }
}

impl<C> core::fmt::Debug for Deliver<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Deliver")
            .field("generation", &self.ticket.generation)
            .field("page", &self.ticket.page)
            .field("delivered", &self.delivered)
            .finish()
    }
}
