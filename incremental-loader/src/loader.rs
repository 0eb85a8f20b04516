use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::{Cell, Ref, RefCell, RefMut};

use crate::deliver::{DeliveryTarget, Ticket};
use crate::proximity::ProximityTarget;
use crate::{
    Deliver, LoadStatus, LoaderOptions, LoaderState, OnLoadedCallback, PageRange,
    ProximityHandler, RenderFn, Viewport, is_affordance_near,
};

struct Core<T, V> {
    items: Rc<[T]>,
    cursor: usize,
    in_flight: Option<PageRange>,
    trigger_bound: bool,
    viewport: V,
}

impl<T, V> Core<T, V> {
    fn unbind_trigger<C>(&mut self)
    where
        V: Viewport<C>,
    {
        self.viewport.unbind_proximity_handler();
        self.trigger_bound = false;
    }

    fn apply_content<C>(&mut self, content: C, handler: ProximityHandler)
    where
        V: Viewport<C>,
    {
        if self.viewport.has_loading_affordance() {
            self.viewport.remove_loading_affordance();
        }
        self.viewport.append_content(content);

        if self.cursor < self.items.len() {
            self.viewport.show_loading_affordance();
            self.viewport.bind_proximity_handler(handler);
            self.trigger_bound = true;
        } else {
            self.trigger_bound = false;
        }
    }
}

enum Completion {
    Applied,
    Parked,
    Discarded,
}

struct Shared<T, C, V> {
    core: RefCell<Core<T, V>>,
    /// Content delivered while `core` was borrowed, applied on the next entry.
    parked: RefCell<Option<(Ticket, C)>>,
    generation: Cell<u64>,
    page_size: usize,
    render: RenderFn<T, C>,
    on_loaded: Option<OnLoadedCallback>,
    this: Weak<Self>,
}

impl<T: 'static, C: 'static, V: Viewport<C> + 'static> Shared<T, C, V> {
    fn handler(&self) -> ProximityHandler {
        let target: Weak<dyn ProximityTarget> = self.this.clone();
        ProximityHandler::new(target)
    }

    fn flush_parked(&self) -> Option<PageRange> {
        let (ticket, content) = self.parked.borrow_mut().take()?;
        match self.finish_page(ticket, content) {
            Completion::Applied => Some(ticket.page),
            Completion::Parked | Completion::Discarded => None,
        }
    }

    fn request_page(&self) -> LoadStatus {
        if let Some(page) = self.flush_parked() {
            return LoadStatus::Loaded(page);
        }
        let Ok(mut core) = self.core.try_borrow_mut() else {
            lwarn!("load_more: called while the loader is updating; ignored");
            return LoadStatus::Busy;
        };
        if core.in_flight.is_some() {
            ltrace!(in_flight = ?core.in_flight, "load_more: render in flight");
            return LoadStatus::Busy;
        }

        let start = core.cursor;
        let end = start.saturating_add(self.page_size).min(core.items.len());
        if start >= end {
            // A trigger left over from a previous collection must not outlive this one.
            if core.trigger_bound || core.viewport.has_loading_affordance() {
                ldebug!(start, "load_more: exhausted; releasing proximity trigger");
                core.unbind_trigger::<C>();
                if core.viewport.has_loading_affordance() {
                    core.viewport.remove_loading_affordance();
                }
            }
            return LoadStatus::Exhausted;
        }
        let page = PageRange {
            start_index: start,
            end_index: end,
        };

        // No proximity event may start a second render before this one is applied.
        core.unbind_trigger::<C>();
        core.in_flight = Some(page);
        let items = Rc::clone(&core.items);
        drop(core);

        let generation = self.generation.get();
        ldebug!(start, end, generation, "load_more: rendering page");
        let target: Weak<dyn DeliveryTarget<C>> = self.this.clone();
        let deliver = Deliver::new(target, Ticket { generation, page });
        (self.render)(&items[start..end], start, deliver);

        // The cursor only reaches `end` once this page has been applied.
        let delivered =
            self.generation.get() == generation && self.core.borrow().cursor >= end;
        if delivered {
            LoadStatus::Loaded(page)
        } else {
            LoadStatus::Pending(page)
        }
    }

    fn finish_page(&self, ticket: Ticket, content: C) -> Completion {
        if ticket.generation != self.generation.get() {
            ldebug!(
                start = ticket.page.start_index,
                stale = ticket.generation,
                current = self.generation.get(),
                "deliver: stale generation; content discarded"
            );
            return Completion::Discarded;
        }
        let handler = self.handler();
        let Ok(mut core) = self.core.try_borrow_mut() else {
            ldebug!(
                start = ticket.page.start_index,
                "deliver: loader is borrowed; parking content"
            );
            *self.parked.borrow_mut() = Some((ticket, content));
            return Completion::Parked;
        };
        if core.in_flight != Some(ticket.page) {
            lwarn!(
                start = ticket.page.start_index,
                "deliver: page is not in flight; content discarded"
            );
            return Completion::Discarded;
        }

        let previous = core.cursor;
        core.cursor = ticket.page.end_index;
        core.in_flight = None;
        core.apply_content(content, handler);
        let count = core.cursor - previous;
        ltrace!(
            count,
            remaining = core.items.len() - core.cursor,
            "deliver: page applied"
        );
        drop(core);

        if let Some(cb) = &self.on_loaded {
            cb(count);
        }
        Completion::Applied
    }
}

impl<T: 'static, C: 'static, V: Viewport<C> + 'static> DeliveryTarget<C> for Shared<T, C, V> {
    fn complete(&self, ticket: Ticket, content: C) -> bool {
        !matches!(self.finish_page(ticket, content), Completion::Discarded)
    }

    fn generation(&self) -> u64 {
        self.generation.get()
    }
}

impl<T: 'static, C: 'static, V: Viewport<C> + 'static> ProximityTarget for Shared<T, C, V> {
    fn fire(&self) -> LoadStatus {
        self.request_page()
    }

    fn on_scroll(&self) -> Option<LoadStatus> {
        if let Some(page) = self.flush_parked() {
            return Some(LoadStatus::Loaded(page));
        }
        let near = {
            let Ok(core) = self.core.try_borrow() else {
                return Some(LoadStatus::Busy);
            };
            if !core.trigger_bound {
                return None;
            }
            is_affordance_near::<C, V>(&core.viewport)
        };
        near.then(|| self.request_page())
    }
}

/// Reveals a collection to a [`Viewport`] one page at a time.
///
/// This type is intentionally single-threaded: the renderer and the viewport's proximity handler
/// reach back into the loader through weak references, and at most one page is ever in flight.
///
/// Typical flow:
/// - `set_data(items)` (or `replace_data`) when the collection changes
/// - `load_more()` once for the first page
/// - the viewport calls [`ProximityHandler::on_scroll`] on scroll events while bound
///
/// For a scroll-driven wrapper, see `incremental_loader_adapter::Controller`.
pub struct Loader<T, C, V> {
    shared: Rc<Shared<T, C, V>>,
}

impl<T: 'static, C: 'static, V: Viewport<C> + 'static> Loader<T, C, V> {
    /// Creates an empty loader bound to `viewport`. Nothing is rendered until `load_more`.
    pub fn new(options: LoaderOptions<T, C>, viewport: V) -> Self {
        let page_size = if options.page_size == 0 {
            lwarn!("Loader::new: page_size must be positive; using 1");
            1
        } else {
            options.page_size
        };
        ldebug!(page_size, "Loader::new");
        let shared = Rc::new_cyclic(|this| Shared {
            core: RefCell::new(Core {
                items: Rc::<[T]>::from(Vec::new()),
                cursor: 0,
                in_flight: None,
                trigger_bound: false,
                viewport,
            }),
            parked: RefCell::new(None),
            generation: Cell::new(0),
            page_size,
            render: options.render,
            on_loaded: options.on_loaded,
            this: this.clone(),
        });
        Self { shared }
    }

    /// Creates a loader and assigns its first collection.
    pub fn with_data(options: LoaderOptions<T, C>, viewport: V, items: impl Into<Rc<[T]>>) -> Self {
        let mut loader = Self::new(options, viewport);
        loader.set_data(items);
        loader
    }

    /// Replaces the collection and resets the cursor to zero.
    ///
    /// Nothing is rendered and the viewport is untouched; call `load_more` for the first page.
    /// A render still in flight for the previous collection is abandoned: its late delivery is
    /// discarded.
    pub fn set_data(&mut self, items: impl Into<Rc<[T]>>) {
        let items = items.into();
        let generation = self.shared.generation.get().wrapping_add(1);
        self.shared.generation.set(generation);

        self.shared.parked.borrow_mut().take();
        let mut core = self.shared.core.borrow_mut();
        if core.in_flight.take().is_some() {
            ldebug!("set_data: abandoning in-flight render");
        }
        ldebug!(len = items.len(), generation, "set_data");
        core.items = items;
        core.cursor = 0;
    }

    /// Clears the viewport, assigns a new collection and loads its first page.
    ///
    /// This is the usual reaction to a filter change.
    pub fn replace_data(&mut self, items: impl Into<Rc<[T]>>) -> LoadStatus {
        {
            let mut core = self.shared.core.borrow_mut();
            core.unbind_trigger::<C>();
            if core.viewport.has_loading_affordance() {
                core.viewport.remove_loading_affordance();
            }
            core.viewport.clear_content();
        }
        self.set_data(items);
        self.load_more()
    }

    /// Renders the next page.
    ///
    /// No-op when exhausted or while a render is in flight. The proximity trigger is unbound
    /// before the renderer runs and rebound after the content is applied if items remain.
    pub fn load_more(&self) -> LoadStatus {
        self.shared.request_page()
    }

    /// Unbinds the proximity trigger and removes the loading affordance.
    ///
    /// Use this before handing the region to something else; `load_more` re-arms the loader.
    pub fn detach(&mut self) {
        let mut core = self.shared.core.borrow_mut();
        core.unbind_trigger::<C>();
        if core.viewport.has_loading_affordance() {
            core.viewport.remove_loading_affordance();
        }
    }

    /// Applies content that was delivered while the loader was borrowed (e.g. through a live
    /// `viewport()` guard).
    ///
    /// `load_more` and proximity events do this first; adapters without a pending event can call
    /// it directly. Returns the page that was applied.
    pub fn flush(&self) -> Option<PageRange> {
        self.shared.flush_parked()
    }

    /// Returns `true` while delivered content waits for `flush`.
    pub fn has_parked_content(&self) -> bool {
        self.shared.parked.borrow().is_some()
    }

    /// A handler scoped to this loader, identical to the one bound on the viewport.
    pub fn proximity_handler(&self) -> ProximityHandler {
        self.shared.handler()
    }
}

impl<T, C, V> Loader<T, C, V> {
    pub fn page_size(&self) -> usize {
        self.shared.page_size
    }

    pub fn len(&self) -> usize {
        self.shared.core.borrow().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of items already rendered.
    pub fn cursor(&self) -> usize {
        self.shared.core.borrow().cursor
    }

    pub fn remaining(&self) -> usize {
        let core = self.shared.core.borrow();
        core.items.len() - core.cursor
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// Returns `true` while a render is in flight.
    pub fn is_loading(&self) -> bool {
        self.shared.core.borrow().in_flight.is_some()
    }

    pub fn is_trigger_bound(&self) -> bool {
        self.shared.core.borrow().trigger_bound
    }

    pub fn generation(&self) -> u64 {
        self.shared.generation.get()
    }

    /// The full current collection.
    pub fn items(&self) -> Rc<[T]> {
        Rc::clone(&self.shared.core.borrow().items)
    }

    pub fn state(&self) -> LoaderState {
        let core = self.shared.core.borrow();
        LoaderState {
            len: core.items.len(),
            cursor: core.cursor,
            page_size: self.shared.page_size,
            generation: self.shared.generation.get(),
            in_flight: core.in_flight,
            trigger_bound: core.trigger_bound,
        }
    }

    pub fn viewport(&self) -> Ref<'_, V> {
        Ref::map(self.shared.core.borrow(), |core| &core.viewport)
    }

    /// Mutable access to the viewport, e.g. to update scroll geometry.
    ///
    /// Don't bind/unbind handlers or touch the affordance through this; the loader owns those.
    pub fn viewport_mut(&mut self) -> RefMut<'_, V> {
        RefMut::map(self.shared.core.borrow_mut(), |core| &mut core.viewport)
    }
}

impl<T, C, V: core::fmt::Debug> core::fmt::Debug for Loader<T, C, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.shared.core.try_borrow() {
            Ok(core) => f
                .debug_struct("Loader")
                .field("len", &core.items.len())
                .field("cursor", &core.cursor)
                .field("page_size", &self.shared.page_size)
                .field("generation", &self.shared.generation.get())
                .field("in_flight", &core.in_flight)
                .field("trigger_bound", &core.trigger_bound)
                .field("viewport", &core.viewport)
                .finish(),
            Err(_) => f.debug_struct("Loader").finish_non_exhaustive(),
        }
    }
}
