use alloc::collections::VecDeque;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use incremental_loader::{Deliver, LoaderOptions, PageRange};

struct Request<T, C> {
    items: Vec<T>,
    deliver: Deliver<C>,
    ready_at_ms: u64,
}

struct Queue<T, C> {
    requests: VecDeque<Request<T, C>>,
    now_ms: u64,
    delay_ms: u64,
}

/// An asynchronous renderer that parks each page request and completes it later.
///
/// This models a renderer backed by a remote fetch under an event loop: the loader gets a
/// pending page immediately, and the adapter completes requests by calling `tick(now_ms)` (after
/// `delay_ms` has elapsed) or `resolve_next`.
///
/// Clones share the same queue.
pub struct DeferredRenderer<T, C> {
    queue: Rc<RefCell<Queue<T, C>>>,
}

impl<T, C> Clone for DeferredRenderer<T, C> {
    fn clone(&self) -> Self {
        Self {
            queue: Rc::clone(&self.queue),
        }
    }
}

impl<T: Clone + 'static, C: 'static> DeferredRenderer<T, C> {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            queue: Rc::new(RefCell::new(Queue {
                requests: VecDeque::new(),
                now_ms: 0,
                delay_ms,
            })),
        }
    }

    /// The render callback to hand to [`LoaderOptions::new`].
    pub fn render_fn(&self) -> impl Fn(&[T], usize, Deliver<C>) + use<T, C> {
        let queue = Rc::clone(&self.queue);
        move |items: &[T], _start: usize, deliver: Deliver<C>| {
            let mut q = queue.borrow_mut();
            let ready_at_ms = q.now_ms.saturating_add(q.delay_ms);
            q.requests.push_back(Request {
                items: items.to_vec(),
                deliver,
                ready_at_ms,
            });
        }
    }

    pub fn options(&self, page_size: usize) -> LoaderOptions<T, C> {
        LoaderOptions::new(page_size, self.render_fn())
    }

    pub fn len(&self) -> usize {
        self.queue.borrow().requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.borrow().requests.is_empty()
    }

    /// Pages waiting for content, oldest first.
    pub fn pending_pages(&self) -> Vec<PageRange> {
        self.queue
            .borrow()
            .requests
            .iter()
            .map(|r| r.deliver.page())
            .collect()
    }

    /// Completes the oldest request regardless of its delay.
    ///
    /// Returns `None` when nothing is pending, otherwise whether the loader applied the content.
    pub fn resolve_next(&self, render: impl FnOnce(&[T], usize) -> C) -> Option<bool> {
        let request = self.queue.borrow_mut().requests.pop_front()?;
        let content = render(&request.items, request.deliver.start());
        Some(request.deliver.deliver(content))
    }

    /// Advances the clock and completes every request whose delay has elapsed.
    ///
    /// Requests issued while completing (e.g. by an `on_loaded` callback) are scheduled from
    /// `now_ms`. Returns the number of pages the loader applied.
    pub fn tick(&self, now_ms: u64, mut render: impl FnMut(&[T], usize) -> C) -> usize {
        self.queue.borrow_mut().now_ms = now_ms;
        let mut applied = 0usize;
        loop {
            let next = {
                let mut q = self.queue.borrow_mut();
                let ready = q.requests.front().is_some_and(|r| r.ready_at_ms <= now_ms);
                if ready {
                    q.requests.pop_front()
                } else {
                    None
                }
            };
            let Some(request) = next else {
                break;
            };
            let content = render(&request.items, request.deliver.start());
            if request.deliver.deliver(content) {
                applied = applied.saturating_add(1);
            }
        }
        applied
    }

    /// Drops every outstanding request without content, as if the responses were lost.
    ///
    /// The owning loader stays in flight until its next `set_data`.
    pub fn abandon_all(&self) -> usize {
        let dropped: Vec<Request<T, C>> = self.queue.borrow_mut().requests.drain(..).collect();
        dropped.len()
    }
}
