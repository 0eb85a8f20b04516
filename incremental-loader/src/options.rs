use alloc::rc::Rc;

use crate::Deliver;

/// Produces the content for one page.
///
/// Arguments are the page's items, the index of the first item, and the single-shot handle the
/// content must be delivered through. Synchronous renderers deliver before returning;
/// asynchronous ones keep the handle and deliver later.
///
/// A renderer only sees its page. When it needs the whole collection (e.g. the largest count to
/// scale bar widths against), build the collection as an `Rc<[T]>`, capture a clone in the
/// renderer and pass the same `Rc` to [`crate::Loader::set_data`]; [`crate::Loader::items`]
/// returns it too.
pub type RenderFn<T, C> = Rc<dyn Fn(&[T], usize, Deliver<C>)>;

/// A callback fired after each page is applied, with the number of items it contained.
pub type OnLoadedCallback = Rc<dyn Fn(usize)>;

/// Configuration for [`crate::Loader`].
///
/// Closures are stored in `Rc`s so options are cheap to clone and share between loaders that
/// render the same kind of content into different regions.
pub struct LoaderOptions<T, C> {
    /// Maximum number of items rendered per load step. `0` is treated as `1`.
    pub page_size: usize,
    pub render: RenderFn<T, C>,
    /// Optional callback fired once per completed load step, after content is applied.
    pub on_loaded: Option<OnLoadedCallback>,
}

impl<T, C> Clone for LoaderOptions<T, C> {
    fn clone(&self) -> Self {
        Self {
            page_size: self.page_size,
            render: Rc::clone(&self.render),
            on_loaded: self.on_loaded.clone(),
        }
    }
}

impl<T, C> LoaderOptions<T, C> {
    /// Creates options around a renderer that delivers through the [`Deliver`] handle, either
    /// before returning or at some later point.
    pub fn new(page_size: usize, render: impl Fn(&[T], usize, Deliver<C>) + 'static) -> Self {
        Self {
            page_size,
            render: Rc::new(render),
            on_loaded: None,
        }
    }

    /// Creates options around a renderer that returns the page content directly.
    pub fn sync(page_size: usize, render: impl Fn(&[T], usize) -> C + 'static) -> Self {
        Self::new(page_size, move |items, start, deliver| {
            deliver.deliver(render(items, start));
        })
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_render(mut self, render: impl Fn(&[T], usize, Deliver<C>) + 'static) -> Self {
        self.render = Rc::new(render);
        self
    }

    pub fn with_on_loaded(mut self, on_loaded: impl Fn(usize) + 'static) -> Self {
        self.on_loaded = Some(Rc::new(on_loaded));
        self
    }

    pub fn without_on_loaded(mut self) -> Self {
        self.on_loaded = None;
        self
    }
}

impl<T, C: FromIterator<C>> LoaderOptions<T, C> {
    /// Creates options that format each item on its own and concatenate the results into the
    /// page content (e.g. one list row per item).
    pub fn per_item(page_size: usize, format: impl Fn(&T) -> C + 'static) -> Self {
        Self::sync(page_size, move |items, _start| items.iter().map(&format).collect())
    }
}

impl<T, C> core::fmt::Debug for LoaderOptions<T, C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LoaderOptions")
            .field("page_size", &self.page_size)
            .field("on_loaded", &self.on_loaded.is_some())
            .finish_non_exhaustive()
    }
}
