use crate::*;

use alloc::format;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

#[derive(Clone, Copy, Debug)]
struct Lcg(u64);

impl Lcg {
    fn next_u64(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 16
    }

    fn gen_range_usize(&mut self, start: usize, end_exclusive: usize) -> usize {
        debug_assert!(start < end_exclusive);
        start + (self.next_u64() % (end_exclusive - start) as u64) as usize
    }
}

#[derive(Debug)]
struct TestViewport {
    blocks: Vec<String>,
    affordance: bool,
    handler: Option<ProximityHandler>,
    binds: usize,
    unbinds: usize,
    mutations: usize,
    /// Affordance top relative to the viewport top.
    affordance_top: i64,
    height: u32,
}

impl Default for TestViewport {
    fn default() -> Self {
        Self {
            blocks: Vec::new(),
            affordance: false,
            handler: None,
            binds: 0,
            unbinds: 0,
            mutations: 0,
            affordance_top: 0,
            height: 100,
        }
    }
}

impl Viewport<String> for TestViewport {
    fn append_content(&mut self, content: String) {
        self.mutations += 1;
        self.blocks.push(content);
    }

    fn show_loading_affordance(&mut self) {
        self.mutations += 1;
        self.affordance = true;
    }

    fn remove_loading_affordance(&mut self) {
        self.mutations += 1;
        self.affordance = false;
    }

    fn has_loading_affordance(&self) -> bool {
        self.affordance
    }

    fn loading_affordance_top(&self) -> Option<i64> {
        self.affordance.then_some(self.affordance_top)
    }

    fn viewport_top(&self) -> i64 {
        0
    }

    fn viewport_height(&self) -> u32 {
        self.height
    }

    fn bind_proximity_handler(&mut self, handler: ProximityHandler) {
        self.mutations += 1;
        self.binds += 1;
        self.handler = Some(handler);
    }

    fn unbind_proximity_handler(&mut self) {
        self.mutations += 1;
        self.unbinds += 1;
        self.handler = None;
    }

    fn clear_content(&mut self) {
        self.mutations += 1;
        self.blocks.clear();
    }
}

type TestLoader = Loader<String, String, TestViewport>;
type RenderLog = Rc<RefCell<Vec<(usize, Vec<String>)>>>;
type PendingPages = Rc<RefCell<Vec<Deliver<String>>>>;

fn letters(n: usize) -> Vec<String> {
    (0..n)
        .map(|i| {
            let c = (b'a' + (i % 26) as u8) as char;
            format!("{c}")
        })
        .collect()
}

fn page(start_index: usize, end_index: usize) -> PageRange {
    PageRange {
        start_index,
        end_index,
    }
}

fn recording_loader(page_size: usize) -> (TestLoader, RenderLog) {
    let log: RenderLog = Rc::default();
    let opts = LoaderOptions::sync(page_size, {
        let log = Rc::clone(&log);
        move |items: &[String], start| {
            log.borrow_mut().push((start, items.to_vec()));
            items.concat()
        }
    });
    (Loader::new(opts, TestViewport::default()), log)
}

fn deferred_loader(page_size: usize) -> (TestLoader, PendingPages, Rc<Cell<usize>>) {
    let pending: PendingPages = Rc::default();
    let renders = Rc::new(Cell::new(0usize));
    let opts = LoaderOptions::new(page_size, {
        let pending = Rc::clone(&pending);
        let renders = Rc::clone(&renders);
        move |_items: &[String], _start: usize, deliver: Deliver<String>| {
            renders.set(renders.get() + 1);
            pending.borrow_mut().push(deliver);
        }
    });
    (Loader::new(opts, TestViewport::default()), pending, renders)
}

fn take_pending(pending: &PendingPages) -> Deliver<String> {
    pending.borrow_mut().remove(0)
}

#[test]
fn seven_items_in_pages_of_three() {
    let (mut loader, log) = recording_loader(3);
    loader.set_data(letters(7));

    assert_eq!(loader.load_more(), LoadStatus::Loaded(page(0, 3)));
    assert_eq!(loader.cursor(), 3);
    assert!(loader.viewport().affordance);
    assert!(loader.viewport().handler.is_some());

    assert_eq!(loader.load_more(), LoadStatus::Loaded(page(3, 6)));
    assert_eq!(loader.cursor(), 6);
    assert!(loader.viewport().affordance);
    assert!(loader.is_trigger_bound());

    assert_eq!(loader.load_more(), LoadStatus::Loaded(page(6, 7)));
    assert_eq!(loader.cursor(), 7);
    assert!(!loader.viewport().affordance);
    assert!(loader.viewport().handler.is_none());
    assert!(!loader.is_trigger_bound());
    assert!(loader.is_exhausted());

    assert_eq!(loader.viewport().blocks, vec!["abc", "def", "g"]);
    let starts: Vec<usize> = log.borrow().iter().map(|(s, _)| *s).collect();
    assert_eq!(starts, vec![0, 3, 6]);
}

#[test]
fn empty_collection_never_renders() {
    let (mut loader, log) = recording_loader(3);
    loader.set_data(Vec::<String>::new());

    assert_eq!(loader.load_more(), LoadStatus::Exhausted);
    assert_eq!(loader.cursor(), 0);
    assert!(log.borrow().is_empty());
    assert!(!loader.viewport().affordance);
    assert_eq!(loader.viewport().mutations, 0);
}

#[test]
fn load_more_when_exhausted_is_a_no_op() {
    let (mut loader, log) = recording_loader(4);
    loader.set_data(letters(8));
    while loader.load_more().is_loaded() {}
    assert_eq!(loader.cursor(), 8);

    let renders = log.borrow().len();
    let mutations = loader.viewport().mutations;
    assert_eq!(loader.load_more(), LoadStatus::Exhausted);
    assert_eq!(loader.load_more(), LoadStatus::Exhausted);
    assert_eq!(log.borrow().len(), renders);
    assert_eq!(loader.viewport().mutations, mutations);
}

#[test]
fn pages_cover_collection_for_random_sizes() {
    let mut rng = Lcg(0x5eed);
    for _ in 0..200 {
        let n = rng.gen_range_usize(0, 60);
        let p = rng.gen_range_usize(1, 12);
        let (mut loader, log) = recording_loader(p);
        loader.set_data(letters(n));

        let mut last_cursor = 0;
        for _ in 0..n + 2 {
            let status = loader.load_more();
            let cursor = loader.cursor();
            assert!(cursor >= last_cursor, "cursor went backwards (n={n}, p={p})");
            last_cursor = cursor;
            assert_eq!(loader.viewport().affordance, cursor < n, "n={n}, p={p}");
            assert_eq!(loader.is_trigger_bound(), cursor < n, "n={n}, p={p}");
            if status == LoadStatus::Exhausted {
                break;
            }
        }

        assert_eq!(loader.cursor(), n);
        let sizes: Vec<usize> = log.borrow().iter().map(|(_, items)| items.len()).collect();
        assert_eq!(sizes.len(), n.div_ceil(p), "n={n}, p={p}");
        if let Some((last, full)) = sizes.split_last() {
            assert!(full.iter().all(|&s| s == p));
            let expected_last = if n % p == 0 { p } else { n % p };
            assert_eq!(*last, expected_last);
        }
        assert_eq!(loader.state().pages_loaded(), n.div_ceil(p));
    }
}

#[test]
fn repeated_proximity_triggers_render_once() {
    let (mut loader, pending, renders) = deferred_loader(2);
    loader.viewport_mut().affordance_top = 10;
    loader.set_data(letters(6));

    assert_eq!(loader.load_more(), LoadStatus::Pending(page(0, 2)));
    assert!(take_pending(&pending).deliver(String::from("ab")));
    let handler = loader.viewport().handler.clone().unwrap();

    assert_eq!(handler.on_scroll(), Some(LoadStatus::Pending(page(2, 4))));
    assert_eq!(handler.fire(), Some(LoadStatus::Busy));
    assert_eq!(handler.on_scroll(), None);
    assert_eq!(loader.load_more(), LoadStatus::Busy);
    assert_eq!(renders.get(), 2);
    assert_eq!(loader.cursor(), 2);

    assert!(take_pending(&pending).deliver(String::from("cd")));
    assert_eq!(loader.cursor(), 4);
    assert_eq!(loader.viewport().blocks, vec!["ab", "cd"]);
}

#[test]
fn trigger_stays_unbound_while_delivery_is_delayed() {
    let (mut loader, pending, _) = deferred_loader(3);
    loader.set_data(letters(7));

    assert!(loader.load_more().is_pending());
    take_pending(&pending).deliver(String::from("abc"));
    assert!(loader.is_trigger_bound());
    let binds = loader.viewport().binds;

    assert!(loader.load_more().is_pending());
    for _ in 0..5 {
        assert!(loader.is_loading());
        assert!(!loader.is_trigger_bound());
        assert!(loader.viewport().handler.is_none());
        assert_eq!(loader.viewport().binds, binds);
        assert_eq!(loader.cursor(), 3);
    }

    let deliver = take_pending(&pending);
    assert_eq!(deliver.page(), page(3, 6));
    assert!(deliver.is_current());
    assert!(deliver.deliver(String::from("def")));
    assert!(!loader.is_loading());
    assert!(loader.is_trigger_bound());
    assert_eq!(loader.viewport().binds, binds + 1);
}

#[test]
fn proximity_follows_affordance_geometry() {
    let (mut loader, _) = recording_loader(2);
    loader.set_data(letters(5));
    loader.load_more();
    let handler = loader.proximity_handler();

    loader.viewport_mut().affordance_top = 250;
    assert_eq!(handler.on_scroll(), None);
    assert_eq!(loader.cursor(), 2);

    loader.viewport_mut().affordance_top = 99;
    assert_eq!(handler.on_scroll(), Some(LoadStatus::Loaded(page(2, 4))));

    loader.viewport_mut().affordance_top = 100;
    assert_eq!(handler.on_scroll(), None);

    loader.viewport_mut().affordance_top = -40;
    assert_eq!(handler.on_scroll(), Some(LoadStatus::Loaded(page(4, 5))));

    // Exhausted: nothing bound, nothing near.
    assert_eq!(handler.on_scroll(), None);
}

#[test]
fn stale_delivery_after_set_data_is_discarded() {
    let (mut loader, pending, _) = deferred_loader(2);
    loader.set_data(letters(4));
    assert!(loader.load_more().is_pending());
    let stale = take_pending(&pending);

    loader.set_data(vec![String::from("x"), String::from("y"), String::from("z")]);
    assert_eq!(loader.generation(), 2);
    assert!(!loader.is_loading());
    assert!(!stale.is_current());
    assert!(!stale.deliver(String::from("ab")));
    assert!(loader.viewport().blocks.is_empty());
    assert_eq!(loader.cursor(), 0);

    assert_eq!(loader.load_more(), LoadStatus::Pending(page(0, 2)));
    assert!(take_pending(&pending).deliver(String::from("xy")));
    assert_eq!(loader.viewport().blocks, vec!["xy"]);
    assert_eq!(loader.cursor(), 2);
}

#[test]
fn on_loaded_receives_page_counts() {
    let counts = Rc::new(RefCell::new(Vec::new()));
    let opts = LoaderOptions::sync(3, |items: &[String], _| items.concat()).with_on_loaded({
        let counts = Rc::clone(&counts);
        move |n| counts.borrow_mut().push(n)
    });
    let loader = Loader::with_data(opts, TestViewport::default(), letters(7));
    while loader.load_more() != LoadStatus::Exhausted {}

    assert_eq!(*counts.borrow(), vec![3, 3, 1]);
}

#[test]
fn on_loaded_may_request_the_next_page() {
    let handler: Rc<RefCell<Option<ProximityHandler>>> = Rc::default();
    let opts = LoaderOptions::sync(2, |items: &[String], _| items.concat()).with_on_loaded({
        let handler = Rc::clone(&handler);
        move |_| {
            let next = handler.borrow().clone();
            if let Some(h) = next {
                h.fire();
            }
        }
    });
    let loader = Loader::with_data(opts, TestViewport::default(), letters(7));
    *handler.borrow_mut() = Some(loader.proximity_handler());

    assert_eq!(loader.load_more(), LoadStatus::Loaded(page(0, 2)));
    assert_eq!(loader.cursor(), 7);
    assert_eq!(loader.viewport().blocks, vec!["ab", "cd", "ef", "g"]);
}

#[test]
fn per_item_formatter_concatenates() {
    let opts = LoaderOptions::per_item(2, |s: &String| format!("<li>{s}</li>"));
    let loader = Loader::with_data(opts, TestViewport::default(), letters(3));
    loader.load_more();
    loader.load_more();

    assert_eq!(
        loader.viewport().blocks,
        vec!["<li>a</li><li>b</li>", "<li>c</li>"]
    );
}

#[test]
fn replace_data_clears_and_loads_first_page() {
    let (mut loader, log) = recording_loader(3);
    loader.set_data(letters(7));
    loader.load_more();
    assert!(loader.viewport().affordance);

    let status = loader.replace_data(vec![String::from("p"), String::from("q")]);
    assert_eq!(status, LoadStatus::Loaded(page(0, 2)));
    assert_eq!(loader.viewport().blocks, vec!["pq"]);
    assert!(!loader.viewport().affordance);
    assert!(!loader.is_trigger_bound());
    assert_eq!(loader.generation(), 2);
    assert_eq!(log.borrow().len(), 2);
}

#[test]
fn handlers_are_scoped_and_inert_after_drop() {
    let (mut first, _) = recording_loader(1);
    let (mut second, _) = recording_loader(1);
    first.set_data(letters(3));
    second.set_data(letters(3));
    first.load_more();
    second.load_more();

    let h1 = first.viewport().handler.clone().unwrap();
    let h2 = second.viewport().handler.clone().unwrap();
    assert!(h1.same_loader(&first.proximity_handler()));
    assert!(!h1.same_loader(&h2));

    assert!(h1.fire().unwrap().is_loaded());
    assert_eq!(first.cursor(), 2);
    assert_eq!(second.cursor(), 1);

    drop(first);
    assert!(!h1.is_attached());
    assert_eq!(h1.fire(), None);
    assert_eq!(h1.on_scroll(), None);
    assert!(h2.is_attached());
}

#[test]
fn delivery_after_loader_drop_is_discarded() {
    let (mut loader, pending, _) = deferred_loader(2);
    loader.set_data(letters(4));
    loader.load_more();
    drop(loader);

    let deliver = take_pending(&pending);
    assert!(!deliver.is_current());
    assert!(!deliver.deliver(String::from("ab")));
}

#[test]
fn zero_page_size_is_clamped() {
    let (mut loader, _) = recording_loader(0);
    assert_eq!(loader.page_size(), 1);
    loader.set_data(letters(2));
    assert_eq!(loader.load_more(), LoadStatus::Loaded(page(0, 1)));
}

#[test]
fn detach_releases_the_viewport_binding() {
    let (mut loader, _) = recording_loader(2);
    loader.set_data(letters(5));
    loader.load_more();
    assert!(loader.is_trigger_bound());

    loader.detach();
    assert!(!loader.is_trigger_bound());
    assert!(loader.viewport().handler.is_none());
    assert!(!loader.viewport().affordance);

    assert!(loader.load_more().is_loaded());
    assert!(loader.is_trigger_bound());
}

#[test]
fn state_snapshot_tracks_progress() {
    let (mut loader, pending, _) = deferred_loader(4);
    loader.set_data(letters(10));
    assert_eq!(
        loader.state(),
        LoaderState {
            len: 10,
            cursor: 0,
            page_size: 4,
            generation: 1,
            in_flight: None,
            trigger_bound: false,
        }
    );

    loader.load_more();
    assert_eq!(loader.state().in_flight, Some(page(0, 4)));
    take_pending(&pending).deliver(String::from("abcd"));

    let state = loader.state();
    assert_eq!(state.cursor, 4);
    assert_eq!(state.remaining(), 6);
    assert_eq!(state.pages_loaded(), 1);
    assert!(state.trigger_bound);
    assert!(!state.is_exhausted());
}

#[test]
fn affordance_near_requires_attached_affordance() {
    let mut v = TestViewport::default();
    v.affordance_top = 0;
    assert!(!is_affordance_near::<String, _>(&v));
    v.affordance = true;
    assert!(is_affordance_near::<String, _>(&v));
    v.affordance_top = 100;
    assert!(!is_affordance_near::<String, _>(&v));
}

#[test]
fn delivery_while_viewport_is_borrowed_is_parked() {
    let (mut loader, pending, _) = deferred_loader(2);
    loader.set_data(letters(4));
    assert!(loader.load_more().is_pending());

    let deliver = take_pending(&pending);
    {
        let guard = loader.viewport();
        assert!(deliver.deliver(String::from("ab")));
        assert!(guard.blocks.is_empty());
    }
    assert!(loader.has_parked_content());
    assert!(loader.is_loading());
    assert_eq!(loader.cursor(), 0);

    assert_eq!(loader.load_more(), LoadStatus::Loaded(page(0, 2)));
    assert!(!loader.has_parked_content());
    assert_eq!(loader.cursor(), 2);
    assert_eq!(loader.viewport().blocks, vec!["ab"]);
    assert!(loader.is_trigger_bound());

    assert_eq!(loader.load_more(), LoadStatus::Pending(page(2, 4)));
}

#[test]
fn parked_content_is_applied_by_flush_or_dropped_by_set_data() {
    let (mut loader, pending, _) = deferred_loader(2);
    loader.set_data(letters(4));
    loader.load_more();
    {
        let _guard = loader.viewport();
        take_pending(&pending).deliver(String::from("ab"));
    }
    assert_eq!(loader.flush(), Some(page(0, 2)));
    assert_eq!(loader.flush(), None);
    assert_eq!(loader.viewport().blocks, vec!["ab"]);

    loader.load_more();
    {
        let _guard = loader.viewport();
        take_pending(&pending).deliver(String::from("cd"));
    }
    loader.set_data(letters(1));
    assert!(!loader.has_parked_content());
    assert!(!loader.is_loading());
    assert_eq!(loader.load_more(), LoadStatus::Pending(page(0, 1)));
    assert_eq!(loader.viewport().blocks, vec!["ab"]);
}

#[test]
fn exhausted_new_collection_releases_a_stale_trigger() {
    let (mut loader, log) = recording_loader(2);
    loader.set_data(letters(4));
    loader.load_more();
    let handler = loader.proximity_handler();
    assert!(loader.is_trigger_bound());

    loader.set_data(Vec::<String>::new());
    assert_eq!(handler.fire(), Some(LoadStatus::Exhausted));
    assert!(!loader.is_trigger_bound());
    assert!(loader.viewport().handler.is_none());
    assert!(!loader.viewport().affordance);
    assert_eq!(loader.viewport().blocks, vec!["ab"]);

    let mutations = loader.viewport().mutations;
    assert_eq!(loader.load_more(), LoadStatus::Exhausted);
    assert_eq!(loader.viewport().mutations, mutations);
    assert_eq!(log.borrow().len(), 1);
}

#[test]
fn scroll_near_stale_affordance_after_empty_set_data() {
    let (mut loader, _) = recording_loader(3);
    loader.set_data(letters(7));
    loader.load_more();
    loader.viewport_mut().affordance_top = 5;
    let handler = loader.viewport().handler.clone().unwrap();

    loader.set_data(Vec::<String>::new());
    assert_eq!(handler.on_scroll(), Some(LoadStatus::Exhausted));
    assert!(!loader.viewport().affordance);
    assert_eq!(handler.on_scroll(), None);
}

#[test]
fn options_builders_replace_fields() {
    let counts = Rc::new(Cell::new(0usize));
    let opts = LoaderOptions::sync(10, |items: &[String], _| items.concat())
        .with_on_loaded({
            let counts = Rc::clone(&counts);
            move |n| counts.set(counts.get() + n)
        })
        .with_page_size(2)
        .with_render(|items: &[String], start: usize, deliver: Deliver<String>| {
            deliver.deliver(format!("{start}:{}", items.concat()));
        });
    let quiet = opts.clone().without_on_loaded();
    assert_eq!(opts.page_size, 2);
    assert!(opts.on_loaded.is_some());
    assert!(quiet.on_loaded.is_none());
    assert!(Rc::ptr_eq(&opts.render, &quiet.render));

    let loader = Loader::with_data(opts, TestViewport::default(), letters(3));
    loader.load_more();
    loader.load_more();
    assert_eq!(loader.viewport().blocks, vec!["0:ab", "2:c"]);
    assert_eq!(counts.get(), 3);

    let other = Loader::with_data(quiet, TestViewport::default(), letters(3));
    other.load_more();
    assert_eq!(other.viewport().blocks, vec!["0:ab"]);
    assert_eq!(counts.get(), 3);
}

#[test]
fn renderer_can_read_the_whole_collection() {
    let terms: Rc<[(String, u32)]> = Rc::from(vec![
        (String::from("rust"), 40),
        (String::from("go"), 20),
        (String::from("c"), 10),
    ]);
    let opts = LoaderOptions::sync(2, {
        let all = Rc::clone(&terms);
        move |page: &[(String, u32)], _| {
            let max = all.first().map_or(1, |(_, n)| *n);
            page.iter()
                .map(|(t, n)| format!("{t}={}%;", n * 100 / max))
                .collect::<String>()
        }
    });
    let loader = Loader::with_data(opts, TestViewport::default(), Rc::clone(&terms));
    assert!(Rc::ptr_eq(&loader.items(), &terms));

    loader.load_more();
    loader.load_more();
    assert_eq!(loader.viewport().blocks, vec!["rust=100%;go=50%;", "c=25%;"]);
}
