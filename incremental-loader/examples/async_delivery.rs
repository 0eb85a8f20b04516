// Example: a renderer that keeps its `Deliver` handle and completes the page later, e.g. after a
// remote lookup. Proximity events fired meanwhile are ignored.
use std::cell::RefCell;
use std::rc::Rc;

use incremental_loader::{Deliver, Loader, LoaderOptions, ProximityHandler, Viewport};

#[derive(Debug, Default)]
struct Region {
    blocks: Vec<String>,
    affordance: bool,
    handler: Option<ProximityHandler>,
}

impl Viewport<String> for Region {
    fn append_content(&mut self, content: String) {
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
        self.affordance.then_some(0)
    }

    fn viewport_top(&self) -> i64 {
        0
    }

    fn viewport_height(&self) -> u32 {
        1
    }

    fn bind_proximity_handler(&mut self, handler: ProximityHandler) {
        self.handler = Some(handler);
    }

    fn unbind_proximity_handler(&mut self) {
        self.handler = None;
    }
}

type Outstanding = Rc<RefCell<Vec<(Vec<String>, Deliver<String>)>>>;

fn main() {
    let outstanding: Outstanding = Rc::default();
    let opts = LoaderOptions::new(2, {
        let outstanding = Rc::clone(&outstanding);
        move |urls: &[String], _start: usize, deliver: Deliver<String>| {
            outstanding.borrow_mut().push((urls.to_vec(), deliver));
        }
    });

    let urls: Vec<String> = (1..=5).map(|i| format!("https://example.com/{i}")).collect();
    let loader = Loader::with_data(opts, Region::default(), urls);
    println!("first request: {:?}", loader.load_more());

    // The event loop comes back around with the lookup results.
    loop {
        let next = outstanding.borrow_mut().pop();
        let Some((urls, deliver)) = next else {
            break;
        };
        let html: String = urls.iter().map(|u| format!("<li>{u}</li>")).collect();
        println!("delivering page {:?}: applied={}", deliver.page(), deliver.deliver(html));

        let handler = loader.viewport().handler.clone();
        if let Some(handler) = handler {
            println!("scroll: {:?}", handler.on_scroll());
            println!("scroll again: {:?}", handler.on_scroll());
        }
    }

    println!("{:#?}", loader.state());
}
