// Example: reveal a list three rows at a time into a terminal-like viewport.
use incremental_loader::{LoadStatus, Loader, LoaderOptions, ProximityHandler, Viewport};

#[derive(Default)]
struct Lines {
    lines: Vec<String>,
    spinner: bool,
    handler: Option<ProximityHandler>,
}

impl Viewport<String> for Lines {
    fn append_content(&mut self, content: String) {
        self.lines.push(content);
    }

    fn show_loading_affordance(&mut self) {
        self.spinner = true;
    }

    fn remove_loading_affordance(&mut self) {
        self.spinner = false;
    }

    fn has_loading_affordance(&self) -> bool {
        self.spinner
    }

    fn loading_affordance_top(&self) -> Option<i64> {
        self.spinner.then_some(self.lines.len() as i64)
    }

    fn viewport_top(&self) -> i64 {
        0
    }

    fn viewport_height(&self) -> u32 {
        24
    }

    fn bind_proximity_handler(&mut self, handler: ProximityHandler) {
        self.handler = Some(handler);
    }

    fn unbind_proximity_handler(&mut self) {
        self.handler = None;
    }
}

fn main() {
    let opts = LoaderOptions::per_item(3, |term: &&str| format!("- {term}\n"))
        .with_on_loaded(|n| println!("(loaded {n} rows)"));
    let loader = Loader::with_data(
        opts,
        Lines::default(),
        vec!["alpha", "beta", "gamma", "delta", "epsilon", "zeta", "eta"],
    );

    while let status @ (LoadStatus::Loaded(_) | LoadStatus::Pending(_)) = loader.load_more() {
        println!("{status:?} cursor={}", loader.cursor());
    }

    let viewport = loader.viewport();
    print!("{}", viewport.lines.concat());
    println!("spinner={} bound={}", viewport.spinner, viewport.handler.is_some());
}
