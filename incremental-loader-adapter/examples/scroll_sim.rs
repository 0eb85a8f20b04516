// Example: drive a loader from simulated scroll events, with a renderer that answers after a
// delay (like a remote lookup).
use incremental_loader_adapter::{Controller, DeferredRenderer, MemoryViewport};

fn render(items: &[String], start: usize) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{:>3}. {item}\n", start + i + 1))
        .collect()
}

fn main() {
    let renderer = DeferredRenderer::<String, String>::new(30);
    let viewport = MemoryViewport::new(8).with_measure(|block: &String| block.lines().count() as u32);
    let mut c = Controller::new(renderer.options(6), viewport);

    let items: Vec<String> = (0..25).map(|i| format!("tweet #{i}")).collect();
    println!("show: {:?}", c.show(items));

    let mut scroll = 0u64;
    for now_ms in (0..=300).step_by(10) {
        let applied = renderer.tick(now_ms, render);
        if applied > 0 {
            println!("t={now_ms}ms applied {applied} page(s), cursor={}", c.loader().cursor());
            c.fill(usize::MAX);
        }

        scroll += 2;
        if let Some(status) = c.on_scroll(scroll) {
            println!("t={now_ms}ms scroll_top={} -> {status:?}", c.viewport().scroll_top());
        }
        if c.loader().is_exhausted() {
            break;
        }
    }

    println!("{:?}", c.loader().state());
    print!("{}", c.viewport().blocks().concat());
}
