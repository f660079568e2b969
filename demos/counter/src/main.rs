use counter::{Counter, CounterView};
use trellis_runtime::MemoryToolkit;

fn main() {
    env_logger::Builder::from_default_env().init();

    let mut toolkit = MemoryToolkit::new();
    let mut view = CounterView::new(Counter::new());

    let Some(&root) = view.rebuild(&mut toolkit) else {
        return;
    };
    print!("{}", toolkit.snapshot(root));

    let buttons: Vec<_> = toolkit
        .children(root)
        .iter()
        .copied()
        .filter(|&id| toolkit.node(id).is_some_and(|n| n.type_tag == "Button"))
        .collect();
    let (increment, history) = (buttons[0], buttons[1]);

    for _ in 0..3 {
        toolkit.fire(increment, "click");
        view.rebuild(&mut toolkit);
    }
    toolkit.fire(history, "click");
    view.rebuild(&mut toolkit);

    println!("---");
    print!("{}", toolkit.snapshot(root));
    let stats = view.last_stats();
    println!(
        "--- last pass: created={} reused={} disposed={}",
        stats.created, stats.reused, stats.disposed
    );
}
