//! A counter host whose view lives in `counter.xml`; `build.rs` compiles it
//! into the `Rebuild` impl included below.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use trellis_runtime::{HostBinding, LiveId};

/// Host state. Clones share the same cells, so event handlers that captured
/// a clone mutate what the next rebuild reads.
#[derive(Clone, Default)]
pub struct Counter {
    count: Rc<Cell<i64>>,
    show_history: Rc<Cell<bool>>,
    history: Rc<RefCell<Vec<String>>>,
}

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> i64 {
        self.count.get()
    }

    pub fn history_shown(&self) -> bool {
        self.show_history.get()
    }

    pub fn increment(&self) {
        let n = self.count.get() + 1;
        self.count.set(n);
        self.history.borrow_mut().push(format!("reached {n}"));
    }

    pub fn toggle_history(&self) {
        self.show_history.set(!self.show_history.get());
    }
}

include!(concat!(env!("OUT_DIR"), "/counter.rs"));

pub type CounterView = HostBinding<Counter, LiveId>;
