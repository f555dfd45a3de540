//! Every hook in one component.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use hooklab_core::*;
use hooklab_ui::*;
use serde::Serialize;

use crate::console::Console;

#[derive(Clone, Debug, PartialEq)]
pub struct Theme {
    pub background: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: "#ffffff".to_string(),
        }
    }
}

/// Injected style rules, in insertion order.
#[derive(Clone, Default)]
pub struct StyleSheet {
    rules: Rc<RefCell<Vec<(u64, String)>>>,
    next: Rc<Cell<u64>>,
}

impl StyleSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `rule`; the returned `Dispose` removes it again.
    pub fn insert(&self, rule: impl Into<String>) -> Dispose {
        let key = self.next.get();
        self.next.set(key + 1);
        self.rules.borrow_mut().push((key, rule.into()));
        let rules = self.rules.clone();
        Dispose::new(move || rules.borrow_mut().retain(|(k, _)| *k != key))
    }

    pub fn rules(&self) -> Vec<String> {
        self.rules.borrow().iter().map(|(_, r)| r.clone()).collect()
    }
}

pub trait Connection {
    fn connect(&self);
    fn disconnect(&self);
}

/// Pretend connection to an outside system; reports through the console.
pub struct ConsoleConnection {
    console: Console,
}

impl Connection for ConsoleConnection {
    fn connect(&self) {
        self.console.log("connected");
    }

    fn disconnect(&self) {
        self.console.log("disconnected");
    }
}

pub fn create_connection(console: &Console) -> Box<dyn Connection> {
    Box::new(ConsoleConnection {
        console: console.clone(),
    })
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StoreState {
    pub visits: u32,
    pub online: bool,
}

impl Default for StoreState {
    fn default() -> Self {
        Self {
            visits: 0,
            online: true,
        }
    }
}

pub fn expensive_calculation(n: i64) -> i64 {
    (1..=1000).map(|i| i * n).sum()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AllHooksAction {
    Increment,
    Decrement,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Count {
    pub count: i64,
}

fn reducer(state: &Count, action: &AllHooksAction) -> Option<Count> {
    match action {
        AllHooksAction::Increment => Some(Count {
            count: state.count + 1,
        }),
        AllHooksAction::Decrement => Some(Count {
            count: state.count - 1,
        }),
    }
}

/// Methods the showcase exposes to whoever holds its handle.
pub trait AllHooksHandle {
    fn focus_input(&self);
    /// Calls the memoized count callback.
    fn report_count(&self);
}

struct Exposed {
    input: NodeRef,
    report: Rc<dyn Fn()>,
}

impl AllHooksHandle for Exposed {
    fn focus_input(&self) {
        if let Err(e) = self.input.focus() {
            log::warn!("focus_input: {e}");
        }
    }

    fn report_count(&self) {
        (self.report)();
    }
}

#[derive(Clone)]
pub struct AllHooksProps {
    pub handle: HandleRef<dyn AllHooksHandle>,
    pub store: Rc<dyn ExternalStore<StoreState>>,
    pub styles: StyleSheet,
    pub console: Console,
}

pub fn AllHooksDemo(props: &AllHooksProps) -> Node {
    let console = &props.console;

    let (text, set_text) = use_state(String::new);
    let (state, dispatch) = use_reducer_strict(reducer, Count::default);
    let theme = use_context::<Theme>();
    let input_ref = use_node_ref();

    let memoized_callback = use_callback(Deps::on(state.count), {
        let console = console.clone();
        let count = state.count;
        move || console.log(format!("Callback called with count: {count}"))
    });

    use_imperative_handle(&props.handle, Deps::always(), {
        let input = input_ref.clone();
        let report = memoized_callback.clone();
        move || {
            Rc::new(Exposed {
                input,
                report: report as Rc<dyn Fn()>,
            }) as Rc<dyn AllHooksHandle>
        }
    });

    use_effect(Deps::once(), {
        let console = console.clone();
        move || {
            let connection = create_connection(&console);
            connection.connect();
            cleanup(move || connection.disconnect())
        }
    });

    use_layout_effect(Deps::once(), {
        let console = console.clone();
        move || {
            console.log("Layout effect ran");
            Dispose::none()
        }
    });

    use_insertion_effect(Deps::on(theme.clone()), {
        let styles = props.styles.clone();
        move || styles.insert(format!("body {{ background-color: {}; }}", theme.background))
    });

    let expensive_result = use_memo(Deps::on(state.count), {
        let console = console.clone();
        let count = state.count;
        move || {
            console.log(format!("expensive calculation for {count}"));
            expensive_calculation(count)
        }
    });

    let (is_pending, start_transition) = use_transition();
    let deferred_text = use_deferred_value(text.clone());
    use_debug_value(&text, |t| format!("Current text: {t}"));
    let unique_id = use_id();
    let store_state = use_sync_external_store(&props.store);
    let store_json = serde_json::to_string(&store_state).unwrap_or_else(|e| {
        log::warn!("store state did not serialize: {e}");
        "null".to_string()
    });

    let handle_text_change = move |v: String| {
        set_text.set(v);
        start_transition.start(|| {
            // Simulated expensive work.
            std::hint::black_box((0..1_000_000u64).sum::<u64>());
        });
    };

    Div().child((
        Input()
            .id(unique_id)
            .value(text)
            .on_change(handle_text_change)
            .node_ref(&input_ref),
        Paragraph(format!("Deferred text: {deferred_text}")),
        Paragraph(format!("Count: {}", state.count)),
        Fragment().child((
            Button("+", {
                let dispatch = dispatch.clone();
                move || dispatch.send(AllHooksAction::Increment)
            }),
            Button("-", move || dispatch.send(AllHooksAction::Decrement)),
        )),
        Paragraph(format!("Expensive calculation result: {expensive_result}")),
        Paragraph(format!("Store state: {store_json}")),
        when(is_pending, || Paragraph("Updating...")),
    ))
}
