use std::cell::RefCell;
use std::rc::Rc;

use crate::effects_ext::Deps;
use crate::runtime::{current_runtime, remember, with_frame};

/// Recomputes `compute` only when `deps` change.
pub fn use_memo<T, D>(deps: Deps<D>, compute: impl FnOnce() -> T) -> T
where
    T: Clone + 'static,
    D: PartialEq + 'static,
{
    let slot = remember(|| RefCell::new(None::<(Option<D>, T)>));
    let hit = match (&deps, &*slot.borrow()) {
        (Deps::Track(d), Some((Some(prev), value))) if prev == d => Some(value.clone()),
        _ => None,
    };
    if let Some(value) = hit {
        return value;
    }
    let value = compute();
    *slot.borrow_mut() = Some((deps.into_tracked(), value.clone()));
    value
}

/// Same `Rc` for as long as `deps` stay equal.
pub fn use_callback<F, D>(deps: Deps<D>, f: F) -> Rc<F>
where
    F: 'static,
    D: PartialEq + 'static,
{
    use_memo(deps, move || Rc::new(f))
}

/// Id unique within the host and stable for the life of the instance.
pub fn use_id() -> String {
    let id = remember(|| {
        let n = current_runtime().map(|rt| rt.next_id()).unwrap_or_default();
        format!(":h{n}:")
    });
    (*id).clone()
}

/// Attaches a label to the rendering instance for inspection
/// (`Host::debug_labels`).
pub fn use_debug_value<T>(value: &T, format: impl FnOnce(&T) -> String) {
    let label = format(value);
    log::trace!("debug value: {label}");
    with_frame(|f| f.labels.push(label));
}
