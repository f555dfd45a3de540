use crate::refs::use_ref;
use crate::runtime::{Lane, render_lane, with_lane};
use crate::state::{Setter, use_state};

/// Runs `f` so that every update it queues lands on the transition lane.
pub fn start_transition(f: impl FnOnce()) {
    with_lane(Lane::Transition, f);
}

/// Starter returned by `use_transition`.
#[derive(Clone)]
pub struct StartTransition {
    pending: Setter<bool>,
}

impl StartTransition {
    /// Marks the owner pending right away, then queues `f`'s updates (and
    /// the reset of the pending flag) behind every sync update.
    pub fn start(&self, f: impl FnOnce()) {
        self.pending.set(true);
        with_lane(Lane::Transition, || {
            self.pending.set(false);
            f();
        });
    }
}

pub fn use_transition() -> (bool, StartTransition) {
    let (pending, set_pending) = use_state(|| false);
    (
        pending,
        StartTransition {
            pending: set_pending,
        },
    )
}

/// Lags `value` by one render when it changes during a sync render: returns
/// the previous value now and re-renders with `value` on the transition lane.
pub fn use_deferred_value<T>(value: T) -> T
where
    T: Clone + PartialEq + 'static,
{
    let (shown, set_shown) = use_state(|| value.clone());
    let scheduled = use_ref(|| None::<T>);

    if shown == value {
        scheduled.set(None);
        return value;
    }

    let already = scheduled.with(|s| s.as_ref() == Some(&value));
    if !already {
        scheduled.set(Some(value.clone()));
        let next = value.clone();
        with_lane(Lane::Transition, || set_shown.set(next));
    }

    if render_lane() == Lane::Transition {
        value
    } else {
        shown
    }
}
