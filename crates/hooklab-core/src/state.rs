//! State cells: `use_state` and `use_reducer`.
//!
//! Both hooks share one cell type. Setters and dispatches only queue work;
//! the host applies the queue in issue order before the next render, so
//! several calls from one handler produce one render and each update sees
//! the result of the previous one.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt::Debug;
use std::rc::{Rc, Weak};

use crate::error::HookError;
use crate::runtime::{
    InstanceId, Lane, QueuedUpdates, Runtime, current_lane, frame_owner, remember,
};

type Update<S> = Box<dyn FnOnce(&S) -> Result<S, HookError>>;

struct Queued<S> {
    lane: Lane,
    update: Update<S>,
}

pub(crate) struct StateCell<S> {
    value: RefCell<S>,
    queue: RefCell<VecDeque<Queued<S>>>,
    listed: Cell<bool>,
    owner: InstanceId,
    runtime: Weak<Runtime>,
}

impl<S: 'static> StateCell<S> {
    fn new(value: S) -> Self {
        let (runtime, owner) = frame_owner();
        Self {
            value: RefCell::new(value),
            queue: RefCell::new(VecDeque::new()),
            listed: Cell::new(false),
            owner,
            runtime,
        }
    }

    fn get(&self) -> S
    where
        S: Clone,
    {
        self.value.borrow().clone()
    }

    fn enqueue(self: &Rc<Self>, update: Update<S>) {
        let Some(rt) = self.runtime.upgrade() else {
            log::debug!("state update after the host shut down; ignored");
            return;
        };
        if !rt.is_live(self.owner) {
            log::warn!(
                "state update on unmounted component {:?}; ignored",
                self.owner
            );
            return;
        }
        self.queue.borrow_mut().push_back(Queued {
            lane: current_lane(),
            update,
        });
        if !self.listed.replace(true) {
            rt.queue_cell(self.clone());
        }
    }
}

impl<S: 'static> QueuedUpdates for StateCell<S> {
    fn owner(&self) -> InstanceId {
        self.owner
    }

    fn apply(&self, lane: Lane, errors: &mut Vec<HookError>) -> bool {
        let mut applied = false;
        loop {
            let next = {
                let mut queue = self.queue.borrow_mut();
                match queue.front() {
                    Some(q) if lane == Lane::Transition || q.lane == Lane::Sync => {
                        queue.pop_front()
                    }
                    _ => None,
                }
            };
            let Some(queued) = next else {
                break;
            };
            let result = {
                let current = self.value.borrow();
                (queued.update)(&*current)
            };
            match result {
                Ok(v) => *self.value.borrow_mut() = v,
                Err(e) => errors.push(e),
            }
            applied = true;
        }
        applied
    }

    fn has_queued(&self) -> bool {
        !self.queue.borrow().is_empty()
    }

    fn set_listed(&self, listed: bool) {
        self.listed.set(listed);
    }

    fn clear(&self) {
        self.queue.borrow_mut().clear();
    }
}

/// Replaces the value of a `use_state` cell.
pub struct Setter<T: 'static> {
    cell: Rc<StateCell<T>>,
}

impl<T: 'static> Clone for Setter<T> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
        }
    }
}

impl<T: 'static> Setter<T> {
    pub fn set(&self, value: T) {
        self.cell.enqueue(Box::new(move |_: &T| Ok(value)));
    }

    /// Computes the next value from whatever the previous queued update
    /// produced, not from the value captured at render time.
    pub fn update(&self, f: impl FnOnce(&T) -> T + 'static) {
        self.cell.enqueue(Box::new(move |prev: &T| Ok(f(prev))));
    }
}

fn use_cell<T: 'static>(init: impl FnOnce() -> T) -> Rc<StateCell<T>> {
    remember(|| StateCell::new(init()))
}

/// Local state cell: current value plus its setter.
pub fn use_state<T: Clone + 'static>(init: impl FnOnce() -> T) -> (T, Setter<T>) {
    let cell = use_cell(init);
    (cell.get(), Setter { cell })
}

/// What a reducer does with an action it has no transition for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UnhandledAction {
    /// Keep the state as is.
    #[default]
    Ignore,
    /// Keep the state and report `HookError::UnhandledAction` from the flush.
    Reject,
}

/// Applies one action. `None` from the reducer means "no transition".
pub fn reduce<S, A>(
    reducer: &dyn Fn(&S, &A) -> Option<S>,
    policy: UnhandledAction,
    state: &S,
    action: &A,
) -> Result<S, HookError>
where
    S: Clone,
    A: Debug,
{
    match reducer(state, action) {
        Some(next) => Ok(next),
        None => match policy {
            UnhandledAction::Ignore => {
                log::debug!("reducer has no transition for {action:?}; state unchanged");
                Ok(state.clone())
            }
            UnhandledAction::Reject => Err(HookError::UnhandledAction {
                action: format!("{action:?}"),
            }),
        },
    }
}

/// Queues actions for a reducer cell.
pub struct Dispatch<A> {
    send: Rc<dyn Fn(A)>,
}

impl<A> Clone for Dispatch<A> {
    fn clone(&self) -> Self {
        Self {
            send: self.send.clone(),
        }
    }
}

impl<A> Dispatch<A> {
    pub fn send(&self, action: A) {
        (self.send)(action)
    }
}

pub fn use_reducer<S, A>(
    reducer: impl Fn(&S, &A) -> Option<S> + 'static,
    init: impl FnOnce() -> S,
) -> (S, Dispatch<A>)
where
    S: Clone + 'static,
    A: Debug + 'static,
{
    use_reducer_with(UnhandledAction::Ignore, reducer, init)
}

/// Like `use_reducer`, but an unhandled action is an error.
pub fn use_reducer_strict<S, A>(
    reducer: impl Fn(&S, &A) -> Option<S> + 'static,
    init: impl FnOnce() -> S,
) -> (S, Dispatch<A>)
where
    S: Clone + 'static,
    A: Debug + 'static,
{
    use_reducer_with(UnhandledAction::Reject, reducer, init)
}

pub fn use_reducer_with<S, A>(
    policy: UnhandledAction,
    reducer: impl Fn(&S, &A) -> Option<S> + 'static,
    init: impl FnOnce() -> S,
) -> (S, Dispatch<A>)
where
    S: Clone + 'static,
    A: Debug + 'static,
{
    let cell = use_cell(init);
    let dispatch = remember(|| {
        let cell = cell.clone();
        let reducer: Rc<dyn Fn(&S, &A) -> Option<S>> = Rc::new(reducer);
        Dispatch {
            send: Rc::new(move |action: A| {
                let reducer = reducer.clone();
                cell.enqueue(Box::new(move |state: &S| {
                    reduce(&*reducer, policy, state, &action)
                }));
            }) as Rc<dyn Fn(A)>,
        }
    });
    (cell.get(), (*dispatch).clone())
}

/// Re-renders the calling component when `bump` is called.
pub(crate) fn use_force_render() -> ForceRender {
    ForceRender(use_state(|| 0u64).1)
}

#[derive(Clone)]
pub(crate) struct ForceRender(Setter<u64>);

impl ForceRender {
    pub(crate) fn bump(&self) {
        self.0.update(|n| n.wrapping_add(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Tally(i32);

    #[derive(Debug)]
    enum Op {
        Add(i32),
        Halt,
    }

    fn step(s: &Tally, op: &Op) -> Option<Tally> {
        match op {
            Op::Add(n) => Some(Tally(s.0 + n)),
            Op::Halt => None,
        }
    }

    #[test]
    fn ignore_policy_keeps_state() {
        let s = Tally(3);
        assert_eq!(
            reduce(&step, UnhandledAction::Ignore, &s, &Op::Halt),
            Ok(Tally(3))
        );
    }

    #[test]
    fn reject_policy_names_the_action() {
        let err = reduce(&step, UnhandledAction::Reject, &Tally(0), &Op::Halt).unwrap_err();
        assert_eq!(
            err,
            HookError::UnhandledAction {
                action: "Halt".into()
            }
        );
    }

    #[test]
    fn handled_action_transitions() {
        assert_eq!(
            reduce(&step, UnhandledAction::Reject, &Tally(1), &Op::Add(4)),
            Ok(Tally(5))
        );
    }
}
