use std::cell::RefCell;
use std::rc::Rc;

use slotmap::{SlotMap, new_key_type};

use crate::effects::Dispose;
use crate::effects_ext::{Deps, use_effect};
use crate::refs::use_ref;
use crate::state::use_force_render;

/// State that lives outside the component tree. Components read
/// `snapshot()` during render and re-render when a subscriber is notified.
pub trait ExternalStore<T> {
    fn subscribe(&self, on_change: Rc<dyn Fn()>) -> Dispose;
    fn snapshot(&self) -> T;
}

new_key_type! {
    struct SubKey;
}

struct StoreInner<T> {
    value: RefCell<T>,
    subs: RefCell<SlotMap<SubKey, Rc<dyn Fn()>>>,
}

/// In-process store with explicit subscribe/unsubscribe.
pub struct MemoryStore<T: 'static>(Rc<StoreInner<T>>);

impl<T: 'static> Clone for MemoryStore<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T: 'static> MemoryStore<T> {
    pub fn new(value: T) -> Self {
        Self(Rc::new(StoreInner {
            value: RefCell::new(value),
            subs: RefCell::new(SlotMap::with_key()),
        }))
    }

    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.0.value.borrow().clone()
    }

    pub fn set(&self, value: T) {
        *self.0.value.borrow_mut() = value;
        self.notify();
    }

    pub fn update(&self, f: impl FnOnce(&mut T)) {
        f(&mut *self.0.value.borrow_mut());
        self.notify();
    }

    pub fn subscriber_count(&self) -> usize {
        self.0.subs.borrow().len()
    }

    fn notify(&self) {
        // Subscribers may unsubscribe while being notified.
        let subs: Vec<Rc<dyn Fn()>> = self.0.subs.borrow().values().cloned().collect();
        for s in subs {
            s();
        }
    }
}

impl<T: Clone + 'static> ExternalStore<T> for MemoryStore<T> {
    fn subscribe(&self, on_change: Rc<dyn Fn()>) -> Dispose {
        let key = self.0.subs.borrow_mut().insert(on_change);
        let inner = Rc::downgrade(&self.0);
        Dispose::new(move || {
            if let Some(inner) = inner.upgrade() {
                inner.subs.borrow_mut().remove(key);
            }
        })
    }

    fn snapshot(&self) -> T {
        self.get()
    }
}

/// Reads `store` during render and subscribes (post-paint) for re-renders.
/// A write that lands between the render and the subscription is caught by
/// comparing snapshots once subscribed. Switching to a different store object
/// resubscribes.
pub fn use_sync_external_store<T>(store: &Rc<dyn ExternalStore<T>>) -> T
where
    T: Clone + PartialEq + 'static,
{
    let force = use_force_render();
    let snapshot = store.snapshot();
    let rendered = use_ref(|| snapshot.clone());
    rendered.set(snapshot.clone());

    let identity = Rc::as_ptr(store) as *const () as usize;
    let subscribed = store.clone();
    use_effect(Deps::on(identity), move || {
        let dispose = subscribed.subscribe(Rc::new({
            let force = force.clone();
            move || force.bump()
        }));
        if rendered.with(|seen| *seen != subscribed.snapshot()) {
            log::trace!("store changed before subscription; re-rendering");
            force.bump();
        }
        dispose
    });
    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn subscribers_hear_writes_until_disposed() {
        let store = MemoryStore::new(1);
        let heard = Rc::new(Cell::new(0));
        let d = {
            let heard = heard.clone();
            store.subscribe(Rc::new(move || heard.set(heard.get() + 1)))
        };
        store.set(2);
        store.update(|v| *v += 1);
        assert_eq!(heard.get(), 2);
        assert_eq!(store.snapshot(), 3);

        d.run();
        assert_eq!(store.subscriber_count(), 0);
        store.set(4);
        assert_eq!(heard.get(), 2);
    }
}
