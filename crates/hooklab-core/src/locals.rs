//! # Context
//!
//! Typed values provided around part of a render and read by any component
//! mounted inside it:
//!
//! ```rust
//! use hooklab_core::*;
//!
//! #[derive(Clone, Default, PartialEq, Debug)]
//! struct Accent(&'static str);
//!
//! let seen = provide_context(Accent("teal"), || use_context::<Accent>());
//! assert_eq!(seen, Accent("teal"));
//! assert_eq!(use_context::<Accent>(), Accent::default());
//! ```
//!
//! A child component captures the context visible where `component(..)` was
//! called, so providers only need to wrap the call site, not the child's
//! render.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

pub type ContextSnapshot = HashMap<TypeId, Rc<dyn Any>>;

thread_local! {
    static CONTEXT_STACK: RefCell<Vec<ContextSnapshot>> = const { RefCell::new(Vec::new()) };
}

fn with_context_frame<R>(frame: ContextSnapshot, f: impl FnOnce() -> R) -> R {
    // Non-panicking frame guard (ensures pop on unwind)
    struct Guard;
    impl Drop for Guard {
        fn drop(&mut self) {
            CONTEXT_STACK.with(|st| {
                st.borrow_mut().pop();
            });
        }
    }
    CONTEXT_STACK.with(|st| st.borrow_mut().push(frame));
    let _guard = Guard;
    f()
}

/// Makes `value` visible to `use_context::<T>()` inside `f`, including
/// components mounted from `f`.
pub fn provide_context<T: 'static, R>(value: T, f: impl FnOnce() -> R) -> R {
    let mut frame = HashMap::new();
    frame.insert(TypeId::of::<T>(), Rc::new(value) as Rc<dyn Any>);
    with_context_frame(frame, f)
}

/// Nearest provided `T`, or `T::default()` when nothing provides one.
pub fn use_context<T: Clone + Default + 'static>() -> T {
    CONTEXT_STACK.with(|st| {
        for frame in st.borrow().iter().rev() {
            if let Some(v) = frame.get(&TypeId::of::<T>())
                && let Some(t) = v.downcast_ref::<T>()
            {
                return t.clone();
            }
        }
        T::default()
    })
}

/// Flattened view of every provider currently on the stack.
pub(crate) fn snapshot() -> Rc<ContextSnapshot> {
    CONTEXT_STACK.with(|st| {
        let mut flat = HashMap::new();
        for frame in st.borrow().iter() {
            for (k, v) in frame {
                flat.insert(*k, v.clone());
            }
        }
        Rc::new(flat)
    })
}

pub(crate) fn with_snapshot<R>(snapshot: &Rc<ContextSnapshot>, f: impl FnOnce() -> R) -> R {
    with_context_frame((**snapshot).clone(), f)
}
