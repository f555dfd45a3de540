use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::effects::cleanup;
use crate::effects_ext::{Deps, use_layout_effect};
use crate::error::HookError;
use crate::runtime::remember;

/// Mutable box that survives re-renders. Writing it never schedules a render.
pub struct Ref<T>(Rc<RefCell<T>>);

impl<T> Clone for Ref<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> Ref<T> {
    pub fn new(value: T) -> Self {
        Self(Rc::new(RefCell::new(value)))
    }

    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.0.borrow().clone()
    }

    pub fn set(&self, value: T) {
        *self.0.borrow_mut() = value;
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&*self.0.borrow())
    }

    pub fn with_mut<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut *self.0.borrow_mut())
    }
}

pub fn use_ref<T: 'static>(init: impl FnOnce() -> T) -> Ref<T> {
    let r = remember(|| Ref::new(init()));
    (*r).clone()
}

/// Host-side element backing an input. Survives re-renders as long as the
/// input keeps its place in the tree.
pub struct LiveElement {
    value: RefCell<String>,
    prop: RefCell<Option<String>>,
    focused: Cell<bool>,
    damage: Rc<Cell<bool>>,
}

impl LiveElement {
    pub(crate) fn new(value: String, damage: Rc<Cell<bool>>) -> Self {
        Self {
            value: RefCell::new(value),
            prop: RefCell::new(None),
            focused: Cell::new(false),
            damage,
        }
    }

    pub fn value(&self) -> String {
        self.value.borrow().clone()
    }

    pub fn is_focused(&self) -> bool {
        self.focused.get()
    }

    /// Host-driven change (typing, controlled reset); the flush that follows
    /// paints it anyway.
    pub(crate) fn write_quiet(&self, value: String) {
        *self.value.borrow_mut() = value;
    }

    /// Resets the live value when the `value` prop changed since the last
    /// bind. Imperative writes survive until the prop moves again.
    pub(crate) fn sync_prop(&self, value: &str) {
        let changed = self.prop.borrow().as_deref() != Some(value);
        if changed {
            *self.prop.borrow_mut() = Some(value.to_string());
            self.write_quiet(value.to_string());
        }
    }

    /// Imperative change from component code; requests a repaint.
    fn write(&self, value: String) {
        self.write_quiet(value);
        self.damage.set(true);
    }

    fn focus(&self) {
        self.focused.set(true);
        self.damage.set(true);
    }
}

struct NodeRefInner {
    element: RefCell<Weak<LiveElement>>,
}

/// Handle to the live element of the input that carries it.
#[derive(Clone)]
pub struct NodeRef(Rc<NodeRefInner>);

impl Default for NodeRef {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeRef {
    pub fn new() -> Self {
        Self(Rc::new(NodeRefInner {
            element: RefCell::new(Weak::new()),
        }))
    }

    pub(crate) fn bind(&self, element: &Rc<LiveElement>) {
        *self.0.element.borrow_mut() = Rc::downgrade(element);
    }

    fn element(&self) -> Result<Rc<LiveElement>, HookError> {
        self.0
            .element
            .borrow()
            .upgrade()
            .ok_or(HookError::NodeNotMounted)
    }

    pub fn is_bound(&self) -> bool {
        self.element().is_ok()
    }

    pub fn value(&self) -> Result<String, HookError> {
        Ok(self.element()?.value())
    }

    pub fn set_value(&self, value: impl Into<String>) -> Result<(), HookError> {
        self.element()?.write(value.into());
        Ok(())
    }

    pub fn focus(&self) -> Result<(), HookError> {
        self.element()?.focus();
        Ok(())
    }

    pub fn is_focused(&self) -> Result<bool, HookError> {
        Ok(self.element()?.is_focused())
    }

    pub fn ptr_eq(&self, other: &NodeRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

pub fn use_node_ref() -> NodeRef {
    let r = remember(NodeRef::new);
    (*r).clone()
}

/// Slot through which a child publishes a capability object to one holder.
pub struct HandleRef<H: ?Sized>(Rc<RefCell<Option<Rc<H>>>>);

impl<H: ?Sized> Clone for HandleRef<H> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<H: ?Sized> Default for HandleRef<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: ?Sized> HandleRef<H> {
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(None)))
    }

    pub fn is_attached(&self) -> bool {
        self.0.borrow().is_some()
    }

    /// Calls into the published handle. Fails until the child has committed.
    pub fn with<R>(&self, f: impl FnOnce(&H) -> R) -> Result<R, HookError> {
        let handle = self.0.borrow().clone().ok_or(HookError::HandleNotMounted)?;
        Ok(f(&*handle))
    }

    fn attach(&self, handle: Rc<H>) {
        *self.0.borrow_mut() = Some(handle);
    }

    fn detach(&self) {
        self.0.borrow_mut().take();
    }
}

pub fn use_handle_ref<H: ?Sized + 'static>() -> HandleRef<H> {
    let r = remember(HandleRef::<H>::new);
    (*r).clone()
}

/// Publishes the handle built by `create` through `target` during the layout
/// tier, and withdraws it before the next publish and at unmount.
pub fn use_imperative_handle<H, D>(
    target: &HandleRef<H>,
    deps: Deps<D>,
    create: impl FnOnce() -> Rc<H> + 'static,
) where
    H: ?Sized + 'static,
    D: PartialEq + 'static,
{
    let target = target.clone();
    use_layout_effect(deps, move || {
        target.attach(create());
        cleanup(move || target.detach())
    });
}
