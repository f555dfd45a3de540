use std::cell::RefCell;
use std::rc::Rc;

/// Cleanup returned by an effect. Runs before the effect's next run and at
/// unmount.
#[derive(Clone)]
pub struct Dispose(Rc<RefCell<Option<Box<dyn FnOnce()>>>>);

impl Dispose {
    pub fn new(f: impl FnOnce() + 'static) -> Self {
        Self(Rc::new(RefCell::new(Some(Box::new(f)))))
    }

    /// An effect with nothing to release.
    pub fn none() -> Self {
        Self(Rc::new(RefCell::new(None)))
    }

    /// Runs at most once (safe to call multiple times).
    pub fn run(&self) {
        let f = self.0.borrow_mut().take();
        if let Some(f) = f {
            f()
        }
    }

    pub fn is_pending(&self) -> bool {
        self.0.borrow().is_some()
    }
}

impl std::fmt::Debug for Dispose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Dispose").field(&self.is_pending()).finish()
    }
}

/// Helper to build an effect's cleanup.
pub fn cleanup(f: impl FnOnce() + 'static) -> Dispose {
    Dispose::new(f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn dispose_runs_once() {
        let hits = Rc::new(Cell::new(0));
        let d = {
            let hits = hits.clone();
            cleanup(move || hits.set(hits.get() + 1))
        };
        let d2 = d.clone();
        assert!(d.is_pending());
        d.run();
        d2.run();
        assert_eq!(hits.get(), 1);
        assert!(!d.is_pending());
    }

    #[test]
    fn none_is_inert() {
        let d = Dispose::none();
        assert!(!d.is_pending());
        d.run();
    }
}
