use std::cell::RefCell;

use crate::effects::Dispose;
use crate::runtime::{EffectTier, PendingEffect, frame_owner, remember, with_frame};
use crate::scope::on_dispose;

/// When an effect (or memo) reruns.
#[derive(Clone, Debug, PartialEq)]
pub enum Deps<D> {
    /// After every render.
    Always,
    /// When the value differs from the one seen at the previous render.
    Track(D),
}

impl Deps<()> {
    /// Empty dependency list: run at mount, clean up at unmount.
    pub fn once() -> Self {
        Deps::Track(())
    }

    pub fn always() -> Self {
        Deps::Always
    }
}

impl<D: PartialEq> Deps<D> {
    pub fn on(value: D) -> Self {
        Deps::Track(value)
    }

    pub(crate) fn changed_from(&self, prev: Option<&D>) -> bool {
        match self {
            Deps::Always => true,
            Deps::Track(d) => prev != Some(d),
        }
    }

    pub(crate) fn into_tracked(self) -> Option<D> {
        match self {
            Deps::Always => None,
            Deps::Track(d) => Some(d),
        }
    }
}

struct EffectSlot<D> {
    deps: Option<D>,
    cleanup: Option<Dispose>,
    installed: bool,
}

fn register_effect<D: PartialEq + 'static>(
    tier: EffectTier,
    deps: Deps<D>,
    effect: impl FnOnce() -> Dispose + 'static,
) {
    let slot = remember(|| {
        RefCell::new(EffectSlot::<D> {
            deps: None,
            cleanup: None,
            installed: false,
        })
    });

    // Install a single unmount disposer for this callsite.
    let install = !std::mem::replace(&mut slot.borrow_mut().installed, true);
    if install {
        let slot = slot.clone();
        on_dispose(move || {
            let cleanup = slot.borrow_mut().cleanup.take();
            if let Some(d) = cleanup {
                d.run();
            }
        });
    }

    if !deps.changed_from(slot.borrow().deps.as_ref()) {
        return;
    }
    if let Some(d) = deps.into_tracked() {
        slot.borrow_mut().deps = Some(d);
    }

    let (runtime, instance) = frame_owner();
    let depth = with_frame(|f| f.depth).unwrap_or_default();
    let Some(rt) = runtime.upgrade() else {
        log::warn!("effect registered outside of a component render; it will never run");
        return;
    };

    rt.schedule_effect(PendingEffect {
        instance,
        depth,
        tier,
        run: Box::new(move || {
            // Cleanup-then-run when the effect fires again.
            let prev = slot.borrow_mut().cleanup.take();
            if let Some(d) = prev {
                d.run();
            }
            let d = effect();
            slot.borrow_mut().cleanup = Some(d);
        }),
    });
}

/// Post-paint effect. Runs after the frame it belongs to has been painted.
pub fn use_effect<D: PartialEq + 'static>(
    deps: Deps<D>,
    effect: impl FnOnce() -> Dispose + 'static,
) {
    register_effect(EffectTier::Passive, deps, effect);
}

/// Pre-paint effect. Runs synchronously after commit, before paint; updates
/// it schedules are rendered before the frame is painted.
pub fn use_layout_effect<D: PartialEq + 'static>(
    deps: Deps<D>,
    effect: impl FnOnce() -> Dispose + 'static,
) {
    register_effect(EffectTier::Layout, deps, effect);
}

/// Runs before every layout effect of the same commit. Meant for injecting
/// style rules that layout effects may read.
pub fn use_insertion_effect<D: PartialEq + 'static>(
    deps: Deps<D>,
    effect: impl FnOnce() -> Dispose + 'static,
) {
    register_effect(EffectTier::Insertion, deps, effect);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn once_changes_only_first_time() {
        let d = Deps::once();
        assert!(d.changed_from(None));
        assert!(!d.changed_from(Some(&())));
    }

    #[test]
    fn always_always_changes() {
        assert!(Deps::always().changed_from(Some(&())));
    }

    #[test]
    fn tracked_compares_values() {
        assert!(!Deps::on(3).changed_from(Some(&3)));
        assert!(Deps::on(4).changed_from(Some(&3)));
    }
}
