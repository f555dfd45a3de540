use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::panic::AssertUnwindSafe;
use std::rc::{Rc, Weak};
use std::sync::mpsc;

use slotmap::{SlotMap, new_key_type};
use smallvec::SmallVec;
use web_time::{Duration, Instant};

use crate::error::HookError;
use crate::locals::{self, ContextSnapshot};
use crate::refs::LiveElement;
use crate::render_api::{Frame, PaintSurface};
use crate::scope::Scope;
use crate::view::{Node, NodeKind};

new_key_type! {
    /// One mounted component instance.
    pub struct InstanceId;
}

/// Priority of a queued update. Transition updates are applied only once no
/// sync work is left.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Lane {
    #[default]
    Sync,
    Transition,
}

thread_local! {
    static FRAME: RefCell<Option<RenderFrame>> = const { RefCell::new(None) };
    static HOST: RefCell<Option<Weak<Runtime>>> = const { RefCell::new(None) };
    static LANE: Cell<Lane> = const { Cell::new(Lane::Sync) };
}

#[derive(Clone, Debug)]
pub struct HostConfig {
    /// Upper bound on render passes per flush before giving up with
    /// `HookError::RenderLoop`.
    pub max_passes: usize,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self { max_passes: 64 }
    }
}

/// What one `flush` (or a sequence of them) did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FlushReport {
    pub passes: usize,
    pub renders: usize,
    pub paints: usize,
    pub effects: usize,
}

impl FlushReport {
    pub fn merge(&mut self, other: FlushReport) {
        self.passes += other.passes;
        self.renders += other.renders;
        self.paints += other.paints;
        self.effects += other.effects;
    }
}

/// Render-time state for the instance currently being rendered.
pub(crate) struct RenderFrame {
    pub(crate) runtime: Weak<Runtime>,
    pub(crate) instance: InstanceId,
    pub(crate) depth: usize,
    pub(crate) lane: Lane,
    slots: Rc<RefCell<Vec<Box<dyn Any>>>>,
    cursor: usize,
    children: Vec<(String, InstanceId)>,
    pub(crate) labels: Vec<String>,
}

pub(crate) fn with_frame<R>(f: impl FnOnce(&mut RenderFrame) -> R) -> Option<R> {
    FRAME.with(|fr| fr.borrow_mut().as_mut().map(f))
}

/// Owner identity for cells created by the current render. Outside of a
/// render this is a dead runtime and a null instance, so updates are dropped.
pub(crate) fn frame_owner() -> (Weak<Runtime>, InstanceId) {
    with_frame(|f| (f.runtime.clone(), f.instance)).unwrap_or_default()
}

pub(crate) fn current_runtime() -> Option<Rc<Runtime>> {
    with_frame(|f| f.runtime.upgrade())
        .flatten()
        .or_else(|| HOST.with(|h| h.borrow().as_ref().and_then(Weak::upgrade)))
}

/// Lane the current render was scheduled on.
pub fn render_lane() -> Lane {
    with_frame(|f| f.lane).unwrap_or_default()
}

/// Lane that setter calls made right now will be queued on.
pub fn current_lane() -> Lane {
    LANE.with(Cell::get)
}

pub fn with_lane<R>(lane: Lane, f: impl FnOnce() -> R) -> R {
    struct Restore(Lane);
    impl Drop for Restore {
        fn drop(&mut self) {
            LANE.with(|l| l.set(self.0));
        }
    }
    let _restore = Restore(LANE.with(|l| l.replace(lane)));
    f()
}

/// Slot-based remember, bound to the instance being rendered. The Nth call in
/// a render always refers to the Nth stored value.
pub fn remember<T: 'static>(init: impl FnOnce() -> T) -> Rc<T> {
    let claimed = with_frame(|f| {
        let cursor = f.cursor;
        f.cursor += 1;
        (f.slots.clone(), cursor)
    });
    let Some((slots, cursor)) = claimed else {
        log::warn!("remember called outside of a component render; value will not be retained");
        return Rc::new(init());
    };

    if let Some(slot) = slots.borrow().get(cursor) {
        if let Some(rc) = slot.downcast_ref::<Rc<T>>() {
            return rc.clone();
        }
        log::warn!(
            "remember: slot {} type changed; replacing. \
             Hooks must run in the same order on every render.",
            cursor
        );
    }

    let rc: Rc<T> = Rc::new(init());
    let mut slots = slots.borrow_mut();
    if cursor < slots.len() {
        slots[cursor] = Box::new(rc.clone());
    } else {
        slots.push(Box::new(rc.clone()));
    }
    rc
}

/// Mounts (or updates) a child component under `key`. Must be called while
/// rendering its parent. The child renders after the parent in the same pass.
pub fn component(
    key: impl Into<String>,
    name: &'static str,
    render: impl Fn() -> Node + 'static,
) -> Node {
    let key = key.into();
    let Some((runtime, parent, depth)) = with_frame(|f| (f.runtime.clone(), f.instance, f.depth))
    else {
        log::warn!("component '{name}' created outside of a render; nothing mounted");
        return Node::empty();
    };
    let Some(rt) = runtime.upgrade() else {
        return Node::empty();
    };
    if with_frame(|f| f.children.iter().any(|(k, _)| *k == key)).unwrap_or(false) {
        log::warn!("component key '{key}' used twice in one render; second use skipped");
        return Node::empty();
    }

    let render: Rc<dyn Fn() -> Node> = Rc::new(render);
    let context = locals::snapshot();
    let id = rt.mount_child(parent, depth + 1, &key, name, render, context);
    with_frame(|f| f.children.push((key, id)));
    rt.mark_dirty(id, depth + 1);
    Node::mount(id)
}

pub(crate) struct Instance {
    name: &'static str,
    depth: usize,
    render: Rc<dyn Fn() -> Node>,
    slots: Rc<RefCell<Vec<Box<dyn Any>>>>,
    scope: Scope,
    context: Rc<ContextSnapshot>,
    output: Node,
    children: Vec<(String, InstanceId)>,
    labels: Vec<String>,
    detached: bool,
}

impl Instance {
    fn new(
        name: &'static str,
        depth: usize,
        render: Rc<dyn Fn() -> Node>,
        context: Rc<ContextSnapshot>,
    ) -> Self {
        Self {
            name,
            depth,
            render,
            slots: Rc::new(RefCell::new(Vec::new())),
            scope: Scope::new(),
            context,
            output: Node::empty(),
            children: Vec::new(),
            labels: Vec::new(),
            detached: false,
        }
    }
}

/// Something holding queued updates for one instance (a state or reducer cell).
pub(crate) trait QueuedUpdates {
    fn owner(&self) -> InstanceId;
    /// Applies updates queued on `lane` in order. Sync application stops at
    /// the first transition update. Returns whether anything was applied.
    fn apply(&self, lane: Lane, errors: &mut Vec<HookError>) -> bool;
    fn has_queued(&self) -> bool;
    fn set_listed(&self, listed: bool);
    fn clear(&self);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum EffectTier {
    Insertion,
    Layout,
    Passive,
}

pub(crate) struct PendingEffect {
    pub(crate) instance: InstanceId,
    pub(crate) depth: usize,
    pub(crate) tier: EffectTier,
    pub(crate) run: Box<dyn FnOnce()>,
}

/// `None` when the work panicked.
type Delivery = (u64, Option<Box<dyn Any + Send>>);
type Waiting = Box<dyn FnOnce(Box<dyn Any + Send>)>;

struct External {
    tx: mpsc::Sender<Delivery>,
    rx: mpsc::Receiver<Delivery>,
    waiting: RefCell<HashMap<u64, Waiting>>,
    next_ticket: Cell<u64>,
}

impl External {
    fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            tx,
            rx,
            waiting: RefCell::new(HashMap::new()),
            next_ticket: Cell::new(0),
        }
    }
}

pub(crate) struct Runtime {
    config: HostConfig,
    instances: RefCell<SlotMap<InstanceId, Instance>>,
    dirty: RefCell<BTreeSet<(usize, InstanceId)>>,
    queued: RefCell<Vec<Rc<dyn QueuedUpdates>>>,
    effects: RefCell<Vec<PendingEffect>>,
    unmounting: RefCell<Vec<InstanceId>>,
    elements: RefCell<HashMap<String, Rc<LiveElement>>>,
    damage: Rc<Cell<bool>>,
    next_id: Cell<u64>,
    errors: RefCell<Vec<HookError>>,
    external: External,
}

impl Runtime {
    fn new(config: HostConfig) -> Self {
        Self {
            config,
            instances: RefCell::new(SlotMap::with_key()),
            dirty: RefCell::new(BTreeSet::new()),
            queued: RefCell::new(Vec::new()),
            effects: RefCell::new(Vec::new()),
            unmounting: RefCell::new(Vec::new()),
            elements: RefCell::new(HashMap::new()),
            damage: Rc::new(Cell::new(false)),
            next_id: Cell::new(0),
            errors: RefCell::new(Vec::new()),
            external: External::new(),
        }
    }

    pub(crate) fn is_live(&self, id: InstanceId) -> bool {
        self.instances
            .borrow()
            .get(id)
            .is_some_and(|i| !i.detached)
    }

    pub(crate) fn next_id(&self) -> u64 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }

    pub(crate) fn mark_dirty(&self, id: InstanceId, depth: usize) {
        self.dirty.borrow_mut().insert((depth, id));
    }

    pub(crate) fn queue_cell(&self, cell: Rc<dyn QueuedUpdates>) {
        self.queued.borrow_mut().push(cell);
    }

    pub(crate) fn schedule_effect(&self, effect: PendingEffect) {
        self.effects.borrow_mut().push(effect);
    }

    fn mount_child(
        &self,
        parent: InstanceId,
        depth: usize,
        key: &str,
        name: &'static str,
        render: Rc<dyn Fn() -> Node>,
        context: Rc<ContextSnapshot>,
    ) -> InstanceId {
        let mut instances = self.instances.borrow_mut();
        let existing = instances
            .get(parent)
            .and_then(|p| p.children.iter().find(|(k, _)| k == key).map(|(_, id)| *id))
            .filter(|id| instances.get(*id).is_some_and(|c| c.name == name));

        match existing.and_then(|id| instances.get_mut(id).map(|c| (id, c))) {
            Some((id, child)) => {
                child.render = render;
                child.context = context;
                id
            }
            None => {
                let id = instances.insert(Instance::new(name, depth, render, context));
                log::debug!("mount {name} ({id:?})");
                id
            }
        }
    }

    fn render_instance(self: &Rc<Self>, id: InstanceId, lane: Lane) -> bool {
        let Some((name, depth, render, slots, scope, context)) = self
            .instances
            .borrow()
            .get(id)
            .filter(|i| !i.detached)
            .map(|i| {
                (
                    i.name,
                    i.depth,
                    i.render.clone(),
                    i.slots.clone(),
                    i.scope.clone(),
                    i.context.clone(),
                )
            })
        else {
            return false;
        };

        log::trace!("render {name} ({id:?}) on {lane:?}");
        let frame = RenderFrame {
            runtime: Rc::downgrade(self),
            instance: id,
            depth,
            lane,
            slots,
            cursor: 0,
            children: Vec::new(),
            labels: Vec::new(),
        };
        let prev = FRAME.with(|f| f.borrow_mut().replace(frame));
        let output = locals::with_snapshot(&context, || scope.run(|| render()));
        let Some(frame) = FRAME.with(|f| std::mem::replace(&mut *f.borrow_mut(), prev)) else {
            return false;
        };

        let stale: Vec<InstanceId> = {
            let mut instances = self.instances.borrow_mut();
            let Some(inst) = instances.get_mut(id) else {
                return false;
            };
            inst.output = output;
            inst.labels = frame.labels;
            let old = std::mem::replace(&mut inst.children, frame.children);
            let kept: HashSet<InstanceId> = inst.children.iter().map(|(_, c)| *c).collect();
            old.into_iter()
                .map(|(_, c)| c)
                .filter(|c| !kept.contains(c))
                .collect()
        };
        for child in stale {
            self.detach_tree(child);
            self.unmounting.borrow_mut().push(child);
        }
        true
    }

    fn detach_tree(&self, id: InstanceId) {
        let children: Vec<InstanceId> = {
            let mut instances = self.instances.borrow_mut();
            let Some(inst) = instances.get_mut(id) else {
                return;
            };
            inst.detached = true;
            inst.children.iter().map(|(_, c)| *c).collect()
        };
        for c in children {
            self.detach_tree(c);
        }
    }

    fn unmount_tree(&self, id: InstanceId) {
        let children: Vec<InstanceId> = self
            .instances
            .borrow()
            .get(id)
            .map(|i| i.children.iter().map(|(_, c)| *c).collect())
            .unwrap_or_default();
        for c in children {
            self.unmount_tree(c);
        }

        let removed = self.instances.borrow_mut().remove(id);
        if let Some(inst) = removed {
            log::debug!("unmount {} ({id:?})", inst.name);
            self.dirty.borrow_mut().retain(|(_, d)| *d != id);
            // Cleanups may call setters; the instance is already gone so those
            // are dropped.
            inst.scope.dispose();
        }
    }

    fn apply_updates(&self, lane: Lane) -> bool {
        let cells = std::mem::take(&mut *self.queued.borrow_mut());
        let mut any = false;
        let mut keep = Vec::new();
        let mut errors = Vec::new();

        for cell in cells {
            let owner = cell.owner();
            let depth = self
                .instances
                .borrow()
                .get(owner)
                .filter(|i| !i.detached)
                .map(|i| i.depth);
            let Some(depth) = depth else {
                log::debug!("dropping updates queued for unmounted {owner:?}");
                cell.clear();
                cell.set_listed(false);
                continue;
            };
            if cell.apply(lane, &mut errors) {
                self.mark_dirty(owner, depth);
                any = true;
            }
            if cell.has_queued() {
                keep.push(cell);
            } else {
                cell.set_listed(false);
            }
        }

        let mut queued = self.queued.borrow_mut();
        let fresh = std::mem::take(&mut *queued);
        *queued = keep;
        queued.extend(fresh);
        self.errors.borrow_mut().extend(errors);
        any
    }

    fn render_dirty(self: &Rc<Self>, lane: Lane) -> usize {
        let mut renders = 0;
        loop {
            let next = self.dirty.borrow_mut().pop_first();
            let Some((_, id)) = next else {
                break;
            };
            if self.render_instance(id, lane) {
                renders += 1;
            }
        }
        renders
    }

    fn commit_unmounts(&self) {
        let ids = std::mem::take(&mut *self.unmounting.borrow_mut());
        for id in ids {
            self.unmount_tree(id);
        }
    }

    /// Runs every queued effect of `tier`, deepest instances first so a
    /// child's handles are attached before its parent's effects run.
    fn run_effects(&self, tier: EffectTier) -> usize {
        let mut due: SmallVec<[PendingEffect; 8]> = SmallVec::new();
        {
            let mut all = self.effects.borrow_mut();
            let mut rest = Vec::with_capacity(all.len());
            for e in all.drain(..) {
                if e.tier == tier {
                    due.push(e);
                } else {
                    rest.push(e);
                }
            }
            *all = rest;
        }
        due.sort_by(|a, b| b.depth.cmp(&a.depth));

        let mut ran = 0;
        for effect in due {
            if self.is_live(effect.instance) {
                log::trace!("{:?} effect for {:?}", effect.tier, effect.instance);
                (effect.run)();
                ran += 1;
            }
        }
        ran
    }

    fn has_sync_work(&self) -> bool {
        if !self.dirty.borrow().is_empty() {
            return true;
        }
        let queued = self.queued.borrow().iter().any(|c| c.has_queued());
        queued && self.apply_updates(Lane::Sync)
    }

    fn resolve(&self, node: &Node) -> Node {
        if let NodeKind::Mount { instance } = &node.kind {
            let output = self
                .instances
                .borrow()
                .get(*instance)
                .map(|i| i.output.clone());
            return match output {
                Some(out) => self.resolve(&out),
                None => Node::empty(),
            };
        }
        Node {
            kind: node.kind.clone(),
            children: node.children.iter().map(|c| self.resolve(c)).collect(),
        }
    }

    /// Attaches live elements to inputs, binds their node refs, and drops
    /// elements whose input is gone. Inputs with an id keep their element
    /// wherever they move; the rest are keyed by tree position.
    fn bind_elements(&self, tree: &mut Node) {
        fn walk(
            node: &mut Node,
            path: &mut String,
            elements: &mut HashMap<String, Rc<LiveElement>>,
            seen: &mut HashSet<String>,
            damage: &Rc<Cell<bool>>,
        ) {
            if let NodeKind::Input {
                id,
                value,
                node_ref,
                live,
                ..
            } = &mut node.kind
            {
                let key = element_key(id.as_deref(), path);
                let el = elements
                    .entry(key.clone())
                    .or_insert_with(|| {
                        Rc::new(LiveElement::new(
                            value.clone().unwrap_or_default(),
                            damage.clone(),
                        ))
                    })
                    .clone();
                if let Some(v) = value {
                    el.sync_prop(v);
                }
                if let Some(r) = node_ref {
                    r.bind(&el);
                }
                seen.insert(key);
                *live = Some(el);
            }
            for (i, c) in node.children.iter_mut().enumerate() {
                let len = path.len();
                path.push('/');
                path.push_str(&i.to_string());
                walk(c, path, elements, seen, damage);
                path.truncate(len);
            }
        }

        let mut seen = HashSet::new();
        let mut elements = self.elements.borrow_mut();
        walk(tree, &mut String::from("0"), &mut elements, &mut seen, &self.damage);
        elements.retain(|k, _| seen.contains(k));
    }

    /// Same traversal as `bind_elements`, read only.
    fn attach_existing(&self, tree: &mut Node) {
        fn walk(node: &mut Node, path: &mut String, elements: &HashMap<String, Rc<LiveElement>>) {
            if let NodeKind::Input { id, live, .. } = &mut node.kind {
                *live = elements.get(&element_key(id.as_deref(), path)).cloned();
            }
            for (i, c) in node.children.iter_mut().enumerate() {
                let len = path.len();
                path.push('/');
                path.push_str(&i.to_string());
                walk(c, path, elements);
                path.truncate(len);
            }
        }
        walk(tree, &mut String::from("0"), &self.elements.borrow());
    }

    fn deliver(&self, (ticket, payload): Delivery) {
        let waiting = self.external.waiting.borrow_mut().remove(&ticket);
        match (waiting, payload) {
            (Some(on_done), Some(payload)) => on_done(payload),
            (Some(_), None) => log::error!("external work {ticket} panicked; no result"),
            (None, _) => log::warn!("external result {ticket} has no receiver"),
        }
    }
}

fn element_key(id: Option<&str>, path: &str) -> String {
    match id {
        Some(id) => format!("#{id}"),
        None => path.to_string(),
    }
}

/// Runs `work` on a worker thread and hands its result to `on_done` on the
/// host thread during a later turn (`Host::poll_external` or
/// `Host::run_until_idle`). Nothing cancels the work; `on_done` runs even if
/// the component that started it has unmounted. If `work` panics, `on_done`
/// never runs and the result is no longer awaited.
pub fn spawn_blocking<T: Send + 'static>(
    work: impl FnOnce() -> T + Send + 'static,
    on_done: impl FnOnce(T) + 'static,
) -> Result<(), HookError> {
    let rt = current_runtime().ok_or(HookError::NoHost)?;
    let ticket = rt.external.next_ticket.get();
    rt.external.next_ticket.set(ticket + 1);

    rt.external.waiting.borrow_mut().insert(
        ticket,
        Box::new(move |payload: Box<dyn Any + Send>| match payload.downcast::<T>() {
            Ok(value) => on_done(*value),
            Err(_) => log::error!("external result {ticket} had an unexpected type"),
        }),
    );

    let tx = rt.external.tx.clone();
    let spawned = std::thread::Builder::new()
        .name(format!("hooklab-worker-{ticket}"))
        .spawn(move || {
            let out = std::panic::catch_unwind(AssertUnwindSafe(work))
                .ok()
                .map(|v| Box::new(v) as Box<dyn Any + Send>);
            // The host may be gone by now; nobody is waiting then.
            let _ = tx.send((ticket, out));
        });
    if let Err(e) = spawned {
        rt.external.waiting.borrow_mut().remove(&ticket);
        return Err(HookError::WorkerSpawn {
            reason: e.to_string(),
        });
    }
    Ok(())
}

/// Makes the runtime reachable from free functions for the duration of a turn.
struct HostGuard(Option<Weak<Runtime>>);

impl HostGuard {
    fn enter(rt: &Rc<Runtime>) -> Self {
        Self(HOST.with(|h| h.borrow_mut().replace(Rc::downgrade(rt))))
    }
}

impl Drop for HostGuard {
    fn drop(&mut self) {
        let prev = self.0.take();
        HOST.with(|h| *h.borrow_mut() = prev);
    }
}

/// Headless event loop: owns the component tree, applies updates, renders,
/// runs effects in tier order and paints to `S`.
pub struct Host<S: PaintSurface> {
    runtime: Rc<Runtime>,
    root: InstanceId,
    surface: S,
    frames: u64,
}

impl<S: PaintSurface> Host<S> {
    pub fn new(
        config: HostConfig,
        surface: S,
        name: &'static str,
        render: impl Fn() -> Node + 'static,
    ) -> Self {
        let runtime = Rc::new(Runtime::new(config));
        let root = runtime.instances.borrow_mut().insert(Instance::new(
            name,
            0,
            Rc::new(render),
            locals::snapshot(),
        ));
        log::debug!("mount {name} ({root:?}) as root");
        runtime.mark_dirty(root, 0);
        Self {
            runtime,
            root,
            surface,
            frames: 0,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn is_mounted(&self) -> bool {
        self.runtime.is_live(self.root)
    }

    pub fn instance_count(&self) -> usize {
        self.runtime.instances.borrow().len()
    }

    /// Resolved tree as it would be painted now, including live input values.
    pub fn tree(&self) -> Node {
        let root = self
            .runtime
            .instances
            .borrow()
            .get(self.root)
            .map(|i| i.output.clone());
        let mut tree = match root {
            Some(out) => self.runtime.resolve(&out),
            None => Node::empty(),
        };
        self.runtime.attach_existing(&mut tree);
        tree
    }

    pub fn text_content(&self) -> String {
        self.tree().text_content()
    }

    /// Whether some text node currently shows exactly `needle`.
    pub fn find_text(&self, needle: &str) -> bool {
        self.tree().contains_text(needle)
    }

    /// Labels recorded by `use_debug_value`, per instance name.
    pub fn debug_labels(&self) -> Vec<(&'static str, Vec<String>)> {
        self.runtime
            .instances
            .borrow()
            .values()
            .filter(|i| !i.labels.is_empty())
            .map(|i| (i.name, i.labels.clone()))
            .collect()
    }

    /// Drives the loop until nothing is dirty: apply updates, render, commit
    /// (insertion then layout effects), paint, then passive effects.
    pub fn flush(&mut self) -> Result<FlushReport, HookError> {
        let _host = HostGuard::enter(&self.runtime);
        let rt = self.runtime.clone();
        let mut report = FlushReport::default();

        loop {
            let mut lane = Lane::Sync;
            rt.apply_updates(Lane::Sync);
            let sync_idle = rt.dirty.borrow().is_empty();
            if sync_idle && rt.apply_updates(Lane::Transition) {
                lane = Lane::Transition;
            }

            let needs_render = !rt.dirty.borrow().is_empty();
            let effects_due = !rt.effects.borrow().is_empty();
            if !needs_render && !rt.damage.get() && !effects_due {
                break;
            }

            report.passes += 1;
            if report.passes > rt.config.max_passes {
                log::error!(
                    "giving up after {} passes; some effect keeps scheduling updates",
                    rt.config.max_passes
                );
                return Err(HookError::RenderLoop {
                    passes: rt.config.max_passes,
                });
            }

            report.renders += rt.render_dirty(lane);
            rt.commit_unmounts();

            let mut tree = self.tree();
            rt.bind_elements(&mut tree);

            report.effects += rt.run_effects(EffectTier::Insertion);
            report.effects += rt.run_effects(EffectTier::Layout);
            if rt.has_sync_work() {
                // Layout effects scheduled more work: render again before paint.
                continue;
            }

            rt.damage.set(false);
            self.frames += 1;
            let frame = Frame {
                number: self.frames,
                tree: self.tree(),
            };
            self.surface.paint(&frame);
            report.paints += 1;

            report.effects += rt.run_effects(EffectTier::Passive);
        }

        let errors = std::mem::take(&mut *rt.errors.borrow_mut());
        match errors.into_iter().next() {
            Some(e) => Err(e),
            None => Ok(report),
        }
    }

    /// Runs `handler` as one event turn, then flushes. Every update the
    /// handler queues lands in the same render.
    pub fn turn(&mut self, handler: impl FnOnce()) -> Result<FlushReport, HookError> {
        {
            let _host = HostGuard::enter(&self.runtime);
            handler();
        }
        self.flush()
    }

    pub fn click(&mut self, label: &str) -> Result<FlushReport, HookError> {
        let on_click = self.tree().find_button(label).and_then(|n| match &n.kind {
            NodeKind::Button { on_click, .. } => on_click.clone(),
            _ => None,
        });
        let Some(on_click) = on_click else {
            if self.tree().find_button(label).is_some() {
                log::debug!("button '{label}' has no click handler");
                return self.flush();
            }
            return Err(HookError::NoSuchTarget {
                selector: label.to_string(),
            });
        };
        log::debug!("click '{label}'");
        self.turn(|| on_click())
    }

    /// Types `text` one character per turn into the input matched by
    /// `selector` (id or placeholder, empty for the first input).
    pub fn type_text(&mut self, selector: &str, text: &str) -> Result<FlushReport, HookError> {
        let mut report = FlushReport::default();
        for ch in text.chars() {
            let tree = self.tree();
            let target = tree.find_input(selector).and_then(|n| match &n.kind {
                NodeKind::Input { on_change, live, .. } => Some((on_change.clone(), live.clone())),
                _ => None,
            });
            let Some((on_change, live)) = target else {
                return Err(HookError::NoSuchTarget {
                    selector: selector.to_string(),
                });
            };
            let next = match &live {
                Some(el) => {
                    let mut v = el.value();
                    v.push(ch);
                    el.write_quiet(v.clone());
                    v
                }
                None => ch.to_string(),
            };
            log::trace!("input '{selector}' <- {next:?}");
            report.merge(self.turn(move || {
                if let Some(on_change) = on_change {
                    on_change(next);
                }
            })?);
        }
        Ok(report)
    }

    pub fn has_pending_external(&self) -> bool {
        !self.runtime.external.waiting.borrow().is_empty()
    }

    /// Delivers every external result that has already arrived, each as its
    /// own turn, then flushes.
    pub fn poll_external(&mut self) -> Result<usize, HookError> {
        let mut delivered = 0;
        while let Ok(d) = self.runtime.external.rx.try_recv() {
            let _host = HostGuard::enter(&self.runtime);
            self.runtime.deliver(d);
            delivered += 1;
        }
        if delivered > 0 {
            self.flush()?;
        }
        Ok(delivered)
    }

    /// Flushes, then keeps delivering external results until none are
    /// outstanding or `timeout` passes.
    pub fn run_until_idle(&mut self, timeout: Duration) -> Result<FlushReport, HookError> {
        let deadline = Instant::now() + timeout;
        let mut report = self.flush()?;
        while self.has_pending_external() {
            let now = Instant::now();
            if now >= deadline {
                log::warn!(
                    "stopped waiting with {} external result(s) outstanding",
                    self.runtime.external.waiting.borrow().len()
                );
                break;
            }
            match self.runtime.external.rx.recv_timeout(deadline - now) {
                Ok(d) => {
                    {
                        let _host = HostGuard::enter(&self.runtime);
                        self.runtime.deliver(d);
                    }
                    report.merge(self.flush()?);
                }
                Err(mpsc::RecvTimeoutError::Timeout) => continue,
                Err(mpsc::RecvTimeoutError::Disconnected) => break,
            }
        }
        Ok(report)
    }

    /// Unmounts the whole tree, running every remaining cleanup.
    pub fn unmount(&mut self) {
        if self.runtime.instances.borrow().get(self.root).is_none() {
            return;
        }
        let _host = HostGuard::enter(&self.runtime);
        self.runtime.effects.borrow_mut().clear();
        self.runtime.unmount_tree(self.root);
        self.runtime.elements.borrow_mut().clear();
    }
}

impl<S: PaintSurface> Drop for Host<S> {
    fn drop(&mut self) {
        self.unmount();
    }
}
