use thiserror::Error;

/// Failures surfaced by the runtime. Misuse that the runtime can recover from
/// (a hook slot changing type, a setter firing after unmount) is logged instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HookError {
    /// An imperative handle was called before the child published it, or after
    /// the child unmounted.
    #[error("imperative handle is not attached; the owning component has not mounted")]
    HandleNotMounted,

    /// A node ref was read or written while no live element was bound to it.
    #[error("node ref is not bound to a mounted element")]
    NodeNotMounted,

    /// A strict reducer returned no transition for an action.
    #[error("reducer has no transition for action {action}")]
    UnhandledAction { action: String },

    /// Updates kept scheduling more updates past the configured pass limit.
    #[error("updates did not settle after {passes} render passes")]
    RenderLoop { passes: usize },

    /// A host-only operation ran outside of a render, effect or event turn.
    #[error("no host is running on this thread")]
    NoHost,

    /// The worker thread for `spawn_blocking` could not be started.
    #[error("could not start worker thread: {reason}")]
    WorkerSpawn { reason: String },

    /// An event was aimed at a node that is not in the current tree.
    #[error("no node matches '{selector}'")]
    NoSuchTarget { selector: String },
}
