pub use crate::effects::{Dispose, cleanup};
pub use crate::effects_ext::{Deps, use_effect, use_insertion_effect, use_layout_effect};
pub use crate::error::HookError;
pub use crate::locals::{provide_context, use_context};
pub use crate::memo::{use_callback, use_debug_value, use_id, use_memo};
pub use crate::refs::{
    HandleRef, NodeRef, Ref, use_handle_ref, use_imperative_handle, use_node_ref, use_ref,
};
pub use crate::render_api::{Frame, NullSurface, PaintSurface};
pub use crate::runtime::{
    FlushReport, Host, HostConfig, InstanceId, component, remember, spawn_blocking,
};
pub use crate::state::{
    Dispatch, Setter, UnhandledAction, use_reducer, use_reducer_strict, use_reducer_with,
    use_state,
};
pub use crate::store::{ExternalStore, MemoryStore, use_sync_external_store};
pub use crate::transition::{StartTransition, start_transition, use_deferred_value, use_transition};
pub use crate::view::{IntoChildren, Node, NodeKind, Tag};
