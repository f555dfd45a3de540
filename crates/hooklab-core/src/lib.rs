//! # Components, hooks and the host loop
//!
//! Hooklab is a small single-threaded component runtime. A component is a
//! plain function returning a [`Node`] tree; everything it remembers between
//! renders lives in hook slots of its instance:
//!
//! - `use_state` / `use_reducer`: local state behind a setter or dispatch.
//! - `use_effect` / `use_layout_effect` / `use_insertion_effect`: side
//!   effects with cleanup, on three timing tiers.
//! - `use_ref` / `use_node_ref` / `use_imperative_handle`: escape hatches.
//! - `use_context`, `use_memo`, `use_callback`, `use_id`, `use_transition`,
//!   `use_deferred_value`, `use_sync_external_store`, `use_debug_value`.
//!
//! ## State
//!
//! ```rust
//! use hooklab_core::*;
//!
//! fn Counter() -> Node {
//!     let (count, set_count) = use_state(|| 0);
//!     Node::new(NodeKind::Button {
//!         label: format!("Count = {count}"),
//!         on_click: Some(std::rc::Rc::new(move || set_count.update(|c| c + 1))),
//!     })
//! }
//!
//! let mut host = Host::new(HostConfig::default(), NullSurface, "Counter", Counter);
//! host.flush().unwrap();
//! host.click("Count = 0").unwrap();
//! assert_eq!(host.text_content(), "Count = 1");
//! ```
//!
//! Setters only queue. Everything queued during one event turn is applied in
//! order before a single re-render.
//!
//! ## Effects and cleanup
//!
//! Each effect returns a [`Dispose`]; it runs before the effect's next run
//! and at unmount. Per commit the host runs insertion effects, then layout
//! effects, paints, then runs passive effects:
//!
//! ```rust
//! use hooklab_core::*;
//!
//! fn Example() -> Node {
//!     use_effect(Deps::once(), || {
//!         log::info!("Mounted Example");
//!         cleanup(|| log::info!("Unmounted Example"))
//!     });
//!     Node::empty()
//! }
//! ```
//!
//! Long-running work goes through `spawn_blocking`, whose result comes back
//! on the host thread in a later turn. Nothing cancels it; an effect that
//! cares about late results has to say so in its cleanup.

pub mod effects;
pub mod effects_ext;
pub mod error;
pub mod locals;
pub mod memo;
pub mod prelude;
pub mod refs;
pub mod render_api;
pub mod runtime;
pub mod scope;
pub mod state;
pub mod store;
pub mod transition;
pub mod view;

mod tests;

pub use effects::*;
pub use effects_ext::*;
pub use error::*;
pub use locals::{provide_context, use_context};
pub use memo::*;
pub use prelude::*;
pub use refs::*;
pub use render_api::*;
pub use runtime::{
    FlushReport, Host, HostConfig, InstanceId, Lane, component, current_lane, remember,
    render_lane, spawn_blocking, with_lane,
};
pub use scope::*;
pub use state::*;
pub use store::*;
pub use transition::*;
pub use view::*;
