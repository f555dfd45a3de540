#![allow(non_snake_case)]
//! One small component per hook, plus a showcase that uses all of them.
//!
//! Every demo is an ordinary component function. [`Demo::mount`] wires one
//! into a [`Host`] together with the collaborators it needs:
//!
//! ```rust
//! use hooklab_core::HostConfig;
//! use hooklab_demos::{Demo, DemoEnv};
//! use hooklab_ui::TextSurface;
//!
//! let env = DemoEnv::offline();
//! let mut host = Demo::Reducer.mount(&env, TextSurface::new(), HostConfig::default());
//! host.flush().unwrap();
//! host.click("Click Here").unwrap();
//! assert!(host.find_text("1"));
//! assert!(!host.find_text("This is a text"));
//! ```

pub mod all_hooks;
pub mod console;
pub mod effect_tutorial;
pub mod feed;
pub mod imperative_handle;
pub mod layout_effect_tutorial;
pub mod reducer_tutorial;
pub mod state_tutorial;


use std::rc::Rc;
use std::sync::Arc;

use hooklab_core::{
    Host, HostConfig, HandleRef, MemoryStore, Node, PaintSurface, component, provide_context,
};

pub use all_hooks::{AllHooksDemo, AllHooksHandle, AllHooksProps, StoreState, StyleSheet, Theme};
pub use console::Console;
pub use effect_tutorial::EffectTutorial;
pub use feed::{CommentFeed, FeedConfig, FeedError, HttpCommentFeed};
pub use imperative_handle::{ImperativeHandle, ToggleButton, ToggleHandle};
pub use layout_effect_tutorial::LayoutEffectTutorial;
pub use reducer_tutorial::{CounterAction, CounterState, ReducerTutorial};
pub use state_tutorial::StateTutorial;

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Demo {
    State,
    Effect,
    LayoutEffect,
    Reducer,
    ImperativeHandle,
    AllHooks,
}

impl Demo {
    pub fn name(self) -> &'static str {
        match self {
            Demo::State => "StateTutorial",
            Demo::Effect => "EffectTutorial",
            Demo::LayoutEffect => "LayoutEffectTutorial",
            Demo::Reducer => "ReducerTutorial",
            Demo::ImperativeHandle => "ImperativeHandle",
            Demo::AllHooks => "App",
        }
    }

    /// Root render function for this demo.
    pub fn root(self, env: &DemoEnv) -> Box<dyn Fn() -> Node> {
        match self {
            Demo::State => Box::new(StateTutorial),
            Demo::Effect => {
                let (feed, console) = (env.feed.clone(), env.console.clone());
                Box::new(move || EffectTutorial(&feed, &console))
            }
            Demo::LayoutEffect => {
                let console = env.console.clone();
                Box::new(move || LayoutEffectTutorial(&console))
            }
            Demo::Reducer => Box::new(ReducerTutorial),
            Demo::ImperativeHandle => Box::new(ImperativeHandle),
            Demo::AllHooks => {
                let (theme, props) = (env.theme.clone(), env.all_hooks.clone());
                Box::new(move || {
                    let props = props.clone();
                    provide_context(theme.clone(), || {
                        component("all-hooks", "AllHooksDemo", move || AllHooksDemo(&props))
                    })
                })
            }
        }
    }

    pub fn mount<S: PaintSurface>(self, env: &DemoEnv, surface: S, config: HostConfig) -> Host<S> {
        log::debug!("mounting {}", self.name());
        Host::new(config, surface, self.name(), self.root(env))
    }
}

/// Everything the demos talk to outside their own state.
pub struct DemoEnv {
    pub feed: Arc<dyn CommentFeed>,
    pub console: Console,
    pub store: MemoryStore<StoreState>,
    pub theme: Theme,
    pub all_hooks: AllHooksProps,
}

impl DemoEnv {
    pub fn new(feed: Arc<dyn CommentFeed>, console: Console) -> Self {
        let store = MemoryStore::new(StoreState::default());
        let all_hooks = AllHooksProps {
            handle: HandleRef::new(),
            store: Rc::new(store.clone()),
            styles: StyleSheet::new(),
            console: console.clone(),
        };
        Self {
            feed,
            console,
            store,
            theme: Theme::default(),
            all_hooks,
        }
    }

    /// Capturing console and a feed that never reaches the network.
    pub fn offline() -> Self {
        Self::new(Arc::new(OfflineFeed), Console::capture())
    }
}

struct OfflineFeed;

impl CommentFeed for OfflineFeed {
    fn first_email(&self) -> Result<String, FeedError> {
        Err(FeedError::EmptyListing)
    }
}
