#![allow(non_snake_case)]
//! Primitive node constructors and a headless text painter.

pub mod surface;

pub use surface::{TextSurface, render_lines};

use std::rc::Rc;

use hooklab_core::*;

fn block(tag: Tag) -> Node {
    Node::new(NodeKind::Block { tag })
}

pub fn Div() -> Node {
    block(Tag::Div)
}

/// Groups children without adding a line of its own.
pub fn Fragment() -> Node {
    block(Tag::Fragment)
}

pub fn Heading(text: impl Into<String>) -> Node {
    block(Tag::Heading).child(Text(text))
}

pub fn Paragraph(text: impl Into<String>) -> Node {
    block(Tag::Paragraph).child(Text(text))
}

pub fn Span(text: impl Into<String>) -> Node {
    block(Tag::Span).child(Text(text))
}

pub fn Text(text: impl Into<String>) -> Node {
    Node::new(NodeKind::Text { text: text.into() })
}

pub fn Button(label: impl Into<String>, on_click: impl Fn() + 'static) -> Node {
    Node::new(NodeKind::Button {
        label: label.into(),
        on_click: Some(Rc::new(on_click)),
    })
}

/// Uncontrolled text input. Configure it with [`InputExt`].
pub fn Input() -> Node {
    Node::new(NodeKind::Input {
        id: None,
        placeholder: None,
        value: None,
        on_change: None,
        node_ref: None,
        live: None,
    })
}

/// Builder methods for nodes made by [`Input`]. No-ops on other nodes.
pub trait InputExt {
    fn id(self, id: impl Into<String>) -> Node;
    fn placeholder(self, text: impl Into<String>) -> Node;
    /// Makes the input controlled: the live value follows `value` whenever
    /// it changes.
    fn value(self, value: impl Into<String>) -> Node;
    fn on_change(self, f: impl Fn(String) + 'static) -> Node;
    fn node_ref(self, r: &NodeRef) -> Node;
}

impl InputExt for Node {
    fn id(mut self, new_id: impl Into<String>) -> Node {
        if let NodeKind::Input { id, .. } = &mut self.kind {
            *id = Some(new_id.into());
        }
        self
    }

    fn placeholder(mut self, text: impl Into<String>) -> Node {
        if let NodeKind::Input { placeholder, .. } = &mut self.kind {
            *placeholder = Some(text.into());
        }
        self
    }

    fn value(mut self, v: impl Into<String>) -> Node {
        if let NodeKind::Input { value, .. } = &mut self.kind {
            *value = Some(v.into());
        }
        self
    }

    fn on_change(mut self, f: impl Fn(String) + 'static) -> Node {
        if let NodeKind::Input { on_change, .. } = &mut self.kind {
            *on_change = Some(Rc::new(f));
        }
        self
    }

    fn node_ref(mut self, r: &NodeRef) -> Node {
        if let NodeKind::Input { node_ref, .. } = &mut self.kind {
            *node_ref = Some(r.clone());
        }
        self
    }
}

/// `node()` when `cond` holds, otherwise an empty placeholder that keeps
/// later siblings at the same position.
pub fn when(cond: bool, node: impl FnOnce() -> Node) -> Node {
    if cond { node() } else { Node::empty() }
}
