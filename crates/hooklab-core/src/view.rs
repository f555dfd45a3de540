use std::rc::Rc;

use crate::refs::{LiveElement, NodeRef};
use crate::runtime::InstanceId;

pub type Callback = Rc<dyn Fn()>;
pub type TextCallback = Rc<dyn Fn(String)>;

/// Container tags. Containers carry no behaviour, only structure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tag {
    Div,
    Heading,
    Paragraph,
    Span,
    Fragment,
}

impl Tag {
    pub fn name(self) -> &'static str {
        match self {
            Tag::Div => "div",
            Tag::Heading => "h1",
            Tag::Paragraph => "p",
            Tag::Span => "span",
            Tag::Fragment => "",
        }
    }
}

#[derive(Clone)]
pub enum NodeKind {
    Block {
        tag: Tag,
    },
    Text {
        text: String,
    },
    Button {
        label: String,
        on_click: Option<Callback>,
    },
    Input {
        id: Option<String>,
        placeholder: Option<String>,
        /// Controlled value. `None` leaves the live element alone.
        value: Option<String>,
        on_change: Option<TextCallback>,
        node_ref: Option<NodeRef>,
        /// Filled in by the host when the tree is committed.
        live: Option<Rc<LiveElement>>,
    },
    /// Where a child component's output is spliced in.
    Mount {
        instance: InstanceId,
    },
    Empty,
}

impl std::fmt::Debug for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeKind::Block { tag } => f.debug_struct("Block").field("tag", tag).finish(),
            NodeKind::Text { text } => f.debug_struct("Text").field("text", text).finish(),
            NodeKind::Button { label, .. } => f
                .debug_struct("Button")
                .field("label", label)
                .field("on_click", &"<callback>")
                .finish(),
            NodeKind::Input {
                id,
                placeholder,
                value,
                live,
                ..
            } => f
                .debug_struct("Input")
                .field("id", id)
                .field("placeholder", placeholder)
                .field("value", value)
                .field("live", &live.as_ref().map(|l| l.value()))
                .finish(),
            NodeKind::Mount { instance } => {
                f.debug_struct("Mount").field("instance", instance).finish()
            }
            NodeKind::Empty => write!(f, "Empty"),
        }
    }
}

/// Render output: a tree of primitive display nodes.
#[derive(Clone, Debug)]
pub struct Node {
    pub kind: NodeKind,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Node {
            kind,
            children: vec![],
        }
    }

    pub fn empty() -> Self {
        Node::new(NodeKind::Empty)
    }

    pub fn mount(instance: InstanceId) -> Self {
        Node::new(NodeKind::Mount { instance })
    }

    pub fn with_children(mut self, kids: Vec<Node>) -> Self {
        self.children = kids;
        self
    }

    /// Appends one node, a list, an optional node or a tuple of those.
    pub fn child(mut self, kids: impl IntoChildren) -> Self {
        self.children.extend(kids.into_children());
        self
    }

    /// Concatenated visible text, including the live values of inputs.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match &self.kind {
            NodeKind::Text { text } => out.push_str(text),
            NodeKind::Button { label, .. } => out.push_str(label),
            NodeKind::Input { value, live, .. } => match live {
                Some(live) => out.push_str(&live.value()),
                None => out.push_str(value.as_deref().unwrap_or_default()),
            },
            _ => {}
        }
        for c in &self.children {
            c.collect_text(out);
        }
    }

    /// Depth-first search over this node and its descendants.
    pub fn find(&self, pred: &dyn Fn(&Node) -> bool) -> Option<&Node> {
        if pred(self) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(pred))
    }

    pub fn find_button(&self, label: &str) -> Option<&Node> {
        self.find(&|n| matches!(&n.kind, NodeKind::Button { label: l, .. } if l == label))
    }

    /// Matches an input by id or placeholder; an empty selector takes the
    /// first input in the tree.
    pub fn find_input(&self, selector: &str) -> Option<&Node> {
        self.find(&|n| match &n.kind {
            NodeKind::Input {
                id, placeholder, ..
            } => {
                selector.is_empty()
                    || id.as_deref() == Some(selector)
                    || placeholder.as_deref() == Some(selector)
            }
            _ => false,
        })
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.find(&|n| matches!(&n.kind, NodeKind::Text { text } if text == needle))
            .is_some()
    }
}

pub trait IntoChildren {
    fn into_children(self) -> Vec<Node>;
}

impl IntoChildren for Node {
    fn into_children(self) -> Vec<Node> {
        vec![self]
    }
}

impl IntoChildren for Vec<Node> {
    fn into_children(self) -> Vec<Node> {
        self
    }
}

impl IntoChildren for Option<Node> {
    fn into_children(self) -> Vec<Node> {
        self.into_iter().collect()
    }
}

impl<const N: usize> IntoChildren for [Node; N] {
    fn into_children(self) -> Vec<Node> {
        self.into()
    }
}

macro_rules! impl_into_children_tuple {
    ($($idx:tt $t:ident),+) => {
        impl<$($t: IntoChildren),+> IntoChildren for ($($t,)+) {
            fn into_children(self) -> Vec<Node> {
                let mut v = Vec::new();
                $(v.extend(self.$idx.into_children());)+
                v
            }
        }
    };
}

impl_into_children_tuple!(0 A, 1 B);
impl_into_children_tuple!(0 A, 1 B, 2 C);
impl_into_children_tuple!(0 A, 1 B, 2 C, 3 D);
impl_into_children_tuple!(0 A, 1 B, 2 C, 3 D, 4 E);
impl_into_children_tuple!(0 A, 1 B, 2 C, 3 D, 4 E, 5 F);
impl_into_children_tuple!(0 A, 1 B, 2 C, 3 D, 4 E, 5 F, 6 G);
impl_into_children_tuple!(0 A, 1 B, 2 C, 3 D, 4 E, 5 F, 6 G, 7 H);
