//! Paints frames as plain text lines.
//!
//! Block tags put each child on its own line; headings, paragraphs and spans
//! are flattened into one line. Buttons paint as `[label]` and inputs as
//! `<value>`, or `<placeholder>` while empty. A focused input gets a
//! trailing `*`.

use hooklab_core::{Frame, Node, NodeKind, PaintSurface, Tag};

/// Keeps every painted frame; `stdout()` also prints them as they arrive.
#[derive(Default)]
pub struct TextSurface {
    pub frames: Vec<String>,
    echo: bool,
}

impl TextSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stdout() -> Self {
        Self {
            frames: Vec::new(),
            echo: true,
        }
    }

    pub fn last(&self) -> Option<&str> {
        self.frames.last().map(String::as_str)
    }
}

impl PaintSurface for TextSurface {
    fn paint(&mut self, frame: &Frame) {
        let text = render_lines(&frame.tree).join("\n");
        log::debug!("paint frame {} ({} bytes)", frame.number, text.len());
        if self.echo {
            println!("-- frame {} --", frame.number);
            if !text.is_empty() {
                println!("{text}");
            }
        }
        self.frames.push(text);
    }
}

pub fn render_lines(node: &Node) -> Vec<String> {
    let mut out = Vec::new();
    lines(node, &mut out);
    out
}

fn lines(node: &Node, out: &mut Vec<String>) {
    match &node.kind {
        NodeKind::Block {
            tag: Tag::Div | Tag::Fragment,
        } => {
            for c in &node.children {
                lines(c, out);
            }
        }
        NodeKind::Block { tag: Tag::Heading } => out.push(format!("# {}", inline_children(node))),
        NodeKind::Block { .. } => {
            let text = inline_children(node);
            if !text.is_empty() {
                out.push(text);
            }
        }
        NodeKind::Empty | NodeKind::Mount { .. } => {}
        _ => {
            let mut line = String::new();
            inline(node, &mut line);
            out.push(line);
            for c in &node.children {
                lines(c, out);
            }
        }
    }
}

fn inline_children(node: &Node) -> String {
    let mut s = String::new();
    for c in &node.children {
        inline(c, &mut s);
    }
    s
}

fn inline(node: &Node, out: &mut String) {
    match &node.kind {
        NodeKind::Text { text } => out.push_str(text),
        NodeKind::Button { label, .. } => {
            out.push('[');
            out.push_str(label);
            out.push(']');
        }
        NodeKind::Input {
            placeholder,
            value,
            live,
            ..
        } => {
            let (current, focused) = match live {
                Some(el) => (el.value(), el.is_focused()),
                None => (value.clone().unwrap_or_default(), false),
            };
            out.push('<');
            match placeholder {
                Some(p) if current.is_empty() => out.push_str(p),
                _ => out.push_str(&current),
            }
            out.push('>');
            if focused {
                out.push('*');
            }
        }
        _ => out.push_str(&inline_children(node)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::*;

    #[test]
    fn renders_blocks_line_by_line() {
        let tree = Div().child((
            Heading("Hooks"),
            Button("Click Here", || {}),
            Paragraph("This is a text"),
            Input().placeholder("enter something..."),
            Input().value("Pedro"),
        ));
        assert_eq!(
            render_lines(&tree),
            [
                "# Hooks",
                "[Click Here]",
                "This is a text",
                "<enter something...>",
                "<Pedro>",
            ]
        );
    }

    #[test]
    fn spans_flatten_into_their_parent_line() {
        let tree = Paragraph("Count: ").child(Span("3"));
        assert_eq!(render_lines(&tree), ["Count: 3"]);
    }

    #[test]
    fn capture_surface_keeps_frames() {
        let mut host = Host::new(HostConfig::default(), TextSurface::new(), "Hello", || {
            let (n, set_n) = use_state(|| 0);
            Div().child((Text(format!("n = {n}")), Button("inc", move || set_n.update(|n| n + 1))))
        });
        host.flush().unwrap();
        host.click("inc").unwrap();
        assert_eq!(host.surface().frames, ["n = 0\n[inc]", "n = 1\n[inc]"]);
        assert_eq!(host.surface().last(), Some("n = 1\n[inc]"));
    }
}
