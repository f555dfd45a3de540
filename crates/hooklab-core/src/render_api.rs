use crate::view::Node;

/// One painted frame: the fully resolved tree with live input values attached.
pub struct Frame {
    /// 1-based, counts every paint of the host.
    pub number: u64,
    pub tree: Node,
}

/// Whatever presents frames. The runtime never looks at how.
pub trait PaintSurface {
    fn paint(&mut self, frame: &Frame);
}

/// Discards frames. Useful when only the tree or effects matter.
#[derive(Default)]
pub struct NullSurface;

impl PaintSurface for NullSurface {
    fn paint(&mut self, _frame: &Frame) {}
}
