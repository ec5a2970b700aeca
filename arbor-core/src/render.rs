//! Per-node render lifecycle state.

/// Phase a node has reached in its current render.
///
/// Phases advance strictly in declaration order; there is no way back and
/// no way to skip one. A fresh render starts again at [`RenderState::Attached`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum RenderState {
    /// Attached to the tree, nothing invoked yet.
    #[default]
    Attached,
    /// The view handler ran.
    ViewInvoked,
    /// The pre-render handler ran.
    PreRenderInvoked,
    /// A template file was found.
    TemplateResolved,
    /// The template was rendered.
    Rendered,
}

impl RenderState {
    /// The phase after this one.
    pub const fn next(self) -> Option<Self> {
        match self {
            RenderState::Attached => Some(RenderState::ViewInvoked),
            RenderState::ViewInvoked => Some(RenderState::PreRenderInvoked),
            RenderState::PreRenderInvoked => Some(RenderState::TemplateResolved),
            RenderState::TemplateResolved => Some(RenderState::Rendered),
            RenderState::Rendered => None,
        }
    }

    /// Move to the next phase. Stays put once [`RenderState::Rendered`].
    pub fn advance(&mut self) -> Self {
        if let Some(next) = self.next() {
            *self = next;
        }
        *self
    }

    /// Whether the render completed.
    pub const fn is_complete(self) -> bool {
        matches!(self, RenderState::Rendered)
    }
}
