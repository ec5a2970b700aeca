//! AJAX capability propagation.
//!
//! A node that is AJAX-enabled patches itself in place on partial-update
//! requests instead of causing a full redirect. The state travels down the
//! tree one level at a time: when a child is created, it becomes enabled if
//! its parent is enabled, the parent does not exclude the child's name, and
//! the child's type is [`AJAX_AWARE`](Capabilities::AJAX_AWARE). A grandchild
//! therefore inherits from its own parent, never from the grandparent.
//!
//! Exclusions set by [`ComponentTree::enable_ajax`] and
//! [`ComponentTree::disable_ajax_for`] accumulate, so the order of those calls
//! does not matter.

use crate::tree::{ComponentTree, NodeId};
use arbor_core::Capabilities;
use bitflags::bitflags;
use std::collections::BTreeSet;

bitflags! {
    /// AJAX flags of a node.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AjaxFlags: u8 {
        /// The node handles partial-update requests in place.
        const ENABLED = 1;
        /// The node marks itself for redraw as soon as it is attached to a
        /// partial-update request.
        const AUTO_REDRAW = 1 << 1;
    }
}

impl Default for AjaxFlags {
    fn default() -> Self {
        AjaxFlags::empty()
    }
}

/// AJAX state of one node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AjaxState {
    flags: AjaxFlags,
    disabled_for: BTreeSet<String>,
}

impl AjaxState {
    /// Current flags.
    pub fn flags(&self) -> AjaxFlags {
        self.flags
    }

    /// Whether the node is enabled.
    pub fn is_enabled(&self) -> bool {
        self.flags.contains(AjaxFlags::ENABLED)
    }

    /// Whether the node redraws itself on attach.
    pub fn auto_redraw(&self) -> bool {
        self.flags.contains(AjaxFlags::AUTO_REDRAW)
    }

    /// Whether propagation skips the direct child `name`.
    pub fn is_disabled_for(&self, name: &str) -> bool {
        self.disabled_for.contains(name)
    }

    /// Excluded direct child names.
    pub fn disabled_for(&self) -> impl Iterator<Item = &str> {
        self.disabled_for.iter().map(String::as_str)
    }

    fn enable(&mut self, auto_redraw: bool) {
        self.flags = AjaxFlags::ENABLED;
        self.flags.set(AjaxFlags::AUTO_REDRAW, auto_redraw);
    }
}

impl ComponentTree {
    /// Enable AJAX on a node and exclude the direct children in `exclude`
    /// from propagation.
    ///
    /// Only children created afterwards are affected.
    pub fn enable_ajax(&mut self, id: NodeId, auto_redraw: bool, exclude: &[&str]) {
        let ajax = &mut self.nodes[id.0].state.ajax;
        ajax.enable(auto_redraw);
        ajax.disabled_for
            .extend(exclude.iter().map(|name| (*name).to_owned()));

        #[cfg(feature = "tracing")]
        tracing::debug!(node = %self.path(id), auto_redraw, ?exclude, "ajax enabled");
    }

    /// Exclude direct children from propagation. Takes priority over any
    /// [`enable_ajax`](Self::enable_ajax), whichever is called first.
    pub fn disable_ajax_for(&mut self, id: NodeId, names: &[&str]) {
        self.nodes[id.0]
            .state
            .ajax
            .disabled_for
            .extend(names.iter().map(|name| (*name).to_owned()));
    }

    /// Clear the node's own flags. Children already created keep theirs.
    pub fn disable_ajax(&mut self, id: NodeId) {
        self.nodes[id.0].state.ajax.flags = AjaxFlags::empty();
    }

    /// Whether the node is AJAX-enabled.
    pub fn is_ajax_enabled(&self, id: NodeId) -> bool {
        self.nodes[id.0].state.ajax.is_enabled()
    }

    /// Withdraw every redraw mark on every renderable node, overriding
    /// auto-redraw for this request.
    pub fn redraw_nothing(&mut self) {
        let nodes: Vec<NodeId> = std::iter::once(NodeId::ROOT)
            .chain(self.descendants(NodeId::ROOT))
            .filter(|id| self.kind(*id).supports(Capabilities::RENDERABLE))
            .collect();
        for id in nodes {
            self.redraw_control(id, None, false);
        }
    }

    /// Child-creation hook: inherit AJAX state from the parent.
    pub(crate) fn propagate_ajax(&mut self, parent: NodeId, child: NodeId, name: &str) {
        let inherits = {
            let ajax = &self.nodes[parent.0].state.ajax;
            ajax.is_enabled()
                && !ajax.is_disabled_for(name)
                && self.kind(child).supports(Capabilities::AJAX_AWARE)
        };
        if inherits {
            self.nodes[child.0].state.ajax.enable(true);

            #[cfg(feature = "tracing")]
            tracing::debug!(node = %self.path(child), parent = %self.path(parent), "ajax inherited");
        }
    }

    /// Attach hook: auto-redraw on partial-update requests.
    pub(crate) fn attached(&mut self, id: NodeId) {
        let ajax = &self.nodes[id.0].state.ajax;
        if ajax.is_enabled()
            && ajax.auto_redraw()
            && self.is_ajax_request()
            && self.kind(id).supports(Capabilities::RENDERABLE)
        {
            self.redraw_control(id, None, true);

            #[cfg(feature = "tracing")]
            tracing::debug!(node = %self.path(id), "auto redraw");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enable_keeps_auto_redraw_optional() {
        let mut state = AjaxState::default();
        assert!(!state.is_enabled());

        state.enable(false);
        assert_eq!(state.flags(), AjaxFlags::ENABLED);
        assert!(!state.auto_redraw());

        state.enable(true);
        assert_eq!(state.flags(), AjaxFlags::ENABLED | AjaxFlags::AUTO_REDRAW);
    }
}
