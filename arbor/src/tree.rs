//! The per-request component tree.
//!
//! Nodes live in an arena owned by [`ComponentTree`] and are addressed by
//! [`NodeId`]. Children are created lazily the first time they are asked for,
//! which is also the moment AJAX state is propagated to them and the attach
//! hook runs.

use crate::ajax::AjaxState;
use arbor_core::{
    Capabilities, Component, ComponentType, DispatchError, DynComponent, NodePath, Params,
    Presenter, PropertyRegistry, RenderState, TemplateEngine, TemplateSource,
};
use arbor_std::{AjaxDirective, DirectiveEngine, TemplateResolver};
use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;

/// View every node starts in.
pub const DEFAULT_VIEW: &str = "Default";

/// Index of a node in its [`ComponentTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// The request root.
    pub const ROOT: NodeId = NodeId(0);
}

/// Per-node request state kept by the tree.
#[derive(Debug, Clone)]
pub struct NodeState {
    /// Current view name.
    pub view: String,
    /// Signal arguments received this request.
    pub params: Params,
    /// Parameters merged under the explicit arguments of every link.
    pub default_link_params: Params,
    pub(crate) ajax: AjaxState,
    pub(crate) render_state: RenderState,
    pub(crate) invalid: BTreeMap<Option<String>, bool>,
}

impl Default for NodeState {
    fn default() -> Self {
        Self {
            view: DEFAULT_VIEW.to_owned(),
            params: Params::new(),
            default_link_params: Params::new(),
            ajax: AjaxState::default(),
            render_state: RenderState::default(),
            invalid: BTreeMap::new(),
        }
    }
}

impl NodeState {
    /// AJAX configuration of the node.
    pub fn ajax(&self) -> &AjaxState {
        &self.ajax
    }

    /// Phase reached by the node's current render.
    pub fn render_state(&self) -> RenderState {
        self.render_state
    }
}

pub(crate) struct NodeSlot {
    pub(crate) path: NodePath,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: BTreeMap<String, NodeId>,
    pub(crate) component: Box<dyn DynComponent>,
    pub(crate) state: NodeState,
}

/// One request's tree of components.
pub struct ComponentTree {
    pub(crate) nodes: Vec<NodeSlot>,
    pub(crate) presenter: Box<dyn Presenter>,
    pub(crate) registry: Arc<PropertyRegistry>,
    pub(crate) resolver: TemplateResolver,
    pub(crate) engine: Box<dyn TemplateEngine>,
}

impl ComponentTree {
    /// Start building a tree around `root`, talking to `presenter`.
    pub fn builder<R, P>(root: R, presenter: P) -> ComponentTreeBuilder
    where
        R: DynComponent + 'static,
        P: Presenter + 'static,
    {
        ComponentTreeBuilder {
            root: Box::new(root),
            presenter: Box::new(presenter),
            registry: None,
            source: None,
            resolver: None,
            engine: None,
        }
    }

    /// Whether the current request is a partial-update request.
    pub fn is_ajax_request(&self) -> bool {
        self.presenter.is_ajax()
    }

    /// The presenter collaborator.
    pub fn presenter(&self) -> &dyn Presenter {
        self.presenter.as_ref()
    }

    /// The property registry consulted when splitting arguments.
    pub fn registry(&self) -> &PropertyRegistry {
        &self.registry
    }

    /// The template resolver used by [`render`](Self::render).
    pub fn resolver(&self) -> &TemplateResolver {
        &self.resolver
    }

    /// Number of nodes created so far.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a tree has at least its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Path of a node.
    pub fn path(&self, id: NodeId) -> &NodePath {
        &self.nodes[id.0].path
    }

    /// Parent of a node, `None` for the root.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Children created so far, by name.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = (&str, NodeId)> {
        self.nodes[id.0]
            .children
            .iter()
            .map(|(name, child)| (name.as_str(), *child))
    }

    /// Static type metadata of a node.
    pub fn kind(&self, id: NodeId) -> &'static ComponentType {
        self.nodes[id.0].component.kind()
    }

    /// Request state of a node.
    pub fn state(&self, id: NodeId) -> &NodeState {
        &self.nodes[id.0].state
    }

    /// Mutable request state of a node.
    pub fn state_mut(&mut self, id: NodeId) -> &mut NodeState {
        &mut self.nodes[id.0].state
    }

    /// The node's component, if it is a `C`.
    pub fn component<C: Component>(&self, id: NodeId) -> Option<&C> {
        self.nodes[id.0].component.as_any().downcast_ref()
    }

    /// The node's component, mutably, if it is a `C`.
    pub fn component_mut<C: Component>(&mut self, id: NodeId) -> Option<&mut C> {
        self.nodes[id.0].component.as_any_mut().downcast_mut()
    }

    /// Replace the default link parameters of a node.
    pub fn set_default_link_params(&mut self, id: NodeId, params: Params) {
        self.nodes[id.0].state.default_link_params = params;
    }

    /// The child `name` of `parent`, created on first access.
    ///
    /// Returns `None` when the parent's type has no such child.
    pub fn child(&mut self, parent: NodeId, name: &str) -> Option<NodeId> {
        if let Some(existing) = self.nodes[parent.0].children.get(name) {
            return Some(*existing);
        }

        let component = self.nodes[parent.0].component.spawn_child(name)?;
        let id = NodeId(self.nodes.len());
        let path = self.nodes[parent.0].path.child(name);
        self.nodes.push(NodeSlot {
            path,
            parent: Some(parent),
            children: BTreeMap::new(),
            component,
            state: NodeState::default(),
        });
        self.nodes[parent.0].children.insert(name.to_owned(), id);

        self.propagate_ajax(parent, id, name);
        self.attached(id);
        Some(id)
    }

    /// Resolve `relative` below `from`, creating nodes on the way.
    pub fn lookup(&mut self, from: NodeId, relative: &NodePath) -> Result<NodeId, DispatchError> {
        let mut current = from;
        for name in relative.segments() {
            current = self.child(current, name).ok_or_else(|| {
                DispatchError::UnknownSubcomponent {
                    node: self.path(from).clone(),
                    name: relative.to_string(),
                }
            })?;
        }
        Ok(current)
    }

    /// Find an already created node by absolute path.
    pub fn find(&self, path: &NodePath) -> Option<NodeId> {
        path.segments().iter().try_fold(NodeId::ROOT, |current, name| {
            self.nodes[current.0].children.get(name).copied()
        })
    }

    /// Every created node below `id`, parents before children.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.nodes[id.0].children.values().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.nodes[next.0].children.values().rev().copied());
        }
        out
    }

    /// Mark a snippet of a node (`None`: the whole node) for redraw, or
    /// withdraw the mark.
    ///
    /// Withdrawing the whole node clears every snippet mark.
    pub fn redraw_control(&mut self, id: NodeId, snippet: Option<&str>, redraw: bool) {
        let invalid = &mut self.nodes[id.0].state.invalid;
        match (snippet, redraw) {
            (snippet, true) => {
                invalid.insert(snippet.map(str::to_owned), true);
            }
            (None, false) => invalid.clear(),
            (Some(snippet), false) => {
                invalid.insert(Some(snippet.to_owned()), false);
            }
        }
    }

    /// Whether a snippet of the node will be redrawn.
    ///
    /// For `None` this is true when any mark is set on the node or any
    /// renderable descendant is invalid. A named snippet falls back to the
    /// whole-node mark.
    pub fn is_control_invalid(&self, id: NodeId, snippet: Option<&str>) -> bool {
        let invalid = &self.nodes[id.0].state.invalid;
        if let Some(snippet) = snippet {
            return invalid
                .get(&Some(snippet.to_owned()))
                .copied()
                .unwrap_or_else(|| invalid.contains_key(&None));
        }
        if !invalid.is_empty() {
            return true;
        }

        let mut queue = VecDeque::from([id]);
        while let Some(next) = queue.pop_front() {
            for child in self.nodes[next.0].children.values() {
                if self.kind(*child).supports(Capabilities::RENDERABLE) {
                    if self.is_control_invalid(*child, None) {
                        return true;
                    }
                } else {
                    queue.push_back(*child);
                }
            }
        }
        false
    }
}

/// Builder for [`ComponentTree`].
pub struct ComponentTreeBuilder {
    root: Box<dyn DynComponent>,
    presenter: Box<dyn Presenter>,
    registry: Option<Arc<PropertyRegistry>>,
    source: Option<Arc<dyn TemplateSource>>,
    resolver: Option<TemplateResolver>,
    engine: Option<Box<dyn TemplateEngine>>,
}

impl ComponentTreeBuilder {
    /// Use `registry` instead of [`PropertyRegistry::global`].
    #[must_use]
    pub fn registry(mut self, registry: Arc<PropertyRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Load templates from `source` in both the default resolver and the
    /// default engine.
    #[must_use]
    pub fn template_source(mut self, source: Arc<dyn TemplateSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Use a custom template resolver.
    #[must_use]
    pub fn resolver(mut self, resolver: TemplateResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Use a custom template engine.
    #[must_use]
    pub fn engine<E: TemplateEngine + 'static>(mut self, engine: E) -> Self {
        self.engine = Some(Box::new(engine));
        self
    }

    /// Build the tree. The root starts with no AJAX state.
    pub fn build(self) -> ComponentTree {
        let source = self.source;
        let resolver = self.resolver.unwrap_or_else(|| match &source {
            Some(source) => TemplateResolver::builder()
                .source(Arc::clone(source))
                .build(),
            None => TemplateResolver::new(),
        });
        let engine = self.engine.unwrap_or_else(|| {
            let builder = DirectiveEngine::builder().install(AjaxDirective);
            let builder = match source {
                Some(source) => builder.source(source),
                None => builder,
            };
            Box::new(builder.build())
        });

        ComponentTree {
            nodes: vec![NodeSlot {
                path: NodePath::root(),
                parent: None,
                children: BTreeMap::new(),
                component: self.root,
                state: NodeState::default(),
            }],
            presenter: self.presenter,
            registry: self.registry.unwrap_or_else(PropertyRegistry::global),
            resolver,
            engine,
        }
    }
}
