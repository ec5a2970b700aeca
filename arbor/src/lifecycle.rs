//! Render lifecycle.
//!
//! Rendering a node walks it through
//! `Attached -> ViewInvoked -> PreRenderInvoked -> TemplateResolved -> Rendered`.
//! Any failure aborts the render; a node either reaches `Rendered` or the
//! request fails.

use crate::tree::{ComponentTree, NodeId};
use arbor_core::{
    AJAX_ENABLED_VAR, CONTROL_VAR, LifecycleError, Params, RenderState, TemplateVars, VIEW_VAR,
    Value, before_render_method, capitalize, is_valid_name, view_method,
};

impl ComponentTree {
    /// Render a node with the render name `render` (`""` for the default
    /// render).
    ///
    /// `args` are merged left to right, later keys winning, and handed to the
    /// pre-render handler. The view handler receives the node's signal
    /// arguments.
    pub fn render(&mut self, id: NodeId, render: &str, args: &[Params]) -> Result<String, LifecycleError> {
        let render_params: Params = args
            .iter()
            .flat_map(|bag| bag.iter().map(|(k, v)| (k.clone(), v.clone())))
            .collect();
        let node = self.path(id).clone();
        let component = self.kind(id).name();

        let slot = &mut self.nodes[id.0];
        slot.state.render_state = RenderState::Attached;
        slot.state.view = capitalize(&slot.state.view);
        let view = slot.state.view.clone();
        if !is_valid_name(&view) {
            return Err(LifecycleError::InvalidViewName { node, view });
        }

        match slot.component.call_view(&view, &slot.state.params) {
            Some(Ok(())) => {}
            Some(Err(source)) => {
                return Err(LifecycleError::Handler {
                    node,
                    method: view_method(&view),
                    source,
                });
            }
            None => {
                return Err(LifecycleError::MissingViewHandler {
                    node,
                    component,
                    view,
                });
            }
        }
        self.advance(id);

        match self.nodes[id.0]
            .component
            .call_before_render(render, &render_params)
        {
            Some(Ok(())) => {}
            Some(Err(source)) => {
                return Err(LifecycleError::Handler {
                    node,
                    method: before_render_method(render),
                    source,
                });
            }
            None => {
                return Err(LifecycleError::MissingPreRenderHandler {
                    node,
                    component,
                    method: before_render_method(render),
                });
            }
        }
        self.advance(id);

        let template = self.resolver.resolve(self.kind(id), &view, render)?;
        self.advance(id);

        let vars = self.template_vars(id);
        let output = self
            .engine
            .render(&template, &vars)
            .map_err(LifecycleError::Engine)?;
        self.advance(id);

        Ok(output)
    }

    /// Variables a node's template receives: `control`, `view`,
    /// `ajaxEnabled`, plus whatever the component adds.
    pub fn template_vars(&self, id: NodeId) -> TemplateVars {
        let slot = &self.nodes[id.0];
        let mut vars = TemplateVars::new();
        vars.insert(CONTROL_VAR.to_owned(), Value::Str(slot.path.to_string()));
        vars.insert(VIEW_VAR.to_owned(), Value::Str(slot.state.view.clone()));
        vars.insert(
            AJAX_ENABLED_VAR.to_owned(),
            Value::Bool(slot.state.ajax.is_enabled()),
        );
        slot.component.collect_vars(&mut vars);
        vars
    }

    /// Phase reached by the node's current render.
    pub fn render_state(&self, id: NodeId) -> RenderState {
        self.nodes[id.0].state.render_state
    }

    fn advance(&mut self, id: NodeId) {
        let _state = self.nodes[id.0].state.render_state.advance();

        #[cfg(feature = "tracing")]
        tracing::trace!(node = %self.path(id), state = ?_state, "lifecycle");
    }
}
