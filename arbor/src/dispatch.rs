//! Forwarding and signal dispatch.
//!
//! Three entry points move a request between nodes:
//!
//! - [`ComponentTree::forward`] resolves a destination inside the tree,
//!   applies persistent arguments and raises the signal on the target node.
//! - [`ComponentTree::presenter_forward`] hands the destination to the
//!   presenter with every key namespaced by the node's path.
//! - [`ComponentTree::go`] picks between an in-place forward and a full
//!   redirect, depending on the node's AJAX state and the request kind.

use crate::tree::{ComponentTree, NodeId};
use arbor_core::{
    Destination, DispatchError, NAME_SEPARATOR, NodePath, Params, THIS, VIEW_PROPERTY, Value,
};
use std::collections::BTreeMap;

/// Request arguments split by [`ComponentTree::split_arguments`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SplitArguments {
    /// Persistent property assignments per absolute node path. The `view`
    /// key assigns the node's current view.
    pub persistent: BTreeMap<NodePath, Params>,
    /// Everything else, keyed exactly as given.
    pub signal: Params,
}

impl ComponentTree {
    /// Format a link for a node. Default link parameters are merged under
    /// `args`; explicit arguments win.
    pub fn link(&self, id: NodeId, destination: &str, args: &Params) -> Result<String, DispatchError> {
        let merged = self.link_params(id, args);
        self.presenter
            .link(self.path(id), destination, &merged)
            .map_err(DispatchError::Presenter)
    }

    /// Sort request arguments into persistent assignments and signal
    /// arguments.
    ///
    /// A key with a path prefix (`sub-sub-key`) addresses a descendant, which
    /// is created if needed; a prefix naming no child fails with
    /// [`DispatchError::UnknownSubcomponent`]. Every key ends up on exactly
    /// one side.
    pub fn split_arguments(
        &mut self,
        id: NodeId,
        args: Params,
    ) -> Result<SplitArguments, DispatchError> {
        let mut split = SplitArguments::default();

        for (key, value) in args {
            let (node, property) = match key.rfind(NAME_SEPARATOR) {
                Some(pos) if pos > 0 => {
                    let node = self.lookup(id, &NodePath::parse(&key[..pos]))?;
                    (node, &key[pos + NAME_SEPARATOR.len_utf8()..])
                }
                _ => (id, key.as_str()),
            };

            if self.registry.is_persistent(self.kind(node), property) {
                split
                    .persistent
                    .entry(self.path(node).clone())
                    .or_default()
                    .insert(property.to_owned(), value);
            } else {
                split.signal.insert(key, value);
            }
        }

        Ok(split)
    }

    /// Forward to `destination` inside the tree.
    ///
    /// The target, the arguments and every persistent assignment are checked
    /// before anything changes; a failed forward leaves the tree as it was,
    /// apart from children created while resolving paths.
    ///
    /// The link-formatted destination is then handed to the node's
    /// [`process_destination`](arbor_core::Component::process_destination)
    /// hook, persistent arguments are assigned, the rest are stored on the
    /// target node, and unless the destination is `this` the signal is raised
    /// there.
    pub fn forward(&mut self, id: NodeId, destination: &str, args: Params) -> Result<(), DispatchError> {
        let current = self.path(id).clone();
        let destination = Destination::parse(destination, &current)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            node = %current,
            target = %destination.target(),
            action = destination.action(),
            anchor = ?destination.anchor(),
            "forward"
        );

        let target = self.resolve_target(id, destination.target())?;
        let url = self.link(id, destination.link_target(), &args)?;
        let split = self.split_arguments(id, args)?;
        let assignments = self.check_persistent(split.persistent)?;

        self.nodes[id.0]
            .component
            .on_destination(&url, destination.anchor());
        self.apply_persistent(assignments)?;
        self.nodes[target.0].state.params = split.signal;

        if destination.is_signal() {
            self.signal_received(target, destination.action())?;
        }
        Ok(())
    }

    /// Forward through the presenter, bypassing in-tree dispatch.
    ///
    /// The destination (unless `this`) and every argument key are prefixed
    /// with the node's path. No persistent splitting happens here.
    pub fn presenter_forward(
        &mut self,
        id: NodeId,
        destination: &str,
        args: Params,
    ) -> Result<(), DispatchError> {
        let path = self.path(id).clone();
        let destination = if destination == THIS {
            THIS.to_owned()
        } else {
            path.prefix(destination)
        };
        let params: Params = args
            .into_iter()
            .map(|(key, value)| (path.prefix(&key), value))
            .collect();

        #[cfg(feature = "tracing")]
        tracing::debug!(node = %path, destination = %destination, "presenter forward");

        self.presenter
            .forward(&destination, &params)
            .map_err(DispatchError::Presenter)
    }

    /// Forward in place on partial-update requests, redirect otherwise.
    ///
    /// When the node is AJAX-enabled and the request is a partial update,
    /// each of `snippets` is marked for redraw before forwarding (through
    /// the presenter if `prefer_presenter_forward`). Otherwise the presenter
    /// redirects to `destination` with the default link parameters merged
    /// into `args`.
    pub fn go(
        &mut self,
        id: NodeId,
        destination: &str,
        args: Params,
        snippets: &[&str],
        prefer_presenter_forward: bool,
    ) -> Result<(), DispatchError> {
        if self.is_ajax_enabled(id) && self.is_ajax_request() {
            for snippet in snippets {
                self.redraw_control(id, Some(snippet), true);
            }

            #[cfg(feature = "tracing")]
            tracing::debug!(node = %self.path(id), destination, ?snippets, "go: forward");

            if prefer_presenter_forward {
                self.presenter_forward(id, destination, args)
            } else {
                self.forward(id, destination, args)
            }
        } else {
            #[cfg(feature = "tracing")]
            tracing::debug!(node = %self.path(id), destination, "go: redirect");

            let merged = self.link_params(id, &args);
            let origin = self.path(id).clone();
            self.presenter
                .redirect(&origin, destination, &merged)
                .map_err(DispatchError::Presenter)
        }
    }

    fn link_params(&self, id: NodeId, args: &Params) -> Params {
        let mut merged = self.state(id).default_link_params.clone();
        merged.extend(args.iter().map(|(key, value)| (key.clone(), value.clone())));
        merged
    }

    /// Resolve every assignment to its node and check it would be accepted.
    fn check_persistent(
        &self,
        persistent: BTreeMap<NodePath, Params>,
    ) -> Result<Vec<(NodeId, Params)>, DispatchError> {
        let mut checked = Vec::with_capacity(persistent.len());
        for (path, assignments) in persistent {
            let node = self
                .find(&path)
                .ok_or_else(|| DispatchError::UnknownSubcomponent {
                    node: NodePath::root(),
                    name: path.to_string(),
                })?;

            let component = &self.nodes[node.0].component;
            for (property, value) in &assignments {
                if property == VIEW_PROPERTY {
                    continue;
                }
                match component.check_property(property, value) {
                    Ok(true) => {}
                    Ok(false) => {
                        return Err(DispatchError::UndeclaredProperty {
                            node: path,
                            property: property.clone(),
                        });
                    }
                    Err(source) => {
                        return Err(DispatchError::Property {
                            node: path,
                            property: property.clone(),
                            source,
                        });
                    }
                }
            }
            checked.push((node, assignments));
        }
        Ok(checked)
    }

    fn apply_persistent(&mut self, assignments: Vec<(NodeId, Params)>) -> Result<(), DispatchError> {
        for (node, assignments) in assignments {
            for (property, value) in assignments {
                if property == VIEW_PROPERTY {
                    self.nodes[node.0].state.view = match value {
                        Value::Str(view) => view,
                        other => other.to_string(),
                    };
                    continue;
                }

                let slot = &mut self.nodes[node.0];
                match slot.component.write_property(&property, value) {
                    Ok(true) => {}
                    Ok(false) => {
                        return Err(DispatchError::UndeclaredProperty {
                            node: slot.path.clone(),
                            property,
                        });
                    }
                    Err(source) => {
                        return Err(DispatchError::Property {
                            node: slot.path.clone(),
                            property,
                            source,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    fn resolve_target(&mut self, id: NodeId, target: &NodePath) -> Result<NodeId, DispatchError> {
        let relative = target
            .segments()
            .strip_prefix(self.path(id).segments())
            .map(|rest| NodePath::from_segments(rest.iter().cloned()));
        match relative {
            Some(relative) => self.lookup(id, &relative),
            None => self.lookup(NodeId::ROOT, target),
        }
    }

    /// Run the node's own handler for `signal`, or raise it through the
    /// presenter when the type registers none.
    fn signal_received(&mut self, id: NodeId, signal: &str) -> Result<(), DispatchError> {
        let slot = &mut self.nodes[id.0];
        match slot.component.call_signal(signal, &slot.state.params) {
            Some(Ok(())) => Ok(()),
            Some(Err(source)) => Err(DispatchError::Signal {
                node: slot.path.clone(),
                signal: signal.to_owned(),
                source,
            }),
            None => {
                let path = slot.path.clone();
                self.presenter
                    .raise_signal(&path, signal)
                    .map_err(DispatchError::Presenter)
            }
        }
    }
}
