//! Error types for Arbor.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`ArborError`] - Top-level error type for all Arbor operations
//! - [`DispatchError`] - Errors while resolving and dispatching a destination
//! - [`LifecycleError`] - Errors while driving a node through its render lifecycle
//! - [`HandlerTableError`] - Errors while building a handler table
//!
//! Every dispatch and lifecycle error is fatal for the current request. None of
//! them are recovered inside the tree; they travel up to whatever boundary
//! turned the request into a tree walk.

use crate::path::NodePath;
use crate::value::ValueError;
use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for all Arbor operations.
#[derive(Error, Debug)]
pub enum ArborError {
    /// An error occurred while dispatching a destination.
    #[error("dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    /// An error occurred while rendering a node.
    #[error("lifecycle error: {0}")]
    Lifecycle(#[from] LifecycleError),

    /// A custom error occurred.
    #[error(transparent)]
    Custom(BoxError),
}

impl ArborError {
    /// Whether the error belongs to the bad-request class.
    ///
    /// The request boundary uses this to pick the user-visible response.
    pub fn is_bad_request(&self) -> bool {
        match self {
            ArborError::Dispatch(err) => err.is_bad_request(),
            ArborError::Lifecycle(err) => err.is_bad_request(),
            ArborError::Custom(_) => false,
        }
    }
}

/// Errors that can occur while resolving a destination or its arguments.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// The signal or view part of a destination is not alphanumeric.
    #[error("invalid action name '{action}' requested from '{node}'")]
    InvalidActionName {
        /// Node the destination was resolved against.
        node: NodePath,
        /// The offending action.
        action: String,
    },

    /// A path segment does not name an existing or creatable child.
    #[error("component '{node}' has no subcomponent '{name}'")]
    UnknownSubcomponent {
        /// Node the lookup started from.
        node: NodePath,
        /// The path that could not be resolved.
        name: String,
    },

    /// A persistent property rejected the value it was assigned.
    #[error("cannot assign persistent property '{property}' on '{node}'")]
    Property {
        /// Node owning the property.
        node: NodePath,
        /// Property name.
        property: String,
        /// Why the assignment failed.
        #[source]
        source: ValueError,
    },

    /// The type declares a persistent property its state cannot hold.
    #[error("persistent property '{property}' is declared on '{node}' but not stored by it")]
    UndeclaredProperty {
        /// Node owning the property.
        node: NodePath,
        /// Property name.
        property: String,
    },

    /// A locally registered signal handler failed.
    #[error("signal '{signal}' failed on '{node}'")]
    Signal {
        /// Node the signal was raised on.
        node: NodePath,
        /// Signal name.
        signal: String,
        /// Handler error.
        #[source]
        source: BoxError,
    },

    /// The external presenter failed.
    #[error("presenter error")]
    Presenter(#[source] BoxError),
}

impl DispatchError {
    /// Whether the error belongs to the bad-request class.
    pub fn is_bad_request(&self) -> bool {
        matches!(
            self,
            DispatchError::InvalidActionName { .. }
                | DispatchError::UnknownSubcomponent { .. }
                | DispatchError::Property { .. }
        )
    }
}

/// Errors that can occur while a node runs its render lifecycle.
#[derive(Error, Debug)]
pub enum LifecycleError {
    /// The current view name is not alphanumeric.
    #[error("view name '{view}' of '{node}' must be alphanumeric")]
    InvalidViewName {
        /// Node being rendered.
        node: NodePath,
        /// The offending view name.
        view: String,
    },

    /// The component type registers no handler for the current view.
    #[error("there is no handler for view '{view}' in component {component} ('{node}')")]
    MissingViewHandler {
        /// Node being rendered.
        node: NodePath,
        /// Concrete component type name.
        component: &'static str,
        /// The view that has no handler.
        view: String,
    },

    /// The component type registers no pre-render handler for the render name.
    #[error("there is no '{method}' handler in component {component} ('{node}')")]
    MissingPreRenderHandler {
        /// Node being rendered.
        node: NodePath,
        /// Concrete component type name.
        component: &'static str,
        /// The conventional handler name, e.g. `beforeRenderBar`.
        method: String,
    },

    /// No template exists for the view anywhere in the type lineage.
    #[error("template for view '{view}' in component {component} was not found")]
    TemplateNotFound {
        /// View name.
        view: String,
        /// Concrete component type name.
        component: &'static str,
    },

    /// A view or pre-render handler failed.
    #[error("handler '{method}' failed on '{node}'")]
    Handler {
        /// Node being rendered.
        node: NodePath,
        /// The conventional handler name.
        method: String,
        /// Handler error.
        #[source]
        source: BoxError,
    },

    /// The template engine failed.
    #[error("template engine error")]
    Engine(#[source] BoxError),
}

impl LifecycleError {
    /// Whether the error belongs to the bad-request class.
    pub fn is_bad_request(&self) -> bool {
        !matches!(
            self,
            LifecycleError::Handler { .. } | LifecycleError::Engine(_)
        )
    }
}

/// Errors raised when a handler table is built.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HandlerTableError {
    /// A view, render or signal name is not alphanumeric.
    #[error("{kind} name '{name}' must be alphanumeric")]
    InvalidName {
        /// Which table the name was registered in.
        kind: &'static str,
        /// The offending name.
        name: String,
    },

    /// The same name was registered twice in one table.
    #[error("{kind} '{name}' is registered twice")]
    Duplicate {
        /// Which table the name was registered in.
        kind: &'static str,
        /// The duplicated name.
        name: String,
    },
}

// Convenience conversions
impl From<BoxError> for ArborError {
    fn from(err: BoxError) -> Self {
        ArborError::Custom(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_fatal_kinds_are_bad_requests() {
        let node = NodePath::parse("a-b");
        let invalid: ArborError = DispatchError::InvalidActionName {
            node: node.clone(),
            action: "x.y".into(),
        }
        .into();
        assert!(invalid.is_bad_request());

        let missing: ArborError = LifecycleError::TemplateNotFound {
            view: "Default".into(),
            component: "Derived",
        }
        .into();
        assert!(missing.is_bad_request());

        let engine: ArborError = LifecycleError::Engine("boom".into()).into();
        assert!(!engine.is_bad_request());

        let undeclared: ArborError = DispatchError::UndeclaredProperty {
            node,
            property: "page".into(),
        }
        .into();
        assert!(!undeclared.is_bad_request());
    }

    #[test]
    fn messages_name_the_node_and_offender() {
        let err = DispatchError::UnknownSubcomponent {
            node: NodePath::parse("a"),
            name: "zzz".into(),
        };
        assert_eq!(err.to_string(), "component 'a' has no subcomponent 'zzz'");
    }
}
