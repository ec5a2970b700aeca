//! # arbor - Component Tree Dispatch and Rendering
//!
//! `arbor` is the request-dispatch and render-lifecycle core of a
//! component-tree UI layer. One [`ComponentTree`] is built per request; it
//! resolves destinations to nodes, carries persistent state between them,
//! decides between in-place AJAX forwards and full redirects, and renders
//! nodes through a fixed lifecycle.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use arbor::prelude::*;
//!
//! let mut tree = ComponentTree::builder(Page::default(), presenter).build();
//! tree.enable_ajax(NodeId::ROOT, true, &["sidebar"]);
//!
//! let grid = tree.lookup(NodeId::ROOT, &NodePath::parse("grid"))?;
//! tree.go(grid, "sort!", args, &["rows"], false)?;
//! let html = tree.render(grid, "", &[])?;
//! ```
//!
//! ## Crates
//!
//! - `arbor-core`: value types, component metadata and collaborator traits
//! - `arbor-std`: template resolver and engine, [`Multiplier`], testing doubles
//! - `arbor-macros`: `#[derive(Persistent)]` (feature `macros`)

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Lets `#[derive(Persistent)]` refer to `::arbor` from inside this crate's tests.
extern crate self as arbor;

mod ajax;
mod dispatch;
mod lifecycle;
mod tree;

pub use ajax::{AjaxFlags, AjaxState};
pub use dispatch::SplitArguments;
pub use tree::{ComponentTree, ComponentTreeBuilder, DEFAULT_VIEW, NodeId, NodeState};

pub use arbor_core::{
    // Properties
    Access,
    // Errors
    ArborError,
    BoxError,
    // Components
    Capabilities,
    Component,
    ComponentType,
    ComponentTypeBuilder,
    // Destinations
    Destination,
    DispatchError,
    DynComponent,
    HandlerFn,
    HandlerTableError,
    Handlers,
    HandlersBuilder,
    LifecycleError,
    NodePath,
    // Values
    Params,
    PersistentState,
    // Collaborators
    Presenter,
    PropertyDescriptor,
    PropertyRegistry,
    PropertyValue,
    RenderState,
    TemplateEngine,
    TemplateSource,
    TemplateVars,
    Value,
    ValueError,
};

pub use arbor_std::{
    AjaxDirective, Directive, DirectiveEngine, FsTemplateSource, Multiplier, TemplateError,
    TemplateResolver, TracingPresenter,
};

/// Naming conventions and reserved names.
pub mod names {
    pub use arbor_core::{
        AJAX_ENABLED_VAR, ANCHOR_SEPARATOR, CONTROL_VAR, NAME_SEPARATOR, SIGNAL_MARKER,
        TEMPLATES_DIR, THIS, VIEW_PROPERTY, VIEW_VAR, before_render_method, capitalize,
        is_valid_name, signal_method, view_method,
    };
    pub use arbor_std::AJAX_ATTRIBUTE;
}

/// Template resolution and rendering.
pub mod template {
    #![allow(clippy::wildcard_imports)]
    pub use arbor_std::template::*;
}

/// Testing utilities.
pub mod testing {
    #![allow(clippy::wildcard_imports)]
    pub use arbor_std::testing::*;
}

/// Prelude module - common imports for Arbor.
///
/// # Usage
///
/// ```rust,ignore
/// use arbor::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        ArborError, BoxError, Capabilities, Component, ComponentTree, ComponentType,
        DispatchError, Handlers, LifecycleError, NodeId, NodePath, Params, PersistentState,
        Presenter, PropertyDescriptor, Value,
    };

    #[cfg(feature = "macros")]
    pub use crate::Persistent;
}

#[cfg(feature = "macros")]
pub use arbor_macros::Persistent;

#[cfg(feature = "inventory")]
pub use arbor_core::{ComponentRegistration, inventory, register_component};
