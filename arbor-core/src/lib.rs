//! # arbor-core
//!
//! Core traits and value types for the Arbor component tree.
//!
//! This crate has minimal dependencies and is meant to be imported by
//! component libraries that don't need the full `arbor` tree.
//!
//! # Building Blocks
//!
//! ## Destinations ([`Destination`])
//!
//! Parses `path-to-node-action#anchor` strings into a target node path, a
//! signal name and an optional anchor. Actions must be alphanumeric.
//!
//! ## Persistent Properties ([`PropertyRegistry`])
//!
//! Component types declare their properties statically. A property is
//! persistent when it is public and marked so; the registry answers that
//! question per `(type, property)` and memoizes the answer process-wide.
//!
//! ## Components ([`Component`], [`ComponentType`], [`Handlers`])
//!
//! A component type carries static metadata (lineage, template directory,
//! capabilities) and explicit handler tables for views, pre-render hooks and
//! signals. Trees hold components as [`DynComponent`] trait objects.
//!
//! ## Collaborators ([`Presenter`], [`TemplateSource`], [`TemplateEngine`])
//!
//! The request context, template storage and template rendering are outside
//! the tree; these traits are their boundary.
//!
//! # Error Types
//!
//! - [`ArborError`] - Top-level error type
//! - [`DispatchError`] - Destination and argument errors
//! - [`LifecycleError`] - Render lifecycle errors

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod component;
mod destination;
mod error;
mod path;
mod presenter;
mod property;
mod render;
mod template;
mod value;

// Re-exports
pub use component::{
    Capabilities, Component, ComponentType, ComponentTypeBuilder, DynComponent, HandlerFn,
    Handlers, HandlersBuilder, Lineage, TEMPLATES_DIR, before_render_method, signal_method,
    view_method,
};
pub use destination::{
    ANCHOR_SEPARATOR, Destination, SIGNAL_MARKER, THIS, capitalize, is_valid_name,
};
pub use error::{ArborError, BoxError, DispatchError, HandlerTableError, LifecycleError};
pub use path::{NAME_SEPARATOR, NodePath};
pub use presenter::Presenter;
pub use property::{
    Access, PersistentState, PropertyDescriptor, PropertyRegistry, VIEW_PROPERTY,
};
pub use render::RenderState;
pub use template::{
    AJAX_ENABLED_VAR, CONTROL_VAR, TemplateEngine, TemplateSource, TemplateVars, VIEW_VAR,
};
pub use value::{Params, PropertyValue, Value, ValueError};

#[cfg(feature = "inventory")]
pub use component::ComponentRegistration;

#[cfg(feature = "inventory")]
pub use inventory;
