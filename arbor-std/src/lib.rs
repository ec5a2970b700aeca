//! # arbor-std
//!
//! Standard implementations for the Arbor component tree.
//!
//! This crate provides:
//! - **Templates**: [`TemplateResolver`], [`FsTemplateSource`], [`DirectiveEngine`]
//!   with the [`AjaxDirective`]
//! - **Containers**: [`Multiplier`]
//! - **Presenter wrappers**: [`TracingPresenter`]
//! - **Testing doubles**: [`testing`]

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use arbor_core;

// Modules
pub mod multiplier;
pub mod presenter;
pub mod template;
pub mod testing;

pub use multiplier::{ChildFactory, Multiplier};
pub use presenter::TracingPresenter;
pub use template::{
    AJAX_ATTRIBUTE, AjaxDirective, Directive, DirectiveEngine, FsTemplateSource, TemplateError,
    TemplateResolver,
};
