//! Template lookup and rendering.
//!
//! - [`TemplateResolver`]: finds a template along a component type's lineage
//! - [`FsTemplateSource`]: templates on disk
//! - [`DirectiveEngine`]: expands variables and directives such as `{ajax}`

pub mod directive;
pub mod fs;
pub mod resolver;

pub use directive::{
    AJAX_ATTRIBUTE, AjaxDirective, Directive, DirectiveEngine, DirectiveEngineBuilder,
    TemplateError,
};
pub use fs::FsTemplateSource;
pub use resolver::{DEFAULT_EXTENSION, TemplateResolver, TemplateResolverBuilder};
