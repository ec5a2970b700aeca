//! Template collaborator traits.
//!
//! Arbor does not compile templates. It locates a template file through a
//! [`TemplateSource`] and hands the path plus a variable context to a
//! [`TemplateEngine`].

use crate::error::BoxError;
use crate::value::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// Variables exposed to a template.
pub type TemplateVars = BTreeMap<String, Value>;

/// Variable holding the rendered node's path.
pub const CONTROL_VAR: &str = "control";

/// Variable holding the rendered node's current view.
pub const VIEW_VAR: &str = "view";

/// Variable holding the rendered node's AJAX-enabled flag.
pub const AJAX_ENABLED_VAR: &str = "ajaxEnabled";

/// Where template files live.
pub trait TemplateSource: Send + Sync {
    /// Whether a template exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Read the template at `path`.
    fn read(&self, path: &Path) -> Result<String, BoxError>;
}

/// Renders a resolved template file.
pub trait TemplateEngine: Send + Sync {
    /// Render the template at `path` with `vars`.
    fn render(&self, path: &Path, vars: &TemplateVars) -> Result<String, BoxError>;
}

impl<T: TemplateSource + ?Sized> TemplateSource for std::sync::Arc<T> {
    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }

    fn read(&self, path: &Path) -> Result<String, BoxError> {
        (**self).read(path)
    }
}

impl<T: TemplateEngine + ?Sized> TemplateEngine for Box<T> {
    fn render(&self, path: &Path, vars: &TemplateVars) -> Result<String, BoxError> {
        (**self).render(path, vars)
    }
}
