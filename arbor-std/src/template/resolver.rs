//! Template path resolution with lineage fallback.
//!
//! A node's template is looked up in the template directory of its concrete
//! type first, then in each base type's directory. A subtype therefore only
//! has to ship the templates it changes.

use super::fs::FsTemplateSource;
use arbor_core::{ComponentType, LifecycleError, TemplateSource, capitalize};
use std::path::PathBuf;
use std::sync::Arc;

/// Default template file extension.
pub const DEFAULT_EXTENSION: &str = "html";

/// Finds the template file for a `(type, view, render)` triple.
#[derive(Clone)]
pub struct TemplateResolver {
    source: Arc<dyn TemplateSource>,
    extension: String,
}

impl Default for TemplateResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateResolver {
    /// A resolver over the filesystem with the default extension.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Start configuring a resolver.
    pub fn builder() -> TemplateResolverBuilder {
        TemplateResolverBuilder {
            source: None,
            extension: DEFAULT_EXTENSION.to_owned(),
        }
    }

    /// The source templates are probed in.
    pub fn source(&self) -> &Arc<dyn TemplateSource> {
        &self.source
    }

    /// File name for `view` and `render`: `View.ext` or `View.Render.ext`.
    pub fn file_name(&self, view: &str, render: &str) -> String {
        if render.is_empty() {
            format!("{view}.{}", self.extension)
        } else {
            format!("{view}.{}.{}", capitalize(render), self.extension)
        }
    }

    /// Every candidate path, most-derived type first.
    pub fn candidates(&self, ty: &ComponentType, view: &str, render: &str) -> Vec<PathBuf> {
        let file_name = self.file_name(view, render);
        ty.template_roots()
            .into_iter()
            .map(|root| root.join(&file_name))
            .collect()
    }

    /// The first candidate that exists.
    ///
    /// Fails with [`LifecycleError::TemplateNotFound`] naming the view and
    /// the concrete type when the lineage is exhausted.
    pub fn resolve(
        &self,
        ty: &ComponentType,
        view: &str,
        render: &str,
    ) -> Result<PathBuf, LifecycleError> {
        self.candidates(ty, view, render)
            .into_iter()
            .find(|candidate| self.source.exists(candidate))
            .ok_or_else(|| LifecycleError::TemplateNotFound {
                view: view.to_owned(),
                component: ty.name(),
            })
    }
}

/// Builder for [`TemplateResolver`].
pub struct TemplateResolverBuilder {
    source: Option<Arc<dyn TemplateSource>>,
    extension: String,
}

impl TemplateResolverBuilder {
    /// Probe templates in `source` instead of the filesystem.
    #[must_use]
    pub fn source(mut self, source: Arc<dyn TemplateSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Template file extension, without the dot.
    #[must_use]
    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Build the resolver.
    pub fn build(self) -> TemplateResolver {
        TemplateResolver {
            source: self
                .source
                .unwrap_or_else(|| Arc::new(FsTemplateSource::new())),
            extension: self.extension,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn leak(ty: ComponentType) -> &'static ComponentType {
        Box::leak(Box::new(ty))
    }

    #[test]
    fn file_names_follow_view_and_render() {
        let resolver = TemplateResolver::new();
        assert_eq!(resolver.file_name("Default", ""), "Default.html");
        assert_eq!(resolver.file_name("Foo", "bar"), "Foo.Bar.html");

        let latte = TemplateResolver::builder().extension("latte").build();
        assert_eq!(latte.file_name("Default", ""), "Default.latte");
    }

    #[test]
    fn falls_back_to_base_type_directory() {
        let dir = tempfile::tempdir().unwrap();
        let base_dir = dir.path().join("base");
        let derived_dir = dir.path().join("derived");
        fs::create_dir_all(base_dir.join("templates")).unwrap();
        fs::create_dir_all(derived_dir.join("templates")).unwrap();
        fs::write(base_dir.join("templates/Default.html"), "base").unwrap();
        fs::write(derived_dir.join("templates/Edit.html"), "edit").unwrap();

        let base = leak(ComponentType::builder("Base").source_dir(&base_dir).build());
        let derived = ComponentType::builder("Derived")
            .extends(base)
            .source_dir(&derived_dir)
            .build();

        let resolver = TemplateResolver::new();
        assert_eq!(
            resolver.resolve(&derived, "Default", "").unwrap(),
            base_dir.join("templates/Default.html")
        );
        assert_eq!(
            resolver.resolve(&derived, "Edit", "").unwrap(),
            derived_dir.join("templates/Edit.html")
        );
    }

    #[test]
    fn exhausted_lineage_names_the_concrete_type() {
        let dir = tempfile::tempdir().unwrap();
        let base = leak(
            ComponentType::builder("Base")
                .template_dir(dir.path())
                .build(),
        );
        let derived = ComponentType::builder("Derived").extends(base).build();

        let err = TemplateResolver::new()
            .resolve(&derived, "Missing", "")
            .unwrap_err();
        match err {
            LifecycleError::TemplateNotFound { view, component } => {
                assert_eq!(view, "Missing");
                assert_eq!(component, "Derived");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn candidates_skip_levels_without_a_directory() {
        let base = leak(ComponentType::builder("Base").template_dir("/t/base").build());
        let middle = leak(ComponentType::builder("Middle").extends(base).build());
        let leaf = ComponentType::builder("Leaf")
            .extends(middle)
            .template_dir("/t/leaf")
            .build();

        let candidates = TemplateResolver::new().candidates(&leaf, "Default", "row");
        assert_eq!(
            candidates,
            [
                Path::new("/t/leaf/Default.Row.html"),
                Path::new("/t/base/Default.Row.html")
            ]
        );
    }
}
