//! Directive-expanding template engine.
//!
//! A small engine: it reads a template from a
//! [`TemplateSource`] and replaces tags in braces.
//!
//! - `{$name}` prints the HTML-escaped template variable `name`.
//! - `{directive}` expands an installed [`Directive`].
//!
//! Anything else in braces (CSS blocks, inline scripts, unknown tags) is
//! copied through untouched.
//!
//! The one directive components rely on is [`AjaxDirective`]: `{ajax}`
//! prints a boolean data attribute reflecting the node's AJAX-enabled flag,
//! so client code can tell which elements patch themselves in place.

use super::fs::FsTemplateSource;
use arbor_core::{AJAX_ENABLED_VAR, BoxError, TemplateEngine, TemplateSource, TemplateVars};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Attribute printed by [`AjaxDirective`].
pub const AJAX_ATTRIBUTE: &str = "data-arbor-ajax";

/// Errors raised while expanding a template.
#[derive(Error, Debug)]
pub enum TemplateError {
    /// The template could not be read.
    #[error("cannot read template {path:?}")]
    Read {
        /// Template path.
        path: PathBuf,
        /// Source error.
        #[source]
        source: BoxError,
    },

    /// A `{$name}` tag referenced a variable that is not set.
    #[error("undefined variable ${name} in template {path:?}")]
    UndefinedVariable {
        /// Template path.
        path: PathBuf,
        /// Variable name.
        name: String,
    },

    /// A directive failed to expand.
    #[error("directive {{{name}}} failed in template {path:?}")]
    Directive {
        /// Template path.
        path: PathBuf,
        /// Directive name.
        name: String,
        /// Directive error.
        #[source]
        source: BoxError,
    },
}

/// A custom template tag.
pub trait Directive: Send + Sync {
    /// Tag name, as written between the braces.
    fn name(&self) -> &str;

    /// Produce the tag's output for the current variables.
    fn expand(&self, vars: &TemplateVars) -> Result<String, BoxError>;
}

/// `{ajax}`: prints ` data-arbor-ajax="true"` or ` data-arbor-ajax="false"`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AjaxDirective;

impl Directive for AjaxDirective {
    fn name(&self) -> &str {
        "ajax"
    }

    fn expand(&self, vars: &TemplateVars) -> Result<String, BoxError> {
        let enabled = vars
            .get(AJAX_ENABLED_VAR)
            .and_then(arbor_core::Value::as_bool)
            .unwrap_or(false);
        Ok(format!(" {AJAX_ATTRIBUTE}=\"{enabled}\""))
    }
}

/// Template engine expanding variables and installed directives.
pub struct DirectiveEngine {
    source: Arc<dyn TemplateSource>,
    directives: HashMap<String, Box<dyn Directive>>,
}

impl Default for DirectiveEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl DirectiveEngine {
    /// A filesystem-backed engine with [`AjaxDirective`] installed.
    pub fn new() -> Self {
        Self::builder().install(AjaxDirective).build()
    }

    /// Start configuring an engine with no directives.
    pub fn builder() -> DirectiveEngineBuilder {
        DirectiveEngineBuilder {
            source: None,
            directives: HashMap::new(),
        }
    }

    /// Whether a directive called `name` is installed.
    pub fn has_directive(&self, name: &str) -> bool {
        self.directives.contains_key(name)
    }

    /// Expand the tags of an already loaded template.
    pub fn expand(
        &self,
        template: &str,
        path: &Path,
        vars: &TemplateVars,
    ) -> Result<String, TemplateError> {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(start) = rest.find('{') {
            out.push_str(&rest[..start]);
            let after = &rest[start + 1..];
            match after.find('}') {
                Some(end) if is_tag(&after[..end]) => {
                    self.expand_tag(&after[..end], path, vars, &mut out)?;
                    rest = &after[end + 1..];
                }
                _ => {
                    out.push('{');
                    rest = after;
                }
            }
        }
        out.push_str(rest);
        Ok(out)
    }

    fn expand_tag(
        &self,
        tag: &str,
        path: &Path,
        vars: &TemplateVars,
        out: &mut String,
    ) -> Result<(), TemplateError> {
        if let Some(name) = tag.strip_prefix('$') {
            let value = vars
                .get(name)
                .ok_or_else(|| TemplateError::UndefinedVariable {
                    path: path.to_owned(),
                    name: name.to_owned(),
                })?;
            escape_into(&value.to_string(), out);
            return Ok(());
        }

        match self.directives.get(tag) {
            Some(directive) => {
                let expanded = directive
                    .expand(vars)
                    .map_err(|source| TemplateError::Directive {
                        path: path.to_owned(),
                        name: tag.to_owned(),
                        source,
                    })?;
                out.push_str(&expanded);
            }
            None => {
                out.push('{');
                out.push_str(tag);
                out.push('}');
            }
        }
        Ok(())
    }
}

impl TemplateEngine for DirectiveEngine {
    fn render(&self, path: &Path, vars: &TemplateVars) -> Result<String, BoxError> {
        let template = self
            .source
            .read(path)
            .map_err(|source| TemplateError::Read {
                path: path.to_owned(),
                source,
            })?;
        Ok(self.expand(&template, path, vars)?)
    }
}

/// Builder for [`DirectiveEngine`].
pub struct DirectiveEngineBuilder {
    source: Option<Arc<dyn TemplateSource>>,
    directives: HashMap<String, Box<dyn Directive>>,
}

impl DirectiveEngineBuilder {
    /// Read templates from `source` instead of the filesystem.
    #[must_use]
    pub fn source(mut self, source: Arc<dyn TemplateSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Install a directive. A later directive with the same name replaces
    /// the earlier one.
    #[must_use]
    pub fn install<D: Directive + 'static>(mut self, directive: D) -> Self {
        self.directives
            .insert(directive.name().to_owned(), Box::new(directive));
        self
    }

    /// Build the engine.
    pub fn build(self) -> DirectiveEngine {
        DirectiveEngine {
            source: self
                .source
                .unwrap_or_else(|| Arc::new(FsTemplateSource::new())),
            directives: self.directives,
        }
    }
}

fn is_tag(inner: &str) -> bool {
    let name = inner.strip_prefix('$').unwrap_or(inner);
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn escape_into(raw: &str, out: &mut String) {
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_core::Value;

    fn vars(ajax: bool) -> TemplateVars {
        let mut vars = TemplateVars::new();
        vars.insert(AJAX_ENABLED_VAR.into(), Value::Bool(ajax));
        vars.insert("title".into(), Value::from("<b>Tom & Jerry</b>"));
        vars
    }

    #[test]
    fn ajax_directive_reflects_flag() {
        let engine = DirectiveEngine::new();
        let path = Path::new("Default.html");
        assert_eq!(
            engine.expand("<div{ajax}>", path, &vars(true)).unwrap(),
            "<div data-arbor-ajax=\"true\">"
        );
        assert_eq!(
            engine.expand("<div{ajax}>", path, &vars(false)).unwrap(),
            "<div data-arbor-ajax=\"false\">"
        );
    }

    #[test]
    fn variables_are_escaped() {
        let engine = DirectiveEngine::new();
        let out = engine
            .expand("<h1>{$title}</h1>", Path::new("t.html"), &vars(false))
            .unwrap();
        assert_eq!(out, "<h1>&lt;b&gt;Tom &amp; Jerry&lt;/b&gt;</h1>");
    }

    #[test]
    fn non_tags_pass_through() {
        let engine = DirectiveEngine::new();
        let css = "p { color: red; } {unknown} {";
        assert_eq!(
            engine.expand(css, Path::new("t.html"), &vars(false)).unwrap(),
            css
        );
    }

    #[test]
    fn undefined_variable_is_an_error() {
        let engine = DirectiveEngine::new();
        let err = engine
            .expand("{$missing}", Path::new("t.html"), &vars(false))
            .unwrap_err();
        assert!(matches!(err, TemplateError::UndefinedVariable { name, .. } if name == "missing"));
    }

    #[test]
    fn engine_without_install_leaves_ajax_tag() {
        let engine = DirectiveEngine::builder().build();
        assert!(!engine.has_directive("ajax"));
        assert_eq!(
            engine
                .expand("<a{ajax}>", Path::new("t.html"), &vars(true))
                .unwrap(),
            "<a{ajax}>"
        );
    }
}
