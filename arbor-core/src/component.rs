//! # Components
//!
//! A component is one node type of the tree. Everything the dispatch and
//! render machinery needs to know about a type is declared up front:
//!
//! - [`ComponentType`] - static metadata: name, base type, declared
//!   properties, template directory and [`Capabilities`].
//! - [`Handlers`] - explicit tables of view, pre-render and signal handlers,
//!   validated when the table is built.
//! - [`Component`] - the trait a user type implements to tie the two together.
//!
//! Trees store components type-erased as `Box<dyn DynComponent>`; every
//! [`Component`] is a [`DynComponent`] through a blanket implementation.

use crate::destination::{capitalize, is_valid_name};
use crate::error::{BoxError, HandlerTableError};
use crate::property::{PersistentState, PropertyDescriptor};
use crate::template::TemplateVars;
use crate::value::{Params, Value, ValueError};
use bitflags::bitflags;
use std::any::Any;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Directory name, next to a type's source, that holds its templates.
pub const TEMPLATES_DIR: &str = "templates";

bitflags! {
    /// Optional abilities a component type opts into.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capabilities: u8 {
        /// Renders through the lifecycle and can be redrawn.
        const RENDERABLE = 1;
        /// Accepts AJAX state propagated from its parent.
        const AJAX_AWARE = 1 << 1;
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Capabilities::RENDERABLE | Capabilities::AJAX_AWARE
    }
}

/// Static metadata of a component type.
#[derive(Debug)]
pub struct ComponentType {
    name: &'static str,
    base: Option<&'static ComponentType>,
    properties: Vec<PropertyDescriptor>,
    template_dir: Option<PathBuf>,
    capabilities: Capabilities,
}

impl ComponentType {
    /// Start describing a type.
    pub fn builder(name: &'static str) -> ComponentTypeBuilder {
        ComponentTypeBuilder {
            name,
            base: None,
            properties: Vec::new(),
            template_dir: None,
            capabilities: None,
        }
    }

    /// Type name, used in diagnostics and as the property cache key.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The type this one extends.
    pub const fn base(&self) -> Option<&'static ComponentType> {
        self.base
    }

    /// Properties declared at this level.
    pub fn properties(&self) -> &[PropertyDescriptor] {
        &self.properties
    }

    /// Look up a property declared at this level.
    pub fn declared(&self, property: &str) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|p| p.name() == property)
    }

    /// Template directory declared at this level.
    pub fn template_dir(&self) -> Option<&Path> {
        self.template_dir.as_deref()
    }

    /// Capability set.
    pub const fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Whether the type opts into all of `capabilities`.
    pub const fn supports(&self, capabilities: Capabilities) -> bool {
        self.capabilities.contains(capabilities)
    }

    /// This type followed by its base types, most-derived first.
    pub fn lineage(&self) -> Lineage<'_> {
        Lineage { next: Some(self) }
    }

    /// Template search roots, most-derived first.
    pub fn template_roots(&self) -> Vec<&Path> {
        self.lineage().filter_map(ComponentType::template_dir).collect()
    }
}

/// Iterator over a type and its bases.
pub struct Lineage<'a> {
    next: Option<&'a ComponentType>,
}

impl<'a> Iterator for Lineage<'a> {
    type Item = &'a ComponentType;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.base;
        Some(current)
    }
}

/// Builder for [`ComponentType`].
pub struct ComponentTypeBuilder {
    name: &'static str,
    base: Option<&'static ComponentType>,
    properties: Vec<PropertyDescriptor>,
    template_dir: Option<PathBuf>,
    capabilities: Option<Capabilities>,
}

impl ComponentTypeBuilder {
    /// Extend `base`. Capabilities are inherited unless set explicitly.
    #[must_use]
    pub fn extends(mut self, base: &'static ComponentType) -> Self {
        self.base = Some(base);
        self
    }

    /// Declare one property.
    #[must_use]
    pub fn property(mut self, descriptor: PropertyDescriptor) -> Self {
        self.properties.push(descriptor);
        self
    }

    /// Declare several properties, typically `T::properties()`.
    #[must_use]
    pub fn properties(mut self, descriptors: impl IntoIterator<Item = PropertyDescriptor>) -> Self {
        self.properties.extend(descriptors);
        self
    }

    /// Directory holding this type's templates.
    #[must_use]
    pub fn template_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.template_dir = Some(dir.into());
        self
    }

    /// Directory holding this type's source; templates live in its
    /// [`TEMPLATES_DIR`] subdirectory.
    #[must_use]
    pub fn source_dir(self, dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref().join(TEMPLATES_DIR);
        self.template_dir(dir)
    }

    /// Set the capability set explicitly.
    #[must_use]
    pub fn capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = Some(capabilities);
        self
    }

    /// Finish the type.
    pub fn build(self) -> ComponentType {
        let capabilities = self.capabilities.unwrap_or_else(|| {
            self.base
                .map_or_else(Capabilities::default, ComponentType::capabilities)
        });
        ComponentType {
            name: self.name,
            base: self.base,
            properties: self.properties,
            template_dir: self.template_dir,
            capabilities,
        }
    }
}

/// Signature of view, pre-render and signal handlers.
pub type HandlerFn<C> = fn(&mut C, &Params) -> Result<(), BoxError>;

/// Conventional name of a view handler: `view` + capitalized view.
pub fn view_method(view: &str) -> String {
    format!("view{}", capitalize(view))
}

/// Conventional name of a pre-render handler: `beforeRender` + capitalized
/// render name; the empty render name maps to plain `beforeRender`.
pub fn before_render_method(render: &str) -> String {
    format!("beforeRender{}", capitalize(render))
}

/// Conventional name of a signal handler: `handle` + capitalized signal.
pub fn signal_method(signal: &str) -> String {
    format!("handle{}", capitalize(signal))
}

/// Explicit handler tables of one component type.
///
/// Keys are stored capitalized, so `view("default", ..)` and a lookup of
/// `"Default"` meet.
pub struct Handlers<C> {
    views: HashMap<String, HandlerFn<C>>,
    renders: HashMap<String, HandlerFn<C>>,
    signals: HashMap<String, HandlerFn<C>>,
}

impl<C> Handlers<C> {
    /// Start a handler table.
    pub fn builder() -> HandlersBuilder<C> {
        HandlersBuilder {
            views: Vec::new(),
            renders: Vec::new(),
            signals: Vec::new(),
        }
    }

    /// A table with no handlers at all.
    pub fn empty() -> Self {
        Self {
            views: HashMap::new(),
            renders: HashMap::new(),
            signals: HashMap::new(),
        }
    }

    /// Handler for `view`.
    pub fn view(&self, view: &str) -> Option<HandlerFn<C>> {
        self.views.get(&capitalize(view)).copied()
    }

    /// Pre-render handler for `render`.
    pub fn before_render(&self, render: &str) -> Option<HandlerFn<C>> {
        self.renders.get(&capitalize(render)).copied()
    }

    /// Handler for `signal`.
    pub fn signal(&self, signal: &str) -> Option<HandlerFn<C>> {
        self.signals.get(&capitalize(signal)).copied()
    }

    /// Whether `view` has a registered handler.
    pub fn has_view(&self, view: &str) -> bool {
        self.views.contains_key(&capitalize(view))
    }

    /// Registered view names.
    pub fn views(&self) -> impl Iterator<Item = &str> {
        self.views.keys().map(String::as_str)
    }
}

/// Builder for [`Handlers`].
pub struct HandlersBuilder<C> {
    views: Vec<(String, HandlerFn<C>)>,
    renders: Vec<(String, HandlerFn<C>)>,
    signals: Vec<(String, HandlerFn<C>)>,
}

impl<C> HandlersBuilder<C> {
    /// Register the handler for `view`.
    #[must_use]
    pub fn view(mut self, view: &str, handler: HandlerFn<C>) -> Self {
        self.views.push((view.to_owned(), handler));
        self
    }

    /// Register the pre-render handler for `render` (`""` for the default render).
    #[must_use]
    pub fn before_render(mut self, render: &str, handler: HandlerFn<C>) -> Self {
        self.renders.push((render.to_owned(), handler));
        self
    }

    /// Register the handler for `signal`.
    #[must_use]
    pub fn signal(mut self, signal: &str, handler: HandlerFn<C>) -> Self {
        self.signals.push((signal.to_owned(), handler));
        self
    }

    /// Validate names and build the table.
    pub fn build(self) -> Result<Handlers<C>, HandlerTableError> {
        Ok(Handlers {
            views: table("view", self.views, false)?,
            renders: table("render", self.renders, true)?,
            signals: table("signal", self.signals, false)?,
        })
    }
}

fn table<C>(
    kind: &'static str,
    entries: Vec<(String, HandlerFn<C>)>,
    allow_empty: bool,
) -> Result<HashMap<String, HandlerFn<C>>, HandlerTableError> {
    let mut map = HashMap::with_capacity(entries.len());
    for (name, handler) in entries {
        if !(is_valid_name(&name) || (allow_empty && name.is_empty())) {
            return Err(HandlerTableError::InvalidName { kind, name });
        }
        if map.insert(capitalize(&name), handler).is_some() {
            return Err(HandlerTableError::Duplicate { kind, name });
        }
    }
    Ok(map)
}

/// A node type of the component tree.
pub trait Component: PersistentState + Any + Send {
    /// Static metadata of the type.
    fn component_type() -> &'static ComponentType
    where
        Self: Sized;

    /// Handler tables of the type.
    fn handlers() -> &'static Handlers<Self>
    where
        Self: Sized;

    /// Instantiate the child called `name`, if this type has one.
    fn create_child(&mut self, name: &str) -> Option<Box<dyn DynComponent>> {
        let _ = name;
        None
    }

    /// Called during a forward with the link-formatted destination and its
    /// anchor. Does nothing by default.
    fn process_destination(&mut self, url: &str, anchor: Option<&str>) {
        let _ = (url, anchor);
    }

    /// Add component-specific template variables.
    fn template_vars(&self, vars: &mut TemplateVars) {
        let _ = vars;
    }
}

/// Object-safe view of a [`Component`].
///
/// Handler lookups return `None` when the type registers no such handler.
pub trait DynComponent: Any + Send {
    /// Static metadata of the concrete type.
    fn kind(&self) -> &'static ComponentType;

    /// Read a declared property.
    fn read_property(&self, name: &str) -> Option<Value>;

    /// Write a declared property.
    fn write_property(&mut self, name: &str, value: Value) -> Result<bool, ValueError>;

    /// Validate a write without performing it.
    fn check_property(&self, name: &str, value: &Value) -> Result<bool, ValueError>;

    /// Run the handler for `view`.
    fn call_view(&mut self, view: &str, params: &Params) -> Option<Result<(), BoxError>>;

    /// Run the pre-render handler for `render`.
    fn call_before_render(&mut self, render: &str, params: &Params)
    -> Option<Result<(), BoxError>>;

    /// Run the handler for `signal`.
    fn call_signal(&mut self, signal: &str, params: &Params) -> Option<Result<(), BoxError>>;

    /// Instantiate a child.
    fn spawn_child(&mut self, name: &str) -> Option<Box<dyn DynComponent>>;

    /// Forward hook, see [`Component::process_destination`].
    fn on_destination(&mut self, url: &str, anchor: Option<&str>);

    /// Add component-specific template variables.
    fn collect_vars(&self, vars: &mut TemplateVars);

    /// Upcast for downcasting to the concrete type.
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for downcasting to the concrete type.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<C: Component> DynComponent for C {
    fn kind(&self) -> &'static ComponentType {
        C::component_type()
    }

    fn read_property(&self, name: &str) -> Option<Value> {
        PersistentState::property(self, name)
    }

    fn write_property(&mut self, name: &str, value: Value) -> Result<bool, ValueError> {
        PersistentState::set_property(self, name, value)
    }

    fn check_property(&self, name: &str, value: &Value) -> Result<bool, ValueError> {
        PersistentState::check_property(self, name, value)
    }

    fn call_view(&mut self, view: &str, params: &Params) -> Option<Result<(), BoxError>> {
        C::handlers().view(view).map(|handler| handler(self, params))
    }

    fn call_before_render(
        &mut self,
        render: &str,
        params: &Params,
    ) -> Option<Result<(), BoxError>> {
        C::handlers()
            .before_render(render)
            .map(|handler| handler(self, params))
    }

    fn call_signal(&mut self, signal: &str, params: &Params) -> Option<Result<(), BoxError>> {
        C::handlers().signal(signal).map(|handler| handler(self, params))
    }

    fn spawn_child(&mut self, name: &str) -> Option<Box<dyn DynComponent>> {
        Component::create_child(self, name)
    }

    fn on_destination(&mut self, url: &str, anchor: Option<&str>) {
        Component::process_destination(self, url, anchor);
    }

    fn collect_vars(&self, vars: &mut TemplateVars) {
        Component::template_vars(self, vars);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Link-time registration of a component type.
#[cfg(feature = "inventory")]
pub struct ComponentRegistration {
    /// Accessor of the registered type's metadata.
    pub component_type: fn() -> &'static ComponentType,
}

#[cfg(feature = "inventory")]
inventory::collect!(ComponentRegistration);

/// Register a [`Component`] type so that
/// [`PropertyRegistry::preload`](crate::PropertyRegistry::preload) can warm
/// its property lookups at startup.
#[cfg(feature = "inventory")]
#[macro_export]
macro_rules! register_component {
    ($component:ty) => {
        $crate::inventory::submit! {
            $crate::ComponentRegistration {
                component_type: <$component as $crate::Component>::component_type,
            }
        }
    };
}
