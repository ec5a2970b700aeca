//! Multiplier container.
//!
//! A [`Multiplier`] creates a child for *any* name through a factory
//! closure, typically one child per row id. It is AJAX-aware so that AJAX
//! state keeps flowing through it to the children it creates, but it is not
//! renderable itself and has no exclusion list.

use arbor_core::{
    Capabilities, Component, ComponentType, DynComponent, Handlers, PersistentState,
    PropertyDescriptor, Value, ValueError,
};
use std::sync::LazyLock;

/// Factory producing the child for a given name.
pub type ChildFactory = Box<dyn FnMut(&str) -> Option<Box<dyn DynComponent>> + Send>;

static MULTIPLIER_TYPE: LazyLock<ComponentType> = LazyLock::new(|| {
    ComponentType::builder("Multiplier")
        .capabilities(Capabilities::AJAX_AWARE)
        .build()
});

static MULTIPLIER_HANDLERS: LazyLock<Handlers<Multiplier>> = LazyLock::new(Handlers::empty);

/// Container creating children on demand.
pub struct Multiplier {
    factory: ChildFactory,
}

impl Multiplier {
    /// A multiplier creating every child with `factory`.
    pub fn new<F>(mut factory: F) -> Self
    where
        F: FnMut(&str) -> Box<dyn DynComponent> + Send + 'static,
    {
        Self {
            factory: Box::new(move |name| Some(factory(name))),
        }
    }

    /// A multiplier whose factory may decline a name.
    pub fn filtered<F>(factory: F) -> Self
    where
        F: FnMut(&str) -> Option<Box<dyn DynComponent>> + Send + 'static,
    {
        Self {
            factory: Box::new(factory),
        }
    }
}

impl PersistentState for Multiplier {
    fn properties() -> Vec<PropertyDescriptor> {
        Vec::new()
    }

    fn property(&self, _name: &str) -> Option<Value> {
        None
    }

    fn set_property(&mut self, _name: &str, _value: Value) -> Result<bool, ValueError> {
        Ok(false)
    }
}

impl Component for Multiplier {
    fn component_type() -> &'static ComponentType {
        &MULTIPLIER_TYPE
    }

    fn handlers() -> &'static Handlers<Self> {
        &MULTIPLIER_HANDLERS
    }

    fn create_child(&mut self, name: &str) -> Option<Box<dyn DynComponent>> {
        (self.factory)(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_children_for_any_name() {
        let mut multiplier = Multiplier::new(|_| Box::new(Multiplier::filtered(|_| None)));
        assert!(multiplier.spawn_child("1").is_some());
        assert!(multiplier.spawn_child("anything").is_some());

        let mut picky = Multiplier::filtered(|name| {
            name.parse::<u32>()
                .ok()
                .map(|_| Box::new(Multiplier::filtered(|_| None)) as Box<dyn DynComponent>)
        });
        assert!(picky.spawn_child("7").is_some());
        assert!(picky.spawn_child("x").is_none());
    }

    #[test]
    fn is_ajax_aware_but_not_renderable() {
        let ty = Multiplier::component_type();
        assert!(ty.supports(Capabilities::AJAX_AWARE));
        assert!(!ty.supports(Capabilities::RENDERABLE));
    }
}
