//! Persistent properties.
//!
//! Each component type carries a static list of [`PropertyDescriptor`]s. A
//! property is persistent when it is publicly accessible and marked
//! persistent; persistent properties travel with links, forwards and
//! redirects without being spelled out by the caller.
//!
//! [`PropertyRegistry`] answers "is this property persistent on this type?"
//! by walking the type lineage and memoizes the answer for the life of the
//! process.

use crate::component::ComponentType;
use crate::value::{Value, ValueError};
use std::collections::HashMap;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

/// Name of the view property every component carries.
pub const VIEW_PROPERTY: &str = "view";

/// Accessibility of a declared property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Access {
    /// Visible to the outside world; may be persistent.
    Public,
    /// Internal to the component; never persistent.
    Restricted,
}

/// Static metadata of one declared property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDescriptor {
    name: &'static str,
    value_type: &'static str,
    access: Access,
    persistent: bool,
}

impl PropertyDescriptor {
    /// A public, non-persistent property.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            value_type: "",
            access: Access::Public,
            persistent: false,
        }
    }

    /// Shorthand for a public persistent property.
    pub const fn persistent(name: &'static str) -> Self {
        Self::new(name).mark_persistent(true)
    }

    /// Set accessibility.
    #[must_use]
    pub const fn access(mut self, access: Access) -> Self {
        self.access = access;
        self
    }

    /// Set the persistent marker.
    #[must_use]
    pub const fn mark_persistent(mut self, persistent: bool) -> Self {
        self.persistent = persistent;
        self
    }

    /// Record the field's Rust type, for diagnostics.
    #[must_use]
    pub const fn value_type(mut self, value_type: &'static str) -> Self {
        self.value_type = value_type;
        self
    }

    /// Property name.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Declared field type, empty when unknown.
    pub const fn type_name(&self) -> &'static str {
        self.value_type
    }

    /// Declared accessibility.
    pub const fn accessibility(&self) -> Access {
        self.access
    }

    /// Public and marked persistent.
    pub const fn is_eligible(&self) -> bool {
        self.persistent && matches!(self.access, Access::Public)
    }
}

/// Typed access to a component's declared properties.
///
/// Usually derived with `#[derive(Persistent)]`.
pub trait PersistentState {
    /// Properties declared by this type itself, excluding inherited ones.
    fn properties() -> Vec<PropertyDescriptor>
    where
        Self: Sized;

    /// Read a declared property.
    fn property(&self, name: &str) -> Option<Value>;

    /// Write a declared property. `Ok(false)` means the name is not declared.
    fn set_property(&mut self, name: &str, value: Value) -> Result<bool, ValueError>;

    /// Check that `value` could be written to `name` without writing it.
    /// `Ok(false)` means the name is not declared.
    ///
    /// The default only checks that the name is readable.
    fn check_property(&self, name: &str, value: &Value) -> Result<bool, ValueError> {
        let _ = value;
        Ok(self.property(name).is_some())
    }
}

/// Keyed by type address; type names need not be unique.
type CacheKey = (usize, String);

/// Process-wide memo of persistent-property lookups.
///
/// Type metadata is static, so an answer once computed never changes.
/// Concurrent population is idempotent.
#[derive(Debug, Default)]
pub struct PropertyRegistry {
    cache: RwLock<HashMap<CacheKey, bool>>,
}

static GLOBAL: LazyLock<Arc<PropertyRegistry>> =
    LazyLock::new(|| Arc::new(PropertyRegistry::new()));

impl PropertyRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry shared by every request in the process.
    pub fn global() -> Arc<PropertyRegistry> {
        Arc::clone(&GLOBAL)
    }

    /// Whether `property` is persistent on `ty`.
    ///
    /// `view` is persistent on every type. Otherwise the most-derived
    /// declaration wins, so a base-type declaration applies unless a subtype
    /// redeclares the name. Unknown names report `false`.
    pub fn is_persistent(&self, ty: &'static ComponentType, property: &str) -> bool {
        if property == VIEW_PROPERTY {
            return true;
        }

        let key = (std::ptr::from_ref(ty) as usize, property.to_owned());
        if let Some(hit) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return *hit;
        }

        let eligible = ty
            .lineage()
            .find_map(|level| level.declared(property))
            .is_some_and(PropertyDescriptor::is_eligible);

        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, eligible);
        eligible
    }

    /// Names of every persistent property on `ty`, base types included.
    pub fn persistent_properties(&self, ty: &'static ComponentType) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = Vec::new();
        for level in ty.lineage() {
            for descriptor in level.properties() {
                if !names.contains(&descriptor.name())
                    && self.is_persistent(ty, descriptor.name())
                {
                    names.push(descriptor.name());
                }
            }
        }
        names
    }

    /// Number of memoized lookups.
    pub fn cached(&self) -> usize {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Warm the cache for every component type registered with
    /// [`register_component!`](crate::register_component).
    #[cfg(feature = "inventory")]
    pub fn preload(&self) {
        for registration in inventory::iter::<crate::component::ComponentRegistration> {
            let ty = (registration.component_type)();
            let _ = self.persistent_properties(ty);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::LazyLock;

    static BASE: LazyLock<ComponentType> = LazyLock::new(|| {
        ComponentType::builder("Base")
            .property(PropertyDescriptor::persistent("page"))
            .property(PropertyDescriptor::persistent("token").access(Access::Restricted))
            .property(PropertyDescriptor::new("title"))
            .build()
    });

    static DERIVED: LazyLock<ComponentType> = LazyLock::new(|| {
        ComponentType::builder("Derived")
            .extends(&BASE)
            .property(PropertyDescriptor::persistent("filter"))
            .build()
    });

    static SHADOWING: LazyLock<ComponentType> = LazyLock::new(|| {
        ComponentType::builder("Shadowing")
            .extends(&BASE)
            .property(PropertyDescriptor::new("page"))
            .build()
    });

    #[test]
    fn persistence_requires_public_and_marker() {
        let registry = PropertyRegistry::new();
        assert!(registry.is_persistent(&BASE, "page"));
        assert!(!registry.is_persistent(&BASE, "token"));
        assert!(!registry.is_persistent(&BASE, "title"));
        assert!(!registry.is_persistent(&BASE, "nope"));
    }

    #[test]
    fn base_declarations_are_inherited() {
        let registry = PropertyRegistry::new();
        assert!(registry.is_persistent(&DERIVED, "page"));
        assert!(registry.is_persistent(&DERIVED, "filter"));
        assert!(!registry.is_persistent(&BASE, "filter"));
        assert_eq!(registry.persistent_properties(&DERIVED), ["filter", "page"]);
    }

    #[test]
    fn redeclaration_in_subtype_wins() {
        let registry = PropertyRegistry::new();
        assert!(!registry.is_persistent(&SHADOWING, "page"));
    }

    #[test]
    fn lookups_are_memoized() {
        let registry = PropertyRegistry::new();
        registry.is_persistent(&DERIVED, "page");
        registry.is_persistent(&DERIVED, "page");
        registry.is_persistent(&DERIVED, "filter");
        assert_eq!(registry.cached(), 2);
    }

    #[test]
    fn types_sharing_a_name_are_cached_apart() {
        static ALIAS: LazyLock<ComponentType> = LazyLock::new(|| {
            ComponentType::builder("Base")
                .property(PropertyDescriptor::new("page"))
                .build()
        });

        let registry = PropertyRegistry::new();
        assert!(registry.is_persistent(&BASE, "page"));
        assert!(!registry.is_persistent(&ALIAS, "page"));
        assert_eq!(registry.cached(), 2);
    }

    #[test]
    fn view_is_always_persistent() {
        let registry = PropertyRegistry::new();
        assert!(registry.is_persistent(&BASE, VIEW_PROPERTY));
    }
}
