//! Component lifetime and ownership definitions.

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

/// Lifetime scope a component is registered with.
///
/// Controls how many instances the container creates and how long each
/// lives. The descriptor only records the choice; the container enforces it.
///
/// # Examples
///
/// ```rust
/// use ferrous_component::{ComponentDescriptor, ComponentScope};
///
/// let descriptor = ComponentDescriptor::new().with_scope(ComponentScope::SingleInstance);
/// assert_eq!(descriptor.scope(), ComponentScope::SingleInstance);
/// assert!(descriptor.scope().is_shared());
///
/// // Unspecified scope defers to the container
/// assert_eq!(ComponentDescriptor::new().scope(), ComponentScope::Default);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "snake_case"))]
pub enum ComponentScope {
    /// Whatever the container uses when no scope is requested
    #[default]
    Default,
    /// New instance for every dependency that requests it
    InstancePerDependency,
    /// One instance for the root container, shared everywhere
    SingleInstance,
    /// One instance per lifetime scope
    InstancePerLifetimeScope,
    /// One instance per request scope
    InstancePerRequest,
}

impl ComponentScope {
    /// Returns `true` for scopes that share one instance across resolutions.
    ///
    /// `Default` is not considered shared since the container decides.
    pub fn is_shared(&self) -> bool {
        matches!(
            self,
            ComponentScope::SingleInstance
                | ComponentScope::InstancePerLifetimeScope
                | ComponentScope::InstancePerRequest
        )
    }
}

/// Who releases a component's resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "snake_case"))]
pub enum Ownership {
    /// The container disposes the instance with its lifetime scope
    #[default]
    Owned,
    /// The caller is responsible for disposal
    External,
}
