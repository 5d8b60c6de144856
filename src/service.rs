//! Service type identities used by component descriptors.

use std::any::TypeId;
use std::fmt;

/// Identity of a type a component can be registered under.
///
/// Equality and hashing use the `TypeId` only; the name is carried for
/// diagnostics and manifest binding.
///
/// # Examples
///
/// ```rust
/// use ferrous_component::{service_of, ServiceType};
///
/// struct Database;
///
/// let a = service_of::<Database>();
/// let b = ServiceType::of::<Database>();
/// assert_eq!(a, b);
/// assert!(a.name().ends_with("Database"));
/// ```
#[derive(Clone, Copy)]
pub struct ServiceType {
    id: TypeId,
    name: &'static str,
}

impl ServiceType {
    /// Identity of `T`, including unsized trait objects such as `dyn Logger`.
    #[inline(always)]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// The `TypeId` backing this identity.
    pub fn type_id(&self) -> TypeId {
        self.id
    }

    /// Human-readable type name (`std::any::type_name`).
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for ServiceType {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ServiceType {}

impl std::hash::Hash for ServiceType {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Shorthand for [`ServiceType::of`].
#[inline(always)]
pub fn service_of<T: ?Sized + 'static>() -> ServiceType {
    ServiceType::of::<T>()
}

/// One resolved `(service, key)` pair a descriptor registers.
///
/// A `None` key is a keyless registration. Empty key strings are normalized
/// to `None` during resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceBinding {
    /// Type the component is resolvable as
    pub service: ServiceType,
    /// Discriminator for this slot
    pub key: Option<String>,
}

impl ServiceBinding {
    /// Creates a binding, normalizing an empty key to `None`.
    pub fn new(service: ServiceType, key: Option<&str>) -> Self {
        Self {
            service,
            key: normalize_key(key),
        }
    }

    /// Keyless binding for `service`.
    pub fn keyless(service: ServiceType) -> Self {
        Self { service, key: None }
    }

    /// Returns `true` when this binding carries a key.
    pub fn is_keyed(&self) -> bool {
        self.key.is_some()
    }
}

impl fmt::Display for ServiceBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.key {
            Some(key) => write!(f, "{}[{}]", self.service, key),
            None => write!(f, "{}", self.service),
        }
    }
}

pub(crate) fn normalize_key(key: Option<&str>) -> Option<String> {
    key.filter(|k| !k.is_empty()).map(str::to_owned)
}
