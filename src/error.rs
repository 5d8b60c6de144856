//! Error types for descriptor validation and planning.

use std::fmt;
use thiserror::Error;

use crate::service::ServiceType;

/// Which malformed combination of `service`/`services`/`key`/`keys` was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeViolation {
    /// `keys` length differs from the effective service count
    KeysArityMismatch {
        /// Number of keys supplied
        keys: usize,
        /// Number of effective services
        services: usize,
    },
    /// Single `key` combined with more than one effective service
    KeyWithMultipleServices {
        /// Number of effective services
        services: usize,
    },
    /// Both `key` and `keys` were supplied
    KeyAndKeysCombined,
}

impl fmt::Display for ShapeViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeViolation::KeysArityMismatch { keys, services } => {
                write!(f, "{} keys for {} services", keys, services)
            }
            ShapeViolation::KeyWithMultipleServices { services } => {
                write!(f, "single key used with {} services, use keys instead", services)
            }
            ShapeViolation::KeyAndKeysCombined => write!(f, "key and keys are both set"),
        }
    }
}

/// Lifecycle hook slot on a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleHook {
    /// Invoked after construction
    Init,
    /// Invoked before disposal
    Destroy,
}

impl fmt::Display for LifecycleHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleHook::Init => f.write_str("init"),
            LifecycleHook::Destroy => f.write_str("destroy"),
        }
    }
}

/// Descriptor errors
///
/// Raised while a descriptor is consumed, never while it is attached.
/// Shape and lifecycle errors skip the single offending descriptor; conflicts
/// are reported as warnings and resolved by the ordering rule.
///
/// # Examples
///
/// ```rust
/// use ferrous_component::{service_of, DescriptorError, ShapeViolation};
///
/// let error = DescriptorError::InvalidDescriptorShape {
///     component: service_of::<u16>(),
///     violation: ShapeViolation::KeysArityMismatch { keys: 1, services: 2 },
/// };
/// assert_eq!(error.to_string(), "Invalid descriptor shape on u16: 1 keys for 2 services");
/// ```
#[derive(Debug, Clone, Error)]
pub enum DescriptorError {
    /// Mismatched arity between services and keys
    #[error("Invalid descriptor shape on {component}: {violation}")]
    InvalidDescriptorShape {
        component: ServiceType,
        violation: ShapeViolation,
    },
    /// Same `(service, key)` declared with ambiguous precedence
    #[error(
        "Conflicting descriptors on {component} for {service}{}: order indices {order_indices:?}",
        display_key(.key)
    )]
    ConflictingDescriptors {
        component: ServiceType,
        service: ServiceType,
        key: Option<String>,
        order_indices: Vec<i32>,
    },
    /// Lifecycle hook names a method the concrete type does not declare
    #[error("Missing {hook} method `{method}` on {component}")]
    MissingLifecycleMethod {
        component: ServiceType,
        hook: LifecycleHook,
        method: String,
    },
    /// Manifest references a type name the catalog does not know
    #[error("Unknown type in manifest: {name}")]
    UnknownType { name: String },
    /// Manifest could not be parsed
    #[error("Manifest error: {0}")]
    Manifest(String),
}

fn display_key(key: &Option<String>) -> String {
    match key {
        Some(k) => format!("[{}]", k),
        None => String::new(),
    }
}

impl DescriptorError {
    /// Component the error belongs to, when there is one.
    pub fn component(&self) -> Option<ServiceType> {
        match self {
            DescriptorError::InvalidDescriptorShape { component, .. }
            | DescriptorError::ConflictingDescriptors { component, .. }
            | DescriptorError::MissingLifecycleMethod { component, .. } => Some(*component),
            DescriptorError::UnknownType { .. } | DescriptorError::Manifest(_) => None,
        }
    }

    /// Returns `true` for shape errors.
    pub fn is_invalid_shape(&self) -> bool {
        matches!(self, DescriptorError::InvalidDescriptorShape { .. })
    }

    /// Returns `true` for conflict reports.
    pub fn is_conflict(&self) -> bool {
        matches!(self, DescriptorError::ConflictingDescriptors { .. })
    }
}

#[cfg(feature = "config")]
impl From<serde_json::Error> for DescriptorError {
    fn from(error: serde_json::Error) -> Self {
        DescriptorError::Manifest(error.to_string())
    }
}

#[cfg(feature = "config")]
impl From<serde_yaml::Error> for DescriptorError {
    fn from(error: serde_yaml::Error) -> Self {
        DescriptorError::Manifest(error.to_string())
    }
}

/// Result type for descriptor operations
pub type DescriptorResult<T> = Result<T, DescriptorError>;
