//! Observers for registration planning events.
//!
//! Observers let a host follow what the planner does with each descriptor:
//! which registrations it emits, which descriptors it skips and why, which
//! conflicts it resolved, and which descriptors were inert.

use std::sync::Arc;

use crate::error::DescriptorError;
use crate::plan::PlannedRegistration;
use crate::service::ServiceType;

/// Observer trait for planning events.
///
/// Every method has an empty default so implementations only override what
/// they care about. Calls are synchronous during [`build`](crate::ComponentCollection::build).
///
/// # Examples
///
/// ```
/// use ferrous_component::{
///     ComponentCollection, ComponentDescriptor, DescriptorError, PlanObserver, ServiceType,
/// };
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// #[derive(Default)]
/// struct SkipCounter(AtomicUsize);
///
/// impl PlanObserver for SkipCounter {
///     fn skipped(&self, _component: ServiceType, _error: &DescriptorError) {
///         self.0.fetch_add(1, Ordering::SeqCst);
///     }
/// }
///
/// struct Broken;
///
/// let counter = Arc::new(SkipCounter::default());
/// let mut components = ComponentCollection::new();
/// components
///     .add_observer(counter.clone())
///     .add_component::<Broken>(ComponentDescriptor::new().with_keys(["a", "b"]));
///
/// components.build();
/// assert_eq!(counter.0.load(Ordering::SeqCst), 1);
/// ```
pub trait PlanObserver: Send + Sync {
    /// A registration was added to the plan.
    fn registered(&self, _registration: &PlannedRegistration) {}

    /// A descriptor was left out of the plan.
    fn skipped(&self, _component: ServiceType, _error: &DescriptorError) {}

    /// A conflict was resolved by the ordering rule.
    fn conflict(&self, _warning: &DescriptorError) {}

    /// Descriptors were ignored because their type is abstract.
    fn inert(&self, _component: ServiceType) {}
}

/// Container for registered observers.
#[derive(Default, Clone)]
pub(crate) struct Observers {
    observers: Vec<Arc<dyn PlanObserver>>,
}

impl Observers {
    pub(crate) fn new() -> Self {
        Self {
            observers: Vec::new(),
        }
    }

    pub(crate) fn add(&mut self, observer: Arc<dyn PlanObserver>) {
        self.observers.push(observer);
    }

    pub(crate) fn extend(&mut self, other: Observers) {
        self.observers.extend(other.observers);
    }

    #[inline]
    pub(crate) fn registered(&self, registration: &PlannedRegistration) {
        for observer in &self.observers {
            observer.registered(registration);
        }
    }

    #[inline]
    pub(crate) fn skipped(&self, component: ServiceType, error: &DescriptorError) {
        for observer in &self.observers {
            observer.skipped(component, error);
        }
    }

    #[inline]
    pub(crate) fn conflict(&self, warning: &DescriptorError) {
        for observer in &self.observers {
            observer.conflict(warning);
        }
    }

    #[inline]
    pub(crate) fn inert(&self, component: ServiceType) {
        for observer in &self.observers {
            observer.inert(component);
        }
    }
}

impl std::fmt::Debug for Observers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers")
            .field("count", &self.observers.len())
            .finish()
    }
}

/// Built-in observer that forwards planning events to `tracing`.
///
/// Registrations are logged at `info`, skips and conflicts at `warn`, inert
/// descriptors at `debug`. Every event carries the observer's prefix so
/// several collections can be told apart in one log.
///
/// # Examples
///
/// ```
/// use ferrous_component::{ComponentCollection, LoggingObserver};
/// use std::sync::Arc;
///
/// let mut components = ComponentCollection::new();
/// components.add_observer(Arc::new(LoggingObserver::with_prefix("billing")));
/// ```
#[derive(Debug, Clone)]
pub struct LoggingObserver {
    prefix: String,
}

impl LoggingObserver {
    /// Creates a logging observer with the default prefix.
    pub fn new() -> Self {
        Self {
            prefix: "ferrous-component".to_string(),
        }
    }

    /// Creates a logging observer with a custom prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl Default for LoggingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl PlanObserver for LoggingObserver {
    fn registered(&self, registration: &PlannedRegistration) {
        tracing::info!(
            prefix = %self.prefix,
            sequence = registration.sequence(),
            component = registration.component().name(),
            order_index = registration.order_index(),
            scope = ?registration.scope(),
            "registered component"
        );
    }

    fn skipped(&self, component: ServiceType, error: &DescriptorError) {
        tracing::warn!(
            prefix = %self.prefix,
            component = component.name(),
            %error,
            "skipped descriptor"
        );
    }

    fn conflict(&self, warning: &DescriptorError) {
        tracing::warn!(prefix = %self.prefix, %warning, "conflicting descriptors");
    }

    fn inert(&self, component: ServiceType) {
        tracing::debug!(prefix = %self.prefix, component = component.name(), "inert descriptor");
    }
}
