//! Component collection module.
//!
//! This module contains the ComponentCollection type, the builder-side API
//! for attaching descriptors to types and planning registrations.

use std::sync::Arc;

use crate::declaration::TypeDeclaration;
use crate::descriptor::ComponentDescriptor;
use crate::observer::{Observers, PlanObserver};
use crate::plan::{self, RegistrationPlan};
use crate::registry::DescriptorTable;
use crate::service::ServiceType;

pub mod module_system;
pub use module_system::*;

/// Collects type declarations and descriptors, then plans registrations.
///
/// This is the explicit replacement for attaching metadata to a type
/// declaration: each type's descriptors live in a table keyed by the type's
/// identity. Descriptors are matched to their exact type only; nothing
/// propagates to subtypes or through trait hierarchies.
///
/// # Examples
///
/// ```rust
/// use ferrous_component::{
///     service_of, ComponentCollection, ComponentDescriptor, ComponentScope, TypeDeclaration,
/// };
///
/// trait Clock {}
/// struct SystemClock;
/// struct Scheduler;
///
/// let mut components = ComponentCollection::new();
/// components
///     .add_component::<SystemClock>(
///         ComponentDescriptor::for_service(service_of::<dyn Clock>())
///             .with_scope(ComponentScope::SingleInstance),
///     )
///     .declare(TypeDeclaration::concrete::<Scheduler>().with_method("start"))
///     .add_component::<Scheduler>(
///         ComponentDescriptor::new()
///             .with_auto_activate(true)
///             .with_init_method("start"),
///     );
///
/// let plan = components.build();
/// assert!(plan.report().is_clean());
/// assert_eq!(plan.len(), 2);
/// assert_eq!(plan.auto_activated().count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ComponentCollection {
    table: DescriptorTable,
    observers: Observers,
}

impl ComponentCollection {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self {
            table: DescriptorTable::new(),
            observers: Observers::new(),
        }
    }

    /// Declares a type's kind, base, and methods.
    ///
    /// A later declaration of the same type replaces the earlier one; its
    /// descriptors are kept.
    pub fn declare(&mut self, declaration: TypeDeclaration) -> &mut Self {
        self.table.declare(declaration);
        self
    }

    /// Attaches a descriptor to `T`.
    ///
    /// A type may carry several descriptors. They are kept in attachment
    /// order, which breaks `order_index` ties.
    pub fn add_component<T: ?Sized + 'static>(
        &mut self,
        descriptor: ComponentDescriptor,
    ) -> &mut Self {
        self.add_descriptor(ServiceType::of::<T>(), descriptor)
    }

    /// Attaches a descriptor to a type given by identity.
    pub fn add_descriptor(
        &mut self,
        component: ServiceType,
        descriptor: ComponentDescriptor,
    ) -> &mut Self {
        self.table.attach(component, descriptor);
        self
    }

    /// Attaches several descriptors to `T` at once.
    pub fn add_components<T: ?Sized + 'static>(
        &mut self,
        descriptors: impl IntoIterator<Item = ComponentDescriptor>,
    ) -> &mut Self {
        for descriptor in descriptors {
            self.add_component::<T>(descriptor);
        }
        self
    }

    /// Adds an observer notified during [`build`](Self::build).
    pub fn add_observer(&mut self, observer: Arc<dyn PlanObserver>) -> &mut Self {
        self.observers.add(observer);
        self
    }

    /// Moves every declaration, descriptor, and observer of `other` into this
    /// collection. Types new to this collection are scanned after existing ones.
    ///
    /// Types `other` only attached descriptors to keep the declaration made
    /// here, so a type declared abstract stays inert.
    pub fn merge(&mut self, other: ComponentCollection) -> &mut Self {
        self.table.merge(other.table);
        self.observers.extend(other.observers);
        self
    }

    /// The underlying descriptor table.
    pub fn table(&self) -> &DescriptorTable {
        &self.table
    }

    /// Descriptors attached to exactly `component`.
    pub fn descriptors_of(&self, component: ServiceType) -> &[ComponentDescriptor] {
        self.table.descriptors_of(component)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Plans registrations for everything collected so far.
    ///
    /// Never fails: descriptors that do not validate are skipped and listed in
    /// the plan's [report](RegistrationPlan::report).
    pub fn build(&self) -> RegistrationPlan {
        plan::plan(&self.table, &self.observers)
    }
}
