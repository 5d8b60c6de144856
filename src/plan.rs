//! Registration planning: expanding a descriptor table into ordered registrations.
//!
//! The planner is the container-builder side of a descriptor. For every
//! concrete type in the table it resolves each attached descriptor, checks its
//! lifecycle hooks against the declared methods, and then orders the
//! survivors:
//!
//! 1. Registrations are grouped by `(service, key)`.
//! 2. Within a group, higher `order_index` registers first; equal values keep
//!    scan order (table order, then attachment order).
//! 3. A keyless resolve returns the most recently registered candidate, which
//!    is the one with the **smallest** `order_index`.
//!
//! Point 3 is counter-intuitive and deliberate: containers resolve "last
//! registration wins", and the ordering is a compatibility contract with that
//! convention.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::declaration::TypeDeclaration;
use crate::descriptor::{Interception, LifecycleHooks, PropertyInjection, ResolvedDescriptor};
use crate::error::{DescriptorError, DescriptorResult, LifecycleHook};
use crate::lifetime::{ComponentScope, Ownership};
use crate::observer::Observers;
use crate::registry::DescriptorTable;
use crate::service::{normalize_key, ServiceBinding, ServiceType};
use crate::validation::PlanReport;

/// One registration the container should perform, in plan order.
///
/// A registration covers every `(service, key)` binding of a single resolved
/// descriptor, the way one container registration exposes several services.
#[derive(Debug, Clone)]
pub struct PlannedRegistration {
    sequence: usize,
    descriptor: Arc<ResolvedDescriptor>,
}

impl PlannedRegistration {
    /// Zero-based position in registration order.
    pub fn sequence(&self) -> usize {
        self.sequence
    }

    /// The declaring component type.
    pub fn component(&self) -> ServiceType {
        self.descriptor.component()
    }

    /// Resolved `(service, key)` pairs.
    pub fn effective_services(&self) -> &[ServiceBinding] {
        self.descriptor.effective_services()
    }

    /// Returns `true` if this registration exposes `service` under `key`.
    pub fn provides(&self, service: ServiceType, key: Option<&str>) -> bool {
        self.effective_services()
            .iter()
            .any(|b| b.service == service && b.key.as_deref() == key)
    }

    /// Registration precedence; higher registers first.
    pub fn order_index(&self) -> i32 {
        self.descriptor.order_index()
    }

    /// Lifetime scope of the component.
    pub fn scope(&self) -> ComponentScope {
        self.descriptor.scope()
    }

    /// Whether the container instantiates it eagerly.
    pub fn auto_activate(&self) -> bool {
        self.descriptor.auto_activate()
    }

    /// Property injection switch and mode.
    pub fn property_injection_policy(&self) -> PropertyInjection {
        self.descriptor.property_injection_policy()
    }

    /// Who disposes instances.
    pub fn ownership(&self) -> Ownership {
        self.descriptor.ownership()
    }

    /// Interceptor, if an interceptor type is set.
    pub fn interception(&self) -> Option<Interception> {
        self.descriptor.interception()
    }

    /// Init and destroy method names.
    pub fn lifecycle_hooks(&self) -> LifecycleHooks<'_> {
        self.descriptor.lifecycle_hooks()
    }

    /// The resolved descriptor behind this registration.
    pub fn descriptor(&self) -> &ResolvedDescriptor {
        &self.descriptor
    }
}

/// Ordered registrations plus the report of everything left out.
///
/// # Examples
///
/// ```
/// use ferrous_component::{service_of, ComponentCollection, ComponentDescriptor};
///
/// trait Codec {}
/// struct Gzip;
/// struct Brotli;
/// struct Zstd;
///
/// let codec = service_of::<dyn Codec>();
/// let mut components = ComponentCollection::new();
/// components
///     .add_component::<Gzip>(ComponentDescriptor::for_service(codec).with_order_index(10))
///     .add_component::<Brotli>(ComponentDescriptor::for_service(codec).with_order_index(5))
///     .add_component::<Zstd>(ComponentDescriptor::for_service(codec).with_order_index(1));
///
/// let plan = components.build();
///
/// // Highest order index registers first...
/// let order: Vec<_> = plan.registrations().iter().map(|r| r.order_index()).collect();
/// assert_eq!(order, vec![10, 5, 1]);
///
/// // ...so a keyless resolve returns the smallest one.
/// assert_eq!(plan.resolve(codec).unwrap().component(), service_of::<Zstd>());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RegistrationPlan {
    registrations: Vec<PlannedRegistration>,
    report: PlanReport,
}

impl RegistrationPlan {
    /// Registrations in the order the container must perform them.
    pub fn registrations(&self) -> &[PlannedRegistration] {
        &self.registrations
    }

    /// Descriptors skipped, conflicts and inert types found while planning.
    pub fn report(&self) -> &PlanReport {
        &self.report
    }

    /// Number of planned registrations.
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    /// Returns `true` if nothing will be registered.
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Registrations exposing `service` under `key`, in registration order.
    pub fn candidates<'a>(
        &'a self,
        service: ServiceType,
        key: Option<&str>,
    ) -> impl DoubleEndedIterator<Item = &'a PlannedRegistration> + 'a {
        let key = normalize_key(key);
        self.registrations
            .iter()
            .filter(move |r| r.provides(service, key.as_deref()))
    }

    /// Keyless resolve: the last registered keyless candidate for `service`.
    ///
    /// Because higher `order_index` registers first, this is the candidate
    /// with the smallest `order_index` (ties go to the last one scanned).
    pub fn resolve(&self, service: ServiceType) -> Option<&PlannedRegistration> {
        self.candidates(service, None).next_back()
    }

    /// Keyed resolve: the last registered candidate for `(service, key)`.
    pub fn resolve_keyed(&self, service: ServiceType, key: &str) -> Option<&PlannedRegistration> {
        let key = normalize_key(Some(key));
        self.registrations
            .iter()
            .rev()
            .find(|r| r.provides(service, key.as_deref()))
    }

    /// Every keyless candidate for `service`, in registration order.
    pub fn resolve_all(&self, service: ServiceType) -> Vec<&PlannedRegistration> {
        self.candidates(service, None).collect()
    }

    /// Registrations of `component`, in registration order.
    pub fn registrations_of(&self, component: ServiceType) -> Vec<&PlannedRegistration> {
        self.registrations
            .iter()
            .filter(|r| r.component() == component)
            .collect()
    }

    /// Registrations to instantiate eagerly when the container starts.
    pub fn auto_activated(&self) -> impl Iterator<Item = &PlannedRegistration> {
        self.registrations.iter().filter(|r| r.auto_activate())
    }
}

/// Expands `table` into a plan. Never fails; problems land in the report.
pub(crate) fn plan(table: &DescriptorTable, observers: &Observers) -> RegistrationPlan {
    let mut report = PlanReport::default();
    let mut accepted: Vec<ResolvedDescriptor> = Vec::new();

    for entry in table.iter() {
        let declaration = entry.declaration();
        let component = entry.component();

        if entry.descriptors().is_empty() {
            if let Some(base) = declaration.base() {
                if !table.descriptors_of(base).is_empty() {
                    debug!(
                        component = component.name(),
                        base = base.name(),
                        "base type descriptors are not inherited"
                    );
                }
            }
            continue;
        }

        if !declaration.is_concrete() {
            debug!(component = component.name(), "descriptor on abstract type is inert");
            observers.inert(component);
            report.inert(component);
            continue;
        }

        let mut resolved = Vec::with_capacity(entry.descriptors().len());
        for descriptor in entry.descriptors() {
            match descriptor
                .resolve(component)
                .and_then(|r| check_lifecycle_hooks(declaration, r))
            {
                Ok(r) => resolved.push(r),
                Err(error) => {
                    warn!(component = component.name(), %error, "skipping descriptor");
                    observers.skipped(component, &error);
                    report.skip(error);
                }
            }
        }

        for conflict in detect_conflicts(component, &resolved) {
            warn!(
                component = component.name(),
                warning = %conflict,
                "descriptor conflict resolved by order index"
            );
            observers.conflict(&conflict);
            report.warn(conflict);
        }

        accepted.extend(resolved);
    }

    // Stable sort keeps scan order among equal order indices
    accepted.sort_by(|a, b| b.order_index().cmp(&a.order_index()));

    let registrations: Vec<PlannedRegistration> = accepted
        .into_iter()
        .enumerate()
        .map(|(sequence, descriptor)| PlannedRegistration {
            sequence,
            descriptor: Arc::new(descriptor),
        })
        .collect();

    for registration in &registrations {
        trace!(
            sequence = registration.sequence(),
            component = registration.component().name(),
            order_index = registration.order_index(),
            "planned registration"
        );
        observers.registered(registration);
    }

    RegistrationPlan { registrations, report }
}

fn check_lifecycle_hooks(
    declaration: &TypeDeclaration,
    resolved: ResolvedDescriptor,
) -> DescriptorResult<ResolvedDescriptor> {
    let hooks = resolved.lifecycle_hooks();
    for (hook, method) in [
        (LifecycleHook::Init, hooks.init_method),
        (LifecycleHook::Destroy, hooks.destroy_method),
    ] {
        if let Some(method) = method {
            if !declaration.declares_method(method) {
                return Err(DescriptorError::MissingLifecycleMethod {
                    component: declaration.service_type(),
                    hook,
                    method: method.to_string(),
                });
            }
        }
    }
    Ok(resolved)
}

/// Same `(service, key)` declared by several descriptors of one component
/// with differing order indices.
fn detect_conflicts(
    component: ServiceType,
    resolved: &[ResolvedDescriptor],
) -> Vec<DescriptorError> {
    // First-seen order keeps the report deterministic
    let mut seen: Vec<&ServiceBinding> = Vec::new();
    let mut groups: HashMap<&ServiceBinding, Vec<i32>> = HashMap::new();
    for descriptor in resolved {
        for binding in descriptor.effective_services() {
            let indices = groups.entry(binding).or_insert_with(|| {
                seen.push(binding);
                Vec::new()
            });
            indices.push(descriptor.order_index());
        }
    }

    seen.into_iter()
        .filter_map(|binding| {
            let mut indices = groups.remove(binding)?;
            if indices.iter().collect::<BTreeSet<_>>().len() < 2 {
                return None;
            }
            indices.sort_by(|a, b| b.cmp(a));
            Some(DescriptorError::ConflictingDescriptors {
                component,
                service: binding.service,
                key: binding.key.clone(),
                order_indices: indices,
            })
        })
        .collect()
}
