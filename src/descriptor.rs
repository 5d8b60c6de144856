//! Component descriptors: the registration intent attached to one type.
//!
//! A [`ComponentDescriptor`] tells a container how to register, scope,
//! construct, intercept, and tear down a component. It is plain data; nothing
//! is validated until the descriptor is [resolved](ComponentDescriptor::resolve)
//! against the type it is attached to.

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use crate::error::{DescriptorError, DescriptorResult, ShapeViolation};
use crate::lifetime::{ComponentScope, Ownership};
use crate::service::{normalize_key, ServiceBinding, ServiceType};

/// Which properties the container injects when property injection is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "snake_case"))]
pub enum InjectPropertyType {
    /// Only properties explicitly marked for injection
    #[default]
    Autowired,
    /// Every injectable property
    All,
}

/// Interception strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "snake_case"))]
pub enum InterceptorType {
    /// Proxy through the component's service interface
    #[default]
    Interface,
    /// Override the component's virtual methods
    Class,
}

/// Property injection policy of a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyInjection {
    /// Whether property injection runs at all
    pub enabled: bool,
    /// Which properties are injected when enabled
    pub mode: InjectPropertyType,
}

/// Interceptor applied to a component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interception {
    /// Interceptor type to resolve
    pub interceptor: ServiceType,
    /// How the interceptor is wired in
    pub strategy: InterceptorType,
    /// Discriminator among several registrations of the interceptor type
    pub key: Option<String>,
}

/// Method names invoked around a component's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LifecycleHooks<'a> {
    /// Called after construction
    pub init_method: Option<&'a str>,
    /// Called before disposal
    pub destroy_method: Option<&'a str>,
}

/// Registration intent for one component type.
///
/// Descriptors are built with one of four construction shapes and then
/// refined with `with_*` methods. All shapes produce the same value; they are
/// conveniences only.
///
/// | Shape | Constructor | Services | Key |
/// |---|---|---|---|
/// | 1 | [`new`](Self::new) | declaring type | none |
/// | 2 | [`for_service`](Self::for_service) | `service` | none |
/// | 3 | [`for_keyed_service`](Self::for_keyed_service) | `service` | `key` |
/// | 4 | [`keyed`](Self::keyed) | declaring type | `key` |
///
/// # Ordering compatibility
///
/// `order_index` is a registration priority: higher values register first.
/// Containers resolve the most recently registered candidate for a keyless
/// lookup, so among registrations of the same service the one with the
/// **smallest** `order_index` is what a keyless resolve returns. This
/// asymmetry is a compatibility contract with the container and is kept
/// exactly. See [`RegistrationPlan::resolve`](crate::RegistrationPlan::resolve).
///
/// # Examples
///
/// ```rust
/// use ferrous_component::{service_of, ComponentDescriptor, ComponentScope, ServiceBinding};
///
/// trait Notifier {}
/// struct EmailNotifier;
///
/// let descriptor = ComponentDescriptor::for_keyed_service(service_of::<dyn Notifier>(), "email")
///     .with_scope(ComponentScope::SingleInstance)
///     .with_order_index(10)
///     .with_init_method("connect");
///
/// let resolved = descriptor.resolve(service_of::<EmailNotifier>()).unwrap();
/// assert_eq!(
///     resolved.effective_services(),
///     &[ServiceBinding::new(service_of::<dyn Notifier>(), Some("email"))]
/// );
/// assert_eq!(resolved.lifecycle_hooks().init_method, Some("connect"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentDescriptor {
    services: Option<Vec<ServiceType>>,
    service: Option<ServiceType>,
    key: Option<String>,
    keys: Option<Vec<String>>,
    order_index: i32,
    auto_activate: bool,
    inject_properties: bool,
    inject_property_type: InjectPropertyType,
    scope: ComponentScope,
    ownership: Ownership,
    interceptor: Option<ServiceType>,
    interceptor_type: InterceptorType,
    interceptor_key: Option<String>,
    init_method: Option<String>,
    destroy_method: Option<String>,
}

impl Default for ComponentDescriptor {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentDescriptor {
    // ----- Construction shapes -----

    /// Shape 1: registers the declaring type as itself, without a key.
    pub fn new() -> Self {
        Self {
            services: None,
            service: None,
            key: None,
            keys: None,
            order_index: 0,
            auto_activate: false,
            inject_properties: true,
            inject_property_type: InjectPropertyType::Autowired,
            scope: ComponentScope::Default,
            ownership: Ownership::Owned,
            interceptor: None,
            interceptor_type: InterceptorType::Interface,
            interceptor_key: None,
            init_method: None,
            destroy_method: None,
        }
    }

    /// Shape 2: registers under a single service type.
    pub fn for_service(service: ServiceType) -> Self {
        Self::new().with_service(service)
    }

    /// Shape 3: registers under a single service type with a key.
    pub fn for_keyed_service(service: ServiceType, key: impl Into<String>) -> Self {
        Self::for_service(service).with_key(key)
    }

    /// Shape 4: registers the declaring type with a key.
    pub fn keyed(key: impl Into<String>) -> Self {
        Self::new().with_key(key)
    }

    // ----- Field setters -----

    /// Sets the single convenience service type.
    pub fn with_service(mut self, service: ServiceType) -> Self {
        self.service = Some(service);
        self
    }

    /// Sets the key for the single service.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Sets the service types this component satisfies.
    pub fn with_services(mut self, services: impl IntoIterator<Item = ServiceType>) -> Self {
        self.services = Some(services.into_iter().collect());
        self
    }

    /// Sets per-service keys, positionally aligned with the effective services.
    pub fn with_keys<K: Into<String>>(mut self, keys: impl IntoIterator<Item = K>) -> Self {
        self.keys = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the registration priority. Higher registers first.
    pub fn with_order_index(mut self, order_index: i32) -> Self {
        self.order_index = order_index;
        self
    }

    /// Requests eager creation when the container starts.
    pub fn with_auto_activate(mut self, auto_activate: bool) -> Self {
        self.auto_activate = auto_activate;
        self
    }

    /// Enables or disables property injection.
    pub fn with_inject_properties(mut self, inject_properties: bool) -> Self {
        self.inject_properties = inject_properties;
        self
    }

    /// Selects which properties are injected.
    pub fn with_inject_property_type(mut self, mode: InjectPropertyType) -> Self {
        self.inject_property_type = mode;
        self
    }

    /// Sets the lifetime scope.
    pub fn with_scope(mut self, scope: ComponentScope) -> Self {
        self.scope = scope;
        self
    }

    /// Sets who disposes instances.
    pub fn with_ownership(mut self, ownership: Ownership) -> Self {
        self.ownership = ownership;
        self
    }

    /// Sets the interceptor type.
    pub fn with_interceptor(mut self, interceptor: ServiceType) -> Self {
        self.interceptor = Some(interceptor);
        self
    }

    /// Sets the interception strategy.
    pub fn with_interceptor_type(mut self, strategy: InterceptorType) -> Self {
        self.interceptor_type = strategy;
        self
    }

    /// Sets the interceptor discriminator key.
    pub fn with_interceptor_key(mut self, key: impl Into<String>) -> Self {
        self.interceptor_key = Some(key.into());
        self
    }

    /// Names the method called after construction.
    pub fn with_init_method(mut self, method: impl Into<String>) -> Self {
        self.init_method = Some(method.into());
        self
    }

    /// Names the method called before disposal.
    pub fn with_destroy_method(mut self, method: impl Into<String>) -> Self {
        self.destroy_method = Some(method.into());
        self
    }

    // ----- Raw field access -----

    /// Declared service list, if any.
    pub fn services(&self) -> Option<&[ServiceType]> {
        self.services.as_deref()
    }

    /// Declared single service, if any.
    pub fn service(&self) -> Option<ServiceType> {
        self.service
    }

    /// Declared single key, as written.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Declared per-service keys, as written.
    pub fn keys(&self) -> Option<&[String]> {
        self.keys.as_deref()
    }

    // ----- Container-facing accessors -----

    /// Registration priority.
    pub fn order_index(&self) -> i32 {
        self.order_index
    }

    /// Lifetime scope.
    pub fn scope(&self) -> ComponentScope {
        self.scope
    }

    /// Whether the instance is created eagerly at container start.
    pub fn auto_activate(&self) -> bool {
        self.auto_activate
    }

    /// Property injection switch and mode.
    pub fn property_injection_policy(&self) -> PropertyInjection {
        PropertyInjection {
            enabled: self.inject_properties,
            mode: self.inject_property_type,
        }
    }

    /// Who disposes instances.
    pub fn ownership(&self) -> Ownership {
        self.ownership
    }

    /// Interceptor configuration. `None` unless an interceptor type is set.
    pub fn interception(&self) -> Option<Interception> {
        self.interceptor.map(|interceptor| Interception {
            interceptor,
            strategy: self.interceptor_type,
            key: normalize_key(self.interceptor_key.as_deref()),
        })
    }

    /// Init and destroy method names.
    pub fn lifecycle_hooks(&self) -> LifecycleHooks<'_> {
        LifecycleHooks {
            init_method: self.init_method.as_deref().filter(|m| !m.is_empty()),
            destroy_method: self.destroy_method.as_deref().filter(|m| !m.is_empty()),
        }
    }

    // ----- Resolution -----

    /// Resolves the descriptor against the type it is attached to.
    ///
    /// `service` is merged into `services`; if neither is set the declaring
    /// type is the sole service. `key`/`keys` are then aligned to produce one
    /// [`ServiceBinding`] per service.
    ///
    /// # Errors
    ///
    /// - [`DescriptorError::InvalidDescriptorShape`] when `keys` does not match
    ///   the service count, when `key` is used with several services, or when
    ///   `key` and `keys` are both set.
    /// - [`DescriptorError::ConflictingDescriptors`] when `keys` produces the
    ///   same `(service, key)` pair twice.
    pub fn resolve(&self, component: ServiceType) -> DescriptorResult<ResolvedDescriptor> {
        let key = normalize_key(self.key.as_deref());
        let keys = self.keys.as_deref().filter(|keys| !keys.is_empty());

        if key.is_some() && keys.is_some() {
            return Err(DescriptorError::InvalidDescriptorShape {
                component,
                violation: ShapeViolation::KeyAndKeysCombined,
            });
        }

        let mut services: Vec<ServiceType> = self.services.clone().unwrap_or_default();
        if let Some(service) = self.service {
            if !services.contains(&service) {
                services.push(service);
            }
        }
        if services.is_empty() {
            services.push(component);
        }

        let bindings = match keys {
            Some(keys) => {
                if keys.len() != services.len() {
                    return Err(DescriptorError::InvalidDescriptorShape {
                        component,
                        violation: ShapeViolation::KeysArityMismatch {
                            keys: keys.len(),
                            services: services.len(),
                        },
                    });
                }
                let bindings: Vec<ServiceBinding> = services
                    .iter()
                    .zip(keys)
                    .map(|(service, key)| ServiceBinding::new(*service, Some(key.as_str())))
                    .collect();
                self.reject_duplicate_bindings(component, &bindings)?;
                bindings
            }
            None => {
                let mut unique: Vec<ServiceType> = Vec::with_capacity(services.len());
                for service in services {
                    if !unique.contains(&service) {
                        unique.push(service);
                    }
                }
                if key.is_some() && unique.len() > 1 {
                    return Err(DescriptorError::InvalidDescriptorShape {
                        component,
                        violation: ShapeViolation::KeyWithMultipleServices {
                            services: unique.len(),
                        },
                    });
                }
                unique
                    .into_iter()
                    .map(|service| ServiceBinding {
                        service,
                        key: key.clone(),
                    })
                    .collect()
            }
        };

        Ok(ResolvedDescriptor {
            component,
            bindings,
            descriptor: self.clone(),
        })
    }

    fn reject_duplicate_bindings(
        &self,
        component: ServiceType,
        bindings: &[ServiceBinding],
    ) -> DescriptorResult<()> {
        for (index, binding) in bindings.iter().enumerate() {
            let repeats = bindings[index..].iter().filter(|b| *b == binding).count();
            if repeats > 1 {
                return Err(DescriptorError::ConflictingDescriptors {
                    component,
                    service: binding.service,
                    key: binding.key.clone(),
                    order_indices: vec![self.order_index; repeats],
                });
            }
        }
        Ok(())
    }
}

/// A descriptor whose services and keys have been resolved for its type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDescriptor {
    component: ServiceType,
    bindings: Vec<ServiceBinding>,
    descriptor: ComponentDescriptor,
}

impl ResolvedDescriptor {
    /// The declaring component type.
    pub fn component(&self) -> ServiceType {
        self.component
    }

    /// Resolved `(service, key)` pairs. Never empty.
    pub fn effective_services(&self) -> &[ServiceBinding] {
        &self.bindings
    }

    /// The descriptor this was resolved from.
    pub fn descriptor(&self) -> &ComponentDescriptor {
        &self.descriptor
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

    /// Registration precedence; higher registers first.
    pub fn order_index(&self) -> i32 {
        self.descriptor.order_index()
    }
}
