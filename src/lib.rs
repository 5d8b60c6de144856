//! # ferrous-component
//!
//! Declarative component-registration descriptors for dependency injection
//! containers.
//!
//! A [`ComponentDescriptor`] carries everything a container needs to register
//! a type: which services it satisfies and under which keys, its lifetime
//! scope, ownership, property injection policy, interceptor, lifecycle hooks,
//! and registration priority. Descriptors are pure data. They are attached to
//! types through an explicit [`ComponentCollection`] and validated only when
//! the collection is [built](ComponentCollection::build) into a
//! [`RegistrationPlan`].
//!
//! ## Features
//!
//! - **Four construction shapes**: plain, service, keyed service, key only
//! - **Deterministic ordering**: higher `order_index` registers first
//! - **Skip and report**: malformed descriptors never abort a build
//! - **No inheritance**: descriptors belong to exactly one type
//! - **Thread-safe**: descriptors and plans are `Send + Sync`
//!
//! ## Quick Start
//!
//! ```rust
//! use ferrous_component::{
//!     service_of, ComponentCollection, ComponentDescriptor, ComponentScope, Ownership,
//! };
//!
//! trait PaymentGateway {}
//! struct StripeGateway;
//! struct SandboxGateway;
//!
//! let gateway = service_of::<dyn PaymentGateway>();
//!
//! let mut components = ComponentCollection::new();
//! components
//!     .add_component::<StripeGateway>(
//!         ComponentDescriptor::for_service(gateway)
//!             .with_scope(ComponentScope::SingleInstance)
//!             .with_order_index(10),
//!     )
//!     .add_component::<SandboxGateway>(
//!         ComponentDescriptor::for_keyed_service(gateway, "sandbox")
//!             .with_ownership(Ownership::External),
//!     );
//!
//! let plan = components.build();
//! assert!(plan.report().is_clean());
//! assert_eq!(plan.resolve(gateway).unwrap().component(), service_of::<StripeGateway>());
//! assert_eq!(
//!     plan.resolve_keyed(gateway, "sandbox").unwrap().component(),
//!     service_of::<SandboxGateway>()
//! );
//! ```
//!
//! ## Ordering
//!
//! Registrations are ordered by `order_index` descending, ties kept in scan
//! order. Containers resolve the most recent registration for a keyless
//! lookup, so the candidate with the **smallest** `order_index` is the one a
//! keyless resolve returns. This mirrors the container's convention and is a
//! compatibility contract, not an accident:
//!
//! ```rust
//! use ferrous_component::{service_of, ComponentCollection, ComponentDescriptor};
//!
//! trait Foo {}
//! struct High;
//! struct Mid;
//! struct Low;
//!
//! let foo = service_of::<dyn Foo>();
//! let mut components = ComponentCollection::new();
//! components
//!     .add_component::<Mid>(ComponentDescriptor::for_service(foo).with_order_index(5))
//!     .add_component::<Low>(ComponentDescriptor::for_service(foo).with_order_index(1))
//!     .add_component::<High>(ComponentDescriptor::for_service(foo).with_order_index(10));
//!
//! let plan = components.build();
//! assert_eq!(plan.resolve(foo).unwrap().component(), service_of::<Low>());
//! ```

// Module declarations
pub mod collection;
pub mod declaration;
pub mod descriptor;
pub mod error;
pub mod lifetime;
pub mod observer;
pub mod plan;
pub mod registry;
pub mod service;
pub mod shared;
pub mod validation;

#[cfg(feature = "config")]
pub mod config;

// Re-export core types
pub use collection::{ComponentCollection, ComponentCollectionModuleExt, ComponentModule};
pub use declaration::{DeclarationKind, TypeDeclaration};
pub use descriptor::{
    ComponentDescriptor, InjectPropertyType, Interception, InterceptorType, LifecycleHooks,
    PropertyInjection, ResolvedDescriptor,
};
pub use error::{DescriptorError, DescriptorResult, LifecycleHook, ShapeViolation};
pub use lifetime::{ComponentScope, Ownership};
pub use observer::{LoggingObserver, PlanObserver};
pub use plan::{PlannedRegistration, RegistrationPlan};
pub use registry::{DescriptorTable, TableEntry};
pub use service::{service_of, ServiceBinding, ServiceType};
pub use shared::SharedComponentCollection;
pub use validation::PlanReport;

#[cfg(feature = "config")]
pub use config::{ComponentEntry, ComponentManifest, DescriptorEntry, TypeCatalog};
