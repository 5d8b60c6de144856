//! Component module system for modular registration.
//!
//! This module provides traits for organizing descriptor declarations into
//! reusable modules, one per crate or feature area.

use crate::{ComponentCollection, DescriptorResult};

/// A module that attaches descriptors to a ComponentCollection.
///
/// # Example
///
/// ```rust
/// use ferrous_component::{
///     service_of, ComponentCollection, ComponentCollectionModuleExt, ComponentDescriptor,
///     ComponentModule, DescriptorResult,
/// };
///
/// trait Mailer {}
/// struct SmtpMailer;
///
/// struct MailModule;
///
/// impl ComponentModule for MailModule {
///     fn register_components(self, components: &mut ComponentCollection) -> DescriptorResult<()> {
///         components.add_component::<SmtpMailer>(
///             ComponentDescriptor::for_service(service_of::<dyn Mailer>()),
///         );
///         Ok(())
///     }
/// }
///
/// # fn main() -> DescriptorResult<()> {
/// let mut components = ComponentCollection::new();
/// let plan = components.add_module(MailModule)?.build();
/// assert_eq!(plan.len(), 1);
/// # Ok(())
/// # }
/// ```
pub trait ComponentModule {
    /// Attach this module's descriptors to the collection.
    fn register_components(self, components: &mut ComponentCollection) -> DescriptorResult<()>;
}

/// Extension trait for ComponentCollection that provides module registration.
pub trait ComponentCollectionModuleExt {
    /// Add a module to the component collection.
    fn add_module<M: ComponentModule>(&mut self, module: M) -> DescriptorResult<&mut Self>;
}

impl ComponentCollectionModuleExt for ComponentCollection {
    fn add_module<M: ComponentModule>(&mut self, module: M) -> DescriptorResult<&mut Self> {
        module.register_components(self)?;
        Ok(self)
    }
}
