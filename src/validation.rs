//! Planning report: what was skipped, what was merely suspicious.

use crate::error::DescriptorError;
use crate::service::ServiceType;

/// Outcome of expanding a descriptor table into registrations.
///
/// Planning never aborts. A descriptor that fails validation is skipped and
/// listed in `skipped`; ordering conflicts are resolved deterministically and
/// listed in `warnings`; descriptors on abstract types are listed in `inert`.
///
/// # Examples
///
/// ```
/// use ferrous_component::{ComponentCollection, ComponentDescriptor, TypeDeclaration};
///
/// struct Shape;
/// struct Circle;
///
/// let mut components = ComponentCollection::new();
/// components
///     .declare(TypeDeclaration::abstract_type::<Shape>())
///     .add_component::<Shape>(ComponentDescriptor::new())
///     .add_component::<Circle>(ComponentDescriptor::new().with_keys(["a", "b"]));
///
/// let plan = components.build();
/// let report = plan.report();
/// assert_eq!(report.inert.len(), 1);
/// assert_eq!(report.skipped.len(), 1);
/// assert!(report.skipped[0].is_invalid_shape());
/// assert!(!report.is_clean());
/// ```
#[derive(Debug, Clone, Default)]
pub struct PlanReport {
    /// Descriptors left out of the plan, with the reason
    pub skipped: Vec<DescriptorError>,
    /// Conflicts resolved by the ordering rule
    pub warnings: Vec<DescriptorError>,
    /// Components whose descriptors were ignored because they are abstract
    pub inert: Vec<ServiceType>,
}

impl PlanReport {
    /// Returns `true` when nothing was skipped and no warnings were raised.
    ///
    /// Inert descriptors are defined behavior and do not count.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.warnings.is_empty()
    }

    /// Returns `true` if any descriptor was skipped.
    pub fn has_errors(&self) -> bool {
        !self.skipped.is_empty()
    }

    /// Skip and warning entries that belong to `component`.
    pub fn for_component<'a>(
        &'a self,
        component: ServiceType,
    ) -> impl Iterator<Item = &'a DescriptorError> + 'a {
        self.skipped
            .iter()
            .chain(self.warnings.iter())
            .filter(move |e| e.component() == Some(component))
    }

    pub(crate) fn skip(&mut self, error: DescriptorError) {
        self.skipped.push(error);
    }

    pub(crate) fn warn(&mut self, warning: DescriptorError) {
        self.warnings.push(warning);
    }

    pub(crate) fn inert(&mut self, component: ServiceType) {
        self.inert.push(component);
    }
}
