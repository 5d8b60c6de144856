//! Descriptor table: the explicit mapping from component type to descriptors.

use std::any::TypeId;
use std::collections::HashMap;

use crate::declaration::{DeclarationKind, TypeDeclaration};
use crate::descriptor::ComponentDescriptor;
use crate::service::ServiceType;

#[cfg(feature = "ahash")]
type TypeIndex = HashMap<TypeId, usize, ahash::RandomState>;
#[cfg(not(feature = "ahash"))]
type TypeIndex = HashMap<TypeId, usize>;

/// One component type with its declaration and attached descriptors.
#[derive(Debug, Clone)]
pub struct TableEntry {
    declaration: TypeDeclaration,
    descriptors: Vec<ComponentDescriptor>,
    // false while the declaration is the placeholder created by `attach`
    declared: bool,
}

impl TableEntry {
    pub fn declaration(&self) -> &TypeDeclaration {
        &self.declaration
    }

    /// Descriptors in attachment order.
    pub fn descriptors(&self) -> &[ComponentDescriptor] {
        &self.descriptors
    }

    pub fn component(&self) -> ServiceType {
        self.declaration.service_type()
    }

    /// Returns `true` if the declaration came from an explicit `declare`.
    pub fn is_declared(&self) -> bool {
        self.declared
    }
}

/// Table of component types and the descriptors attached to each.
///
/// Entries keep the order in which their types were first seen, which is the
/// scan order the planner uses to break `order_index` ties. Lookups match the
/// exact type only.
#[derive(Debug, Clone, Default)]
pub struct DescriptorTable {
    entries: Vec<TableEntry>,
    index: TypeIndex,
}

impl DescriptorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the declaration for a type, keeping its descriptors.
    pub fn declare(&mut self, declaration: TypeDeclaration) {
        let ty = declaration.service_type();
        match self.index.get(&ty.type_id()) {
            Some(&pos) => {
                let entry = &mut self.entries[pos];
                entry.declaration = declaration;
                entry.declared = true;
            }
            None => self.push(TableEntry {
                declaration,
                descriptors: Vec::new(),
                declared: true,
            }),
        }
    }

    /// Attaches a descriptor to a type.
    ///
    /// Types not declared yet are assumed concrete with no declared methods.
    pub fn attach(&mut self, component: ServiceType, descriptor: ComponentDescriptor) {
        match self.index.get(&component.type_id()) {
            Some(&pos) => self.entries[pos].descriptors.push(descriptor),
            None => self.push(TableEntry {
                declaration: TypeDeclaration::new(component, DeclarationKind::Concrete),
                descriptors: vec![descriptor],
                declared: false,
            }),
        }
    }

    fn push(&mut self, entry: TableEntry) {
        self.index.insert(entry.component().type_id(), self.entries.len());
        self.entries.push(entry);
    }

    pub fn get(&self, component: ServiceType) -> Option<&TableEntry> {
        self.index
            .get(&component.type_id())
            .map(|&pos| &self.entries[pos])
    }

    /// Descriptors attached to exactly this type.
    pub fn descriptors_of(&self, component: ServiceType) -> &[ComponentDescriptor] {
        self.get(component)
            .map(TableEntry::descriptors)
            .unwrap_or(&[])
    }

    /// Entries in scan order.
    pub fn iter(&self) -> impl Iterator<Item = &TableEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Moves every entry of `other` into this table, in `other`'s order.
    ///
    /// Descriptors are appended after the existing ones. An explicit
    /// declaration in `other` replaces ours; a placeholder never does.
    pub fn merge(&mut self, other: DescriptorTable) {
        for entry in other.entries {
            let ty = entry.component();
            match self.index.get(&ty.type_id()) {
                Some(&pos) => {
                    let existing = &mut self.entries[pos];
                    if entry.declared {
                        existing.declaration = entry.declaration;
                        existing.declared = true;
                    }
                    existing.descriptors.extend(entry.descriptors);
                }
                None => self.push(entry),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::service_of;

    struct Base;
    struct Derived;

    #[test]
    fn attach_auto_declares_concrete() {
        let mut table = DescriptorTable::new();
        table.attach(service_of::<Derived>(), ComponentDescriptor::new());
        let entry = table.get(service_of::<Derived>()).unwrap();
        assert!(entry.declaration().is_concrete());
        assert_eq!(entry.descriptors().len(), 1);
    }

    #[test]
    fn declare_after_attach_keeps_descriptors() {
        let mut table = DescriptorTable::new();
        table.attach(service_of::<Base>(), ComponentDescriptor::new());
        table.declare(TypeDeclaration::abstract_type::<Base>());
        let entry = table.get(service_of::<Base>()).unwrap();
        assert!(!entry.declaration().is_concrete());
        assert_eq!(entry.descriptors().len(), 1);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn lookup_is_exact_type_only() {
        let mut table = DescriptorTable::new();
        table.attach(service_of::<Base>(), ComponentDescriptor::new());
        table.declare(TypeDeclaration::concrete::<Derived>().with_base(service_of::<Base>()));
        assert!(table.descriptors_of(service_of::<Derived>()).is_empty());
        assert_eq!(table.descriptors_of(service_of::<Base>()).len(), 1);
    }

    #[test]
    fn merge_preserves_scan_order() {
        let mut left = DescriptorTable::new();
        left.attach(service_of::<Base>(), ComponentDescriptor::new());
        let mut right = DescriptorTable::new();
        right.attach(service_of::<Derived>(), ComponentDescriptor::new());
        right.attach(service_of::<Base>(), ComponentDescriptor::keyed("second"));
        left.merge(right);

        let order: Vec<_> = left.iter().map(TableEntry::component).collect();
        assert_eq!(order, vec![service_of::<Base>(), service_of::<Derived>()]);
        assert_eq!(left.descriptors_of(service_of::<Base>()).len(), 2);
    }

    #[test]
    fn merge_keeps_declaration_over_placeholder() {
        let mut left = DescriptorTable::new();
        left.declare(TypeDeclaration::abstract_type::<Base>().with_method("open"));
        let mut right = DescriptorTable::new();
        right.attach(service_of::<Base>(), ComponentDescriptor::new());
        left.merge(right);

        let entry = left.get(service_of::<Base>()).unwrap();
        assert!(entry.is_declared());
        assert!(!entry.declaration().is_concrete());
        assert!(entry.declaration().declares_method("open"));
        assert_eq!(entry.descriptors().len(), 1);
    }

    #[test]
    fn merge_takes_explicit_declaration() {
        let mut left = DescriptorTable::new();
        left.attach(service_of::<Base>(), ComponentDescriptor::new());
        assert!(!left.get(service_of::<Base>()).unwrap().is_declared());

        let mut right = DescriptorTable::new();
        right.declare(TypeDeclaration::abstract_type::<Base>());
        left.merge(right);

        let entry = left.get(service_of::<Base>()).unwrap();
        assert!(entry.is_declared());
        assert!(!entry.declaration().is_concrete());
        assert_eq!(entry.descriptors().len(), 1);
    }
}
