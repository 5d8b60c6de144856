//! Manifest-driven descriptor tables.
//!
//! A [`ComponentManifest`] declares components and their descriptors in JSON
//! or YAML. Type names in the manifest are bound to Rust types through a
//! [`TypeCatalog`], since type identities cannot be deserialized directly.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::collection::ComponentCollection;
use crate::declaration::{DeclarationKind, TypeDeclaration};
use crate::descriptor::{ComponentDescriptor, InjectPropertyType, InterceptorType};
use crate::error::{DescriptorError, DescriptorResult};
use crate::lifetime::{ComponentScope, Ownership};
use crate::service::ServiceType;

/// Names under which manifest entries may refer to Rust types.
///
/// # Examples
///
/// ```
/// use ferrous_component::{service_of, TypeCatalog};
///
/// struct Ledger;
///
/// let mut catalog = TypeCatalog::new();
/// catalog.register_as::<Ledger>("Ledger");
/// assert_eq!(catalog.lookup("Ledger").unwrap(), service_of::<Ledger>());
/// assert!(catalog.lookup("Journal").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct TypeCatalog {
    types: HashMap<String, ServiceType>,
}

impl TypeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `T` under its `std::any::type_name`.
    pub fn register<T: ?Sized + 'static>(&mut self) -> &mut Self {
        let ty = ServiceType::of::<T>();
        self.types.insert(ty.name().to_string(), ty);
        self
    }

    /// Registers `T` under an alias. The alias may shadow an earlier entry.
    pub fn register_as<T: ?Sized + 'static>(&mut self, alias: impl Into<String>) -> &mut Self {
        self.types.insert(alias.into(), ServiceType::of::<T>());
        self
    }

    pub fn lookup(&self, name: &str) -> DescriptorResult<ServiceType> {
        self.types
            .get(name)
            .copied()
            .ok_or_else(|| DescriptorError::UnknownType { name: name.to_string() })
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Top-level manifest document.
///
/// # Examples
///
/// ```
/// use ferrous_component::{service_of, ComponentCollection, ComponentManifest, TypeCatalog};
///
/// trait Sink {}
/// struct FileSink;
///
/// let manifest = ComponentManifest::from_yaml(r#"
/// components:
///   - type: FileSink
///     methods: [open]
///     descriptors:
///       - service: Sink
///         key: file
///         scope: single_instance
///         init_method: open
/// "#).unwrap();
///
/// let mut catalog = TypeCatalog::new();
/// catalog.register_as::<FileSink>("FileSink").register_as::<dyn Sink>("Sink");
///
/// let mut components = ComponentCollection::new();
/// manifest.apply(&catalog, &mut components).unwrap();
///
/// let plan = components.build();
/// assert!(plan.resolve_keyed(service_of::<dyn Sink>(), "file").is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComponentManifest {
    #[serde(default)]
    pub components: Vec<ComponentEntry>,
}

/// One component type in a manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComponentEntry {
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<String>,
    #[serde(default)]
    pub descriptors: Vec<DescriptorEntry>,
}

fn default_true() -> bool {
    true
}

/// Serialized form of a [`ComponentDescriptor`]. Every field is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DescriptorEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub services: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keys: Option<Vec<String>>,
    #[serde(default)]
    pub order_index: i32,
    #[serde(default)]
    pub auto_activate: bool,
    #[serde(default = "default_true")]
    pub inject_properties: bool,
    #[serde(default)]
    pub inject_property_type: InjectPropertyType,
    #[serde(default)]
    pub scope: ComponentScope,
    #[serde(default)]
    pub ownership: Ownership,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interceptor: Option<String>,
    #[serde(default)]
    pub interceptor_type: InterceptorType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interceptor_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub init_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destroy_method: Option<String>,
}

impl Default for DescriptorEntry {
    fn default() -> Self {
        Self {
            services: None,
            service: None,
            key: None,
            keys: None,
            order_index: 0,
            auto_activate: false,
            inject_properties: true,
            inject_property_type: InjectPropertyType::default(),
            scope: ComponentScope::default(),
            ownership: Ownership::default(),
            interceptor: None,
            interceptor_type: InterceptorType::default(),
            interceptor_key: None,
            init_method: None,
            destroy_method: None,
        }
    }
}

impl DescriptorEntry {
    /// Binds type names through `catalog` and builds the descriptor.
    pub fn to_descriptor(&self, catalog: &TypeCatalog) -> DescriptorResult<ComponentDescriptor> {
        let mut descriptor = ComponentDescriptor::new()
            .with_order_index(self.order_index)
            .with_auto_activate(self.auto_activate)
            .with_inject_properties(self.inject_properties)
            .with_inject_property_type(self.inject_property_type)
            .with_scope(self.scope)
            .with_ownership(self.ownership)
            .with_interceptor_type(self.interceptor_type);

        if let Some(services) = &self.services {
            let services = services
                .iter()
                .map(|name| catalog.lookup(name))
                .collect::<DescriptorResult<Vec<_>>>()?;
            descriptor = descriptor.with_services(services);
        }
        if let Some(service) = &self.service {
            descriptor = descriptor.with_service(catalog.lookup(service)?);
        }
        if let Some(key) = &self.key {
            descriptor = descriptor.with_key(key.as_str());
        }
        if let Some(keys) = &self.keys {
            descriptor = descriptor.with_keys(keys.iter().cloned());
        }
        if let Some(interceptor) = &self.interceptor {
            descriptor = descriptor.with_interceptor(catalog.lookup(interceptor)?);
        }
        if let Some(key) = &self.interceptor_key {
            descriptor = descriptor.with_interceptor_key(key.as_str());
        }
        if let Some(method) = &self.init_method {
            descriptor = descriptor.with_init_method(method.as_str());
        }
        if let Some(method) = &self.destroy_method {
            descriptor = descriptor.with_destroy_method(method.as_str());
        }
        Ok(descriptor)
    }
}

impl ComponentManifest {
    pub fn from_json(source: &str) -> DescriptorResult<Self> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn from_yaml(source: &str) -> DescriptorResult<Self> {
        Ok(serde_yaml::from_str(source)?)
    }

    pub fn to_json(&self) -> DescriptorResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Declares every entry and attaches its descriptors to `collection`.
    ///
    /// All type names are bound before anything is added, so an unknown name
    /// leaves the collection untouched.
    pub fn apply(
        &self,
        catalog: &TypeCatalog,
        collection: &mut ComponentCollection,
    ) -> DescriptorResult<()> {
        let mut staged = Vec::with_capacity(self.components.len());
        for entry in &self.components {
            let ty = catalog.lookup(&entry.type_name)?;
            let kind = if entry.is_abstract {
                DeclarationKind::Abstract
            } else {
                DeclarationKind::Concrete
            };
            let mut declaration =
                TypeDeclaration::new(ty, kind).with_methods(entry.methods.iter().cloned());
            if let Some(base) = &entry.base {
                declaration = declaration.with_base(catalog.lookup(base)?);
            }
            let descriptors = entry
                .descriptors
                .iter()
                .map(|d| d.to_descriptor(catalog))
                .collect::<DescriptorResult<Vec<_>>>()?;
            staged.push((declaration, descriptors));
        }

        for (declaration, descriptors) in staged {
            let ty = declaration.service_type();
            collection.declare(declaration);
            for descriptor in descriptors {
                collection.add_descriptor(ty, descriptor);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::service_of;

    struct Archive;
    trait Storage {}

    fn catalog() -> TypeCatalog {
        let mut catalog = TypeCatalog::new();
        catalog
            .register_as::<Archive>("Archive")
            .register_as::<dyn Storage>("Storage");
        catalog
    }

    #[test]
    fn json_defaults_match_descriptor_defaults() {
        let manifest = ComponentManifest::from_json(
            r#"{ "components": [ { "type": "Archive", "descriptors": [ {} ] } ] }"#,
        )
        .unwrap();
        let descriptor = manifest.components[0].descriptors[0].to_descriptor(&catalog()).unwrap();
        assert_eq!(descriptor, ComponentDescriptor::new());
    }

    #[test]
    fn unknown_field_is_rejected() {
        let err = ComponentManifest::from_json(r#"{ "components": [], "extra": 1 }"#).unwrap_err();
        assert!(matches!(err, DescriptorError::Manifest(_)));
    }

    #[test]
    fn unknown_type_leaves_collection_untouched() {
        let manifest = ComponentManifest::from_yaml(
            r#"
components:
  - type: Archive
    descriptors:
      - service: Storage
  - type: Missing
"#,
        )
        .unwrap();
        let mut components = ComponentCollection::new();
        let err = manifest.apply(&catalog(), &mut components).unwrap_err();
        assert!(matches!(err, DescriptorError::UnknownType { ref name } if name == "Missing"));
        assert!(components.is_empty());
    }

    #[test]
    fn enums_use_snake_case() {
        let manifest = ComponentManifest::from_yaml(
            r#"
components:
  - type: Archive
    abstract: true
    descriptors:
      - scope: instance_per_lifetime_scope
        ownership: external
        inject_property_type: all
        interceptor_type: class
"#,
        )
        .unwrap();
        let entry = &manifest.components[0];
        assert!(entry.is_abstract);
        let descriptor = entry.descriptors[0].to_descriptor(&catalog()).unwrap();
        assert_eq!(descriptor.scope(), ComponentScope::InstancePerLifetimeScope);
        assert_eq!(descriptor.ownership(), Ownership::External);
        assert_eq!(descriptor.property_injection_policy().mode, InjectPropertyType::All);

        let mut components = ComponentCollection::new();
        manifest.apply(&catalog(), &mut components).unwrap();
        let plan = components.build();
        assert!(plan.is_empty());
        assert_eq!(plan.report().inert, vec![service_of::<Archive>()]);
    }

    #[test]
    fn json_round_trip_preserves_entries() {
        let manifest = ComponentManifest {
            components: vec![ComponentEntry {
                type_name: "Archive".to_string(),
                is_abstract: false,
                base: None,
                methods: vec!["open".to_string()],
                descriptors: vec![DescriptorEntry {
                    keys: Some(vec!["primary".to_string()]),
                    order_index: 3,
                    init_method: Some("open".to_string()),
                    ..DescriptorEntry::default()
                }],
            }],
        };
        let json = manifest.to_json().unwrap();
        assert_eq!(ComponentManifest::from_json(&json).unwrap(), manifest);
    }
}
