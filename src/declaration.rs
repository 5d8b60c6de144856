//! Type declarations: what the planner knows about a component type.

use crate::service::ServiceType;

/// Whether a declared type can be instantiated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeclarationKind {
    /// Instantiable; descriptors on it produce registrations
    #[default]
    Concrete,
    /// Not instantiable; descriptors on it are inert
    Abstract,
}

/// Facts about a component type that descriptors cannot carry themselves.
///
/// The base type is recorded for diagnostics only. Descriptors are never
/// looked up through it: a type without its own descriptor registers nothing,
/// whatever its base carries.
///
/// # Examples
///
/// ```rust
/// use ferrous_component::{service_of, TypeDeclaration};
///
/// struct Repository;
/// struct CachedRepository;
///
/// let decl = TypeDeclaration::concrete::<CachedRepository>()
///     .with_base(service_of::<Repository>())
///     .with_methods(["warm_up", "flush"]);
///
/// assert!(decl.is_concrete());
/// assert!(decl.declares_method("flush"));
/// assert!(!decl.declares_method("close"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDeclaration {
    ty: ServiceType,
    kind: DeclarationKind,
    base: Option<ServiceType>,
    methods: Vec<String>,
}

impl TypeDeclaration {
    /// Declares `ty` with the given kind.
    pub fn new(ty: ServiceType, kind: DeclarationKind) -> Self {
        Self {
            ty,
            kind,
            base: None,
            methods: Vec::new(),
        }
    }

    /// Declares `T` as a concrete type.
    pub fn concrete<T: ?Sized + 'static>() -> Self {
        Self::new(ServiceType::of::<T>(), DeclarationKind::Concrete)
    }

    /// Declares `T` as an abstract type.
    pub fn abstract_type<T: ?Sized + 'static>() -> Self {
        Self::new(ServiceType::of::<T>(), DeclarationKind::Abstract)
    }

    /// Records the base type.
    pub fn with_base(mut self, base: ServiceType) -> Self {
        self.base = Some(base);
        self
    }

    /// Adds a declared method name.
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.methods.push(method.into());
        self
    }

    /// Adds several declared method names.
    pub fn with_methods<M: Into<String>>(mut self, methods: impl IntoIterator<Item = M>) -> Self {
        self.methods.extend(methods.into_iter().map(Into::into));
        self
    }

    pub fn service_type(&self) -> ServiceType {
        self.ty
    }

    pub fn kind(&self) -> DeclarationKind {
        self.kind
    }

    pub fn base(&self) -> Option<ServiceType> {
        self.base
    }

    pub fn methods(&self) -> &[String] {
        &self.methods
    }

    pub fn is_concrete(&self) -> bool {
        self.kind == DeclarationKind::Concrete
    }

    pub fn declares_method(&self, name: &str) -> bool {
        self.methods.iter().any(|m| m == name)
    }
}
