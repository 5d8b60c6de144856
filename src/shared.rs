//! Lock-guarded component collection for parallel scanners.
//!
//! Descriptors themselves need no synchronization: they are never mutated
//! after attachment. What does need it is the shared table several scanning
//! threads merge into, which is what this wrapper provides.

use std::sync::Arc;

#[cfg(feature = "parking-lot")]
use parking_lot::RwLock;
#[cfg(not(feature = "parking-lot"))]
use std::sync::RwLock;

use crate::collection::ComponentCollection;
use crate::descriptor::ComponentDescriptor;
use crate::declaration::TypeDeclaration;
use crate::plan::RegistrationPlan;
use crate::service::ServiceType;

#[cfg(feature = "parking-lot")]
macro_rules! read_lock {
    ($lock:expr) => {
        $lock.read()
    };
}
#[cfg(not(feature = "parking-lot"))]
macro_rules! read_lock {
    ($lock:expr) => {
        $lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    };
}

#[cfg(feature = "parking-lot")]
macro_rules! write_lock {
    ($lock:expr) => {
        $lock.write()
    };
}
#[cfg(not(feature = "parking-lot"))]
macro_rules! write_lock {
    ($lock:expr) => {
        $lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    };
}

/// Cloneable handle to a collection shared between threads.
///
/// Scan order across threads follows lock acquisition order. Scanners that
/// need a deterministic order should build private collections and
/// [`merge`](Self::merge) them in a fixed sequence.
///
/// # Examples
///
/// ```
/// use ferrous_component::{ComponentDescriptor, SharedComponentCollection};
/// use std::thread;
///
/// struct Worker;
///
/// let shared = SharedComponentCollection::new();
/// let handles: Vec<_> = (0..4)
///     .map(|i| {
///         let shared = shared.clone();
///         thread::spawn(move || {
///             shared.add_component::<Worker>(ComponentDescriptor::keyed(format!("worker-{}", i)));
///         })
///     })
///     .collect();
/// for handle in handles {
///     handle.join().unwrap();
/// }
///
/// assert_eq!(shared.build().len(), 4);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SharedComponentCollection {
    inner: Arc<RwLock<ComponentCollection>>,
}

impl SharedComponentCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing collection.
    pub fn from_collection(collection: ComponentCollection) -> Self {
        Self {
            inner: Arc::new(RwLock::new(collection)),
        }
    }

    pub fn declare(&self, declaration: TypeDeclaration) {
        write_lock!(self.inner).declare(declaration);
    }

    pub fn add_component<T: ?Sized + 'static>(&self, descriptor: ComponentDescriptor) {
        write_lock!(self.inner).add_component::<T>(descriptor);
    }

    pub fn add_descriptor(&self, component: ServiceType, descriptor: ComponentDescriptor) {
        write_lock!(self.inner).add_descriptor(component, descriptor);
    }

    /// Merges a privately built collection under a single lock acquisition.
    pub fn merge(&self, collection: ComponentCollection) {
        write_lock!(self.inner).merge(collection);
    }

    /// Plans registrations from a consistent snapshot.
    pub fn build(&self) -> RegistrationPlan {
        read_lock!(self.inner).build()
    }

    /// Copies the current collection out.
    pub fn snapshot(&self) -> ComponentCollection {
        read_lock!(self.inner).clone()
    }
}
