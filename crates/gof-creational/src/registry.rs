//! [`VendorRegistry`]: maps a vendor name to the factory that builds its
//! devices.
//!
//! The registry is an ordinary value handed to whoever needs it; there is
//! no process-wide default instance.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::debug;

use crate::error::{CreationalError, Result};

/// Vendor name → shared factory.
///
/// `F` is usually a trait object such as `dyn LightFactory`. Lookups are
/// case-sensitive; registering a vendor twice replaces the first factory.
pub struct VendorRegistry<F: ?Sized> {
    factories: RwLock<HashMap<String, Arc<F>>>,
}

impl<F: ?Sized> VendorRegistry<F> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            factories: RwLock::new(HashMap::new()),
        }
    }

    /// Register (or replace) the factory for `vendor`.
    pub fn register(&self, vendor: impl Into<String>, factory: Arc<F>) -> Result<()> {
        let vendor = vendor.into();
        let mut factories = self
            .factories
            .write()
            .map_err(|e| CreationalError::LockPoisoned(e.to_string()))?;
        debug!(vendor = %vendor, "factory registered");
        factories.insert(vendor, factory);
        Ok(())
    }

    /// Look up the factory for `vendor`.
    pub fn get(&self, vendor: &str) -> Result<Arc<F>> {
        let factories = self
            .factories
            .read()
            .map_err(|e| CreationalError::LockPoisoned(e.to_string()))?;
        factories
            .get(vendor)
            .cloned()
            .ok_or_else(|| CreationalError::FactoryNotRegistered {
                vendor: vendor.to_string(),
            })
    }

    /// All registered vendor names, sorted.
    pub fn vendors(&self) -> Result<Vec<String>> {
        let factories = self
            .factories
            .read()
            .map_err(|e| CreationalError::LockPoisoned(e.to_string()))?;
        let mut names: Vec<String> = factories.keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}

impl<F: ?Sized> Default for VendorRegistry<F> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Named: Send + Sync {
        fn name(&self) -> &'static str;
    }

    struct A;
    impl Named for A {
        fn name(&self) -> &'static str {
            "a"
        }
    }

    struct B;
    impl Named for B {
        fn name(&self) -> &'static str {
            "b"
        }
    }

    #[test]
    fn register_and_get() {
        let registry: VendorRegistry<dyn Named> = VendorRegistry::new();
        registry.register("alpha", Arc::new(A)).unwrap();
        assert_eq!(registry.get("alpha").unwrap().name(), "a");
    }

    #[test]
    fn missing_vendor_is_an_error() {
        let registry: VendorRegistry<dyn Named> = VendorRegistry::new();
        let err = registry.get("ghost").err().unwrap();
        assert!(matches!(err, CreationalError::FactoryNotRegistered { ref vendor } if vendor == "ghost"));
    }

    #[test]
    fn re_registering_replaces() {
        let registry: VendorRegistry<dyn Named> = VendorRegistry::new();
        registry.register("v", Arc::new(A)).unwrap();
        registry.register("v", Arc::new(B)).unwrap();
        assert_eq!(registry.get("v").unwrap().name(), "b");
        registry.register("u", Arc::new(A)).unwrap();
        assert_eq!(registry.vendors().unwrap(), vec!["u", "v"]);
    }
}
