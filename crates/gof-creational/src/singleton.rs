//! Singletons without globals.
//!
//! - Eager: build the instance up front and share it as an `Arc`.
//! - Lazy: [`LazySingleton`] builds its instance on first use, exactly once,
//!   with a double-checked read/write lock.
//! - Contained: [`BeanContainer`] keeps one instance per name; the first
//!   registration wins.
//!
//! Each holder is a value owned by the caller, so tests and subsystems can
//! have their own.

use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::debug;

use crate::error::{CreationalError, Result};

/// The demo service every singleton flavour hands out.
pub trait Greeter: Send + Sync {
    fn hello(&self) -> String;
}

#[derive(Debug, Default)]
pub struct EagerGreeter;

impl Greeter for EagerGreeter {
    fn hello(&self) -> String {
        "eager singleton says hello".into()
    }
}

#[derive(Debug, Default)]
pub struct LazyGreeter;

impl Greeter for LazyGreeter {
    fn hello(&self) -> String {
        "lazy singleton says hello".into()
    }
}

#[derive(Debug, Default)]
pub struct ContainedGreeter;

impl Greeter for ContainedGreeter {
    fn hello(&self) -> String {
        "contained singleton says hello".into()
    }
}

// ---------------------------------------------------------------------------
// LazySingleton
// ---------------------------------------------------------------------------

/// Holds at most one `T`, created on first access.
pub struct LazySingleton<T: ?Sized> {
    slot: RwLock<Option<Arc<T>>>,
}

impl<T: ?Sized> LazySingleton<T> {
    pub fn new() -> Self {
        Self {
            slot: RwLock::new(None),
        }
    }

    /// Return the instance, creating it with `init` if this is the first call.
    ///
    /// `init` runs at most once even under concurrent callers.
    pub fn get_or_init(&self, init: impl FnOnce() -> Arc<T>) -> Result<Arc<T>> {
        {
            let slot = self
                .slot
                .read()
                .map_err(|e| CreationalError::LockPoisoned(e.to_string()))?;
            if let Some(instance) = slot.as_ref() {
                return Ok(Arc::clone(instance));
            }
        }

        let mut slot = self
            .slot
            .write()
            .map_err(|e| CreationalError::LockPoisoned(e.to_string()))?;
        if let Some(instance) = slot.as_ref() {
            return Ok(Arc::clone(instance));
        }
        debug!("lazy singleton initialized");
        let instance = init();
        *slot = Some(Arc::clone(&instance));
        Ok(instance)
    }

    /// Returns `true` once the instance exists.
    pub fn is_initialized(&self) -> bool {
        self.slot.read().map(|s| s.is_some()).unwrap_or(false)
    }
}

impl<T: ?Sized> Default for LazySingleton<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// BeanContainer
// ---------------------------------------------------------------------------

type Bean = Arc<dyn Any + Send + Sync>;

/// Named singletons of arbitrary type.
#[derive(Default)]
pub struct BeanContainer {
    beans: RwLock<HashMap<String, Bean>>,
}

impl BeanContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `bean` under `name`.
    ///
    /// Returns `Ok(false)` and keeps the existing bean if the name is taken.
    pub fn register<T: Any + Send + Sync>(&self, name: impl Into<String>, bean: T) -> Result<bool> {
        let name = name.into();
        let mut beans = self
            .beans
            .write()
            .map_err(|e| CreationalError::LockPoisoned(e.to_string()))?;
        if beans.contains_key(&name) {
            debug!(bean = %name, "bean already registered");
            return Ok(false);
        }
        debug!(bean = %name, "bean registered");
        beans.insert(name, Arc::new(bean));
        Ok(true)
    }

    /// Fetch the bean registered under `name` as a `T`.
    ///
    /// `Ok(None)` when the name is unknown or the bean has another type.
    pub fn get<T: Any + Send + Sync>(&self, name: &str) -> Result<Option<Arc<T>>> {
        let beans = self
            .beans
            .read()
            .map_err(|e| CreationalError::LockPoisoned(e.to_string()))?;
        Ok(beans
            .get(name)
            .cloned()
            .and_then(|bean| bean.downcast::<T>().ok()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.beans
            .read()
            .map(|beans| beans.contains_key(name))
            .unwrap_or(false)
    }
}
