//! Proxy: wrappers that add logging or permission checks to an
//! [`OrderService`] without changing its interface. Proxies stack.

use std::collections::{BTreeMap, HashSet};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Result, StructuralError};

pub const PERMISSION_SAVE: &str = "order.save";
pub const PERMISSION_DELETE: &str = "order.delete";

/// The acting user and the permissions they hold.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub id: u32,
    pub name: String,
    permissions: HashSet<String>,
}

impl User {
    pub fn new<I, S>(id: u32, name: impl Into<String>, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id,
            name: name.into(),
            permissions: permissions.into_iter().map(Into::into).collect(),
        }
    }

    pub fn allowed(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }

    fn require(&self, permission: &str) -> Result<()> {
        if self.allowed(permission) {
            Ok(())
        } else {
            Err(StructuralError::PermissionDenied {
                user: self.name.clone(),
                permission: permission.to_string(),
            })
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: u32,
    pub order_no: String,
    pub customer_id: u32,
    pub order_date: String,
    pub receive_address: String,
}

/// Basic order storage.
pub trait OrderService: Send + Sync {
    fn load(&self, id: u32) -> Result<Order>;

    fn save(&self, order: Order, user: &User) -> Result<()>;

    fn delete(&self, id: u32, user: &User) -> Result<()>;
}

/// The real subject: orders kept in memory.
#[derive(Debug, Default)]
pub struct InMemoryOrderService {
    orders: RwLock<BTreeMap<u32, Order>>,
}

impl InMemoryOrderService {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OrderService for InMemoryOrderService {
    fn load(&self, id: u32) -> Result<Order> {
        let orders = self
            .orders
            .read()
            .map_err(|e| StructuralError::LockPoisoned(e.to_string()))?;
        orders
            .get(&id)
            .cloned()
            .ok_or(StructuralError::OrderNotFound { id })
    }

    fn save(&self, order: Order, _user: &User) -> Result<()> {
        self.orders
            .write()
            .map_err(|e| StructuralError::LockPoisoned(e.to_string()))?
            .insert(order.id, order);
        Ok(())
    }

    fn delete(&self, id: u32, _user: &User) -> Result<()> {
        self.orders
            .write()
            .map_err(|e| StructuralError::LockPoisoned(e.to_string()))?
            .remove(&id)
            .map(|_| ())
            .ok_or(StructuralError::OrderNotFound { id })
    }
}

/// Traces every save and delete with its outcome.
pub struct LoggingOrderService<S> {
    inner: S,
}

impl<S: OrderService> LoggingOrderService<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

impl<S: OrderService> OrderService for LoggingOrderService<S> {
    fn load(&self, id: u32) -> Result<Order> {
        self.inner.load(id)
    }

    fn save(&self, order: Order, user: &User) -> Result<()> {
        let id = order.id;
        let result = self.inner.save(order, user);
        match &result {
            Ok(()) => info!(user = %user.name, order = id, "order saved"),
            Err(e) => warn!(user = %user.name, order = id, error = %e, "order save failed"),
        }
        result
    }

    fn delete(&self, id: u32, user: &User) -> Result<()> {
        let result = self.inner.delete(id, user);
        match &result {
            Ok(()) => info!(user = %user.name, order = id, "order deleted"),
            Err(e) => warn!(user = %user.name, order = id, error = %e, "order delete failed"),
        }
        result
    }
}

/// Rejects saves and deletes the user has no permission for.
pub struct SecureOrderService<S> {
    inner: S,
}

impl<S: OrderService> SecureOrderService<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

impl<S: OrderService> OrderService for SecureOrderService<S> {
    fn load(&self, id: u32) -> Result<Order> {
        self.inner.load(id)
    }

    fn save(&self, order: Order, user: &User) -> Result<()> {
        user.require(PERMISSION_SAVE)?;
        self.inner.save(order, user)
    }

    fn delete(&self, id: u32, user: &User) -> Result<()> {
        user.require(PERMISSION_DELETE)?;
        self.inner.delete(id, user)
    }
}
