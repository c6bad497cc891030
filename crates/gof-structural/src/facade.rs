//! Facade: exchanging points for a gift touches the points, inventory and
//! shipping services. [`GiftExchangeService`] does it in one call.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{Result, StructuralError};

fn poisoned(e: impl std::fmt::Display) -> StructuralError {
    StructuralError::LockPoisoned(e.to_string())
}

/// A gift and its price in points.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiftInfo {
    pub id: u32,
    pub name: String,
    pub points: u32,
}

impl GiftInfo {
    pub fn new(id: u32, name: impl Into<String>, points: u32) -> Self {
        Self {
            id,
            name: name.into(),
            points,
        }
    }
}

/// A user's request to exchange points for a gift.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiftExchangeRequest {
    pub id: u32,
    pub user_id: u32,
    pub gift_id: u32,
    pub create_time: DateTime<Utc>,
}

impl GiftExchangeRequest {
    pub fn new(id: u32, user_id: u32, gift_id: u32) -> Self {
        Self {
            id,
            user_id,
            gift_id,
            create_time: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// Subsystems
// ---------------------------------------------------------------------------

/// User point balances.
pub trait PointsService: Send + Sync {
    fn user_points(&self, user_id: u32) -> Result<u32>;

    fn save_user_points(&self, user_id: u32, points: u32) -> Result<()>;
}

/// Gift catalogue and stock.
pub trait InventoryService: Send + Sync {
    fn gift(&self, gift_id: u32) -> Result<Option<GiftInfo>>;

    /// Stock on hand; unknown gifts have none.
    fn stock(&self, gift_id: u32) -> Result<u32>;

    fn save_stock(&self, gift_id: u32, stock: u32) -> Result<()>;
}

/// Shipping order creation.
pub trait ShippingService: Send + Sync {
    /// Create a shipping order and return its number.
    fn create_shipping_order(&self, user_id: u32, gift_id: u32) -> Result<String>;
}

#[derive(Debug, Default)]
pub struct InMemoryPointsService {
    points: RwLock<HashMap<u32, u32>>,
}

impl InMemoryPointsService {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PointsService for InMemoryPointsService {
    fn user_points(&self, user_id: u32) -> Result<u32> {
        let points = self.points.read().map_err(poisoned)?;
        points
            .get(&user_id)
            .copied()
            .ok_or(StructuralError::UserNotFound { user_id })
    }

    fn save_user_points(&self, user_id: u32, points: u32) -> Result<()> {
        self.points.write().map_err(poisoned)?.insert(user_id, points);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryInventoryService {
    gifts: RwLock<HashMap<u32, GiftInfo>>,
    stock: RwLock<HashMap<u32, u32>>,
}

impl InMemoryInventoryService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a gift to the catalogue with an initial stock.
    pub fn add_gift(&self, gift: GiftInfo, stock: u32) -> Result<()> {
        self.stock.write().map_err(poisoned)?.insert(gift.id, stock);
        self.gifts.write().map_err(poisoned)?.insert(gift.id, gift);
        Ok(())
    }
}

impl InventoryService for InMemoryInventoryService {
    fn gift(&self, gift_id: u32) -> Result<Option<GiftInfo>> {
        Ok(self.gifts.read().map_err(poisoned)?.get(&gift_id).cloned())
    }

    fn stock(&self, gift_id: u32) -> Result<u32> {
        Ok(self
            .stock
            .read()
            .map_err(poisoned)?
            .get(&gift_id)
            .copied()
            .unwrap_or(0))
    }

    fn save_stock(&self, gift_id: u32, stock: u32) -> Result<()> {
        self.stock.write().map_err(poisoned)?.insert(gift_id, stock);
        Ok(())
    }
}

/// A created shipping order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingOrder {
    pub order_no: String,
    pub user_id: u32,
    pub gift_id: u32,
}

#[derive(Debug, Default)]
pub struct InMemoryShippingService {
    orders: RwLock<Vec<ShippingOrder>>,
}

impl InMemoryShippingService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn orders(&self) -> Result<Vec<ShippingOrder>> {
        Ok(self.orders.read().map_err(poisoned)?.clone())
    }
}

impl ShippingService for InMemoryShippingService {
    fn create_shipping_order(&self, user_id: u32, gift_id: u32) -> Result<String> {
        let order_no = format!("SO-{}", Uuid::now_v7().simple());
        self.orders.write().map_err(poisoned)?.push(ShippingOrder {
            order_no: order_no.clone(),
            user_id,
            gift_id,
        });
        Ok(order_no)
    }
}

// ---------------------------------------------------------------------------
// Facade
// ---------------------------------------------------------------------------

/// Gift exchange across the points, inventory and shipping services.
///
/// The steps are not transactional: a shipping failure leaves stock and
/// points already deducted.
pub struct GiftExchangeService {
    points: Arc<dyn PointsService>,
    inventory: Arc<dyn InventoryService>,
    shipping: Arc<dyn ShippingService>,
}

impl GiftExchangeService {
    pub fn new(
        points: Arc<dyn PointsService>,
        inventory: Arc<dyn InventoryService>,
        shipping: Arc<dyn ShippingService>,
    ) -> Self {
        Self {
            points,
            inventory,
            shipping,
        }
    }

    /// Exchange points for a gift. Returns the shipping order number.
    pub fn exchange(&self, request: &GiftExchangeRequest) -> Result<String> {
        let gift = self
            .inventory
            .gift(request.gift_id)?
            .ok_or(StructuralError::GiftNotFound {
                gift_id: request.gift_id,
            })?;

        let available = self.points.user_points(request.user_id)?;
        if available < gift.points {
            return Err(StructuralError::InsufficientPoints {
                required: gift.points,
                available,
            });
        }

        let stock = self.inventory.stock(gift.id)?;
        if stock == 0 {
            return Err(StructuralError::InsufficientStock { gift_id: gift.id });
        }

        self.inventory.save_stock(gift.id, stock - 1)?;
        self.points
            .save_user_points(request.user_id, available - gift.points)?;
        debug!(user = request.user_id, gift = gift.id, "points deducted");

        let order_no = self.shipping.create_shipping_order(request.user_id, gift.id)?;
        info!(request = request.id, order_no = %order_no, "gift exchanged");
        Ok(order_no)
    }
}
