//! Visitor: reports are computed by visitors walking the stored orders, so
//! new reports need no change to the order service.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleOrder {
    pub id: u32,
    pub customer: String,
    pub city: String,
    pub product: String,
    pub quantity: u32,
}

impl SaleOrder {
    pub fn new(id: u32, customer: &str, city: &str, product: &str, quantity: u32) -> Self {
        Self {
            id,
            customer: customer.into(),
            city: city.into(),
            product: product.into(),
            quantity,
        }
    }
}

pub trait SaleOrderVisitor {
    fn visit(&mut self, order: &SaleOrder);

    /// `(key, total quantity)` pairs ordered by key.
    fn report(&self) -> Vec<(String, u32)>;
}

/// Orders keyed by id; visits happen in id order.
#[derive(Clone, Debug, Default)]
pub struct SaleOrderService {
    orders: BTreeMap<u32, SaleOrder>,
}

impl SaleOrderService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace by id.
    pub fn save(&mut self, order: SaleOrder) {
        self.orders.insert(order.id, order);
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn accept(&self, visitor: &mut dyn SaleOrderVisitor) {
        debug!(orders = self.orders.len(), "visiting sale orders");
        for order in self.orders.values() {
            visitor.visit(order);
        }
    }
}

/// Quantity per city.
#[derive(Clone, Debug, Default)]
pub struct CityVisitor {
    sums: BTreeMap<String, u32>,
}

impl CityVisitor {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SaleOrderVisitor for CityVisitor {
    fn visit(&mut self, order: &SaleOrder) {
        *self.sums.entry(order.city.clone()).or_default() += order.quantity;
    }

    fn report(&self) -> Vec<(String, u32)> {
        self.sums.iter().map(|(k, v)| (k.clone(), *v)).collect()
    }
}

/// Quantity per product.
#[derive(Clone, Debug, Default)]
pub struct ProductVisitor {
    sums: BTreeMap<String, u32>,
}

impl ProductVisitor {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SaleOrderVisitor for ProductVisitor {
    fn visit(&mut self, order: &SaleOrder) {
        *self.sums.entry(order.product.clone()).or_default() += order.quantity;
    }

    fn report(&self) -> Vec<(String, u32)> {
        self.sums.iter().map(|(k, v)| (k.clone(), *v)).collect()
    }
}
