//! Flyweight: route data is shared through a pool. Remaining seat counts
//! vary per query and are kept outside the shared record.

use std::collections::HashMap;
use std::ops::Deref;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, StructuralError};

/// Intrinsic ticket data, shared between all queries for a route.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: u32,
    pub from: String,
    pub to: String,
    pub leaving_time: String,
    pub arrival_time: String,
    pub stops: Vec<String>,
    pub price: f64,
}

impl Ticket {
    pub fn new(id: u32, from: impl Into<String>, to: impl Into<String>, price: f64) -> Self {
        Self {
            id,
            from: from.into(),
            to: to.into(),
            leaving_time: "09:00".into(),
            arrival_time: "11:30".into(),
            stops: Vec::new(),
            price,
        }
    }

    pub fn with_stops<I, S>(mut self, stops: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stops = stops.into_iter().map(Into::into).collect();
        self
    }

    /// Pool key of the route.
    pub fn route(&self) -> String {
        route_key(&self.from, &self.to)
    }
}

fn route_key(from: &str, to: &str) -> String {
    format!("{from} - {to}")
}

/// Pool of shared tickets keyed by `"<from> - <to>"`.
#[derive(Debug, Default)]
pub struct TicketPool {
    tickets: RwLock<HashMap<String, Arc<Ticket>>>,
}

impl TicketPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a ticket, replacing any previous one for the same route.
    pub fn save(&self, ticket: Ticket) -> Result<Arc<Ticket>> {
        let ticket = Arc::new(ticket);
        let mut tickets = self
            .tickets
            .write()
            .map_err(|e| StructuralError::LockPoisoned(e.to_string()))?;
        tickets.insert(ticket.route(), Arc::clone(&ticket));
        Ok(ticket)
    }

    pub fn get(&self, from: &str, to: &str) -> Result<Option<Arc<Ticket>>> {
        let tickets = self
            .tickets
            .read()
            .map_err(|e| StructuralError::LockPoisoned(e.to_string()))?;
        Ok(tickets.get(&route_key(from, to)).cloned())
    }

    pub fn len(&self) -> usize {
        self.tickets.read().map(|t| t.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A shared ticket plus the seats left at query time.
#[derive(Clone, Debug, PartialEq)]
pub struct TicketRemaining {
    ticket: Arc<Ticket>,
    pub remaining: u32,
}

impl TicketRemaining {
    pub fn ticket(&self) -> &Arc<Ticket> {
        &self.ticket
    }
}

impl Deref for TicketRemaining {
    type Target = Ticket;

    fn deref(&self) -> &Ticket {
        &self.ticket
    }
}

/// Answers remaining-seat queries over a [`TicketPool`].
#[derive(Debug)]
pub struct RemainingTicketService {
    pool: Arc<TicketPool>,
    remaining: RwLock<HashMap<u32, u32>>,
}

impl RemainingTicketService {
    pub fn new(pool: Arc<TicketPool>) -> Self {
        Self {
            pool,
            remaining: RwLock::new(HashMap::new()),
        }
    }

    /// Record the seats left for a ticket id.
    pub fn save(&self, ticket_id: u32, remaining: u32) -> Result<()> {
        self.remaining
            .write()
            .map_err(|e| StructuralError::LockPoisoned(e.to_string()))?
            .insert(ticket_id, remaining);
        Ok(())
    }

    /// Look up a route. `None` when the pool has no ticket for it; a known
    /// route with no recorded count has zero seats left.
    pub fn get(&self, from: &str, to: &str) -> Result<Option<TicketRemaining>> {
        let Some(ticket) = self.pool.get(from, to)? else {
            return Ok(None);
        };
        let remaining = self
            .remaining
            .read()
            .map_err(|e| StructuralError::LockPoisoned(e.to_string()))?
            .get(&ticket.id)
            .copied()
            .unwrap_or(0);
        debug!(route = %ticket.route(), remaining, "ticket query");
        Ok(Some(TicketRemaining { ticket, remaining }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> RemainingTicketService {
        let pool = Arc::new(TicketPool::new());
        pool.save(Ticket::new(1, "Guangzhou", "Shenzhen", 79.5).with_stops(["Humen", "Dongguan"]))
            .unwrap();
        pool.save(Ticket::new(2, "Shenzhen", "Guangzhou", 79.5)).unwrap();
        RemainingTicketService::new(pool)
    }

    #[test]
    fn queries_share_the_same_ticket() {
        let service = service();
        service.save(1, 20).unwrap();

        let a = service.get("Guangzhou", "Shenzhen").unwrap().unwrap();
        service.save(1, 19).unwrap();
        let b = service.get("Guangzhou", "Shenzhen").unwrap().unwrap();

        assert!(Arc::ptr_eq(a.ticket(), b.ticket()));
        assert_eq!(a.remaining, 20);
        assert_eq!(b.remaining, 19);
        assert_eq!(b.stops, vec!["Humen", "Dongguan"]);
    }

    #[test]
    fn unknown_route_and_missing_count() {
        let service = service();
        assert!(service.get("Beijing", "Shanghai").unwrap().is_none());
        let back = service.get("Shenzhen", "Guangzhou").unwrap().unwrap();
        assert_eq!(back.remaining, 0);
        assert_eq!(back.id, 2);
    }

    #[test]
    fn pool_keys_by_route() {
        let pool = TicketPool::new();
        assert!(pool.is_empty());
        let first = pool.save(Ticket::new(1, "A", "B", 1.0)).unwrap();
        assert_eq!(first.route(), "A - B");
        pool.save(Ticket::new(3, "A", "B", 2.0)).unwrap();
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.get("A", "B").unwrap().unwrap().id, 3);
    }
}
