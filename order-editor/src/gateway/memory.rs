//! In-memory gateway for tests and single-process deployments

use async_trait::async_trait;
use dashmap::DashMap;
use shared::order::OrderSnapshot;
use tokio::sync::broadcast;

use super::{CollectionChange, GatewayError, OrderGateway};

/// Change feed capacity
const CHANGE_CHANNEL_CAPACITY: usize = 256;

/// Document store backed by a concurrent map, with a broadcast change
/// feed that pushes the full collection after every upsert.
pub struct MemoryGateway {
    orders: DashMap<String, OrderSnapshot>,
    change_tx: broadcast::Sender<CollectionChange>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        let (change_tx, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            orders: DashMap::new(),
            change_tx,
        }
    }

    /// Insert an order without emitting a change notification (test and
    /// startup seeding). Orders without an id are ignored.
    pub fn seed(&self, order: OrderSnapshot) {
        if let Some(id) = order.order_id.clone() {
            self.orders.insert(id, order);
        }
    }

    /// Current collection, ordered by creation time then id so pushes
    /// are deterministic.
    pub fn collection(&self) -> Vec<OrderSnapshot> {
        let mut orders: Vec<OrderSnapshot> =
            self.orders.iter().map(|entry| entry.value().clone()).collect();
        orders.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.order_id.cmp(&b.order_id))
        });
        orders
    }

    fn publish(&self) {
        let change = CollectionChange {
            orders: self.collection(),
        };
        if self.change_tx.send(change).is_err() {
            tracing::debug!("change feed has no active subscribers");
        }
    }
}

impl Default for MemoryGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrderGateway for MemoryGateway {
    async fn fetch_by_id(&self, order_id: &str) -> Result<OrderSnapshot, GatewayError> {
        self.orders
            .get(order_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| GatewayError::NotFound(order_id.to_string()))
    }

    async fn upsert(&self, order_id: &str, order: &OrderSnapshot) -> Result<(), GatewayError> {
        self.orders.insert(order_id.to_string(), order.clone());
        self.publish();
        Ok(())
    }

    fn subscribe_to_changes(&self) -> broadcast::Receiver<CollectionChange> {
        self.change_tx.subscribe()
    }
}
