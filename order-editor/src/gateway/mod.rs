//! Persistence boundary
//!
//! The editor talks to storage through the [`OrderGateway`] trait:
//! fetch-by-id, upsert, and a push-based change feed that delivers the
//! full backing collection on every change. The feed is wrapped as a
//! distinct [`CollectionChange`] type so the dispatcher decides how to
//! reconcile it with an in-progress edit instead of being blindly
//! overwritten.

mod memory;

pub use memory::MemoryGateway;

use async_trait::async_trait;
use shared::order::OrderSnapshot;
use thiserror::Error;
use tokio::sync::broadcast;

/// Gateway errors
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    #[error("order not found: {0}")]
    NotFound(String),

    #[error("backend unavailable: {0}")]
    Unavailable(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Full state of the backing collection, pushed on every change.
#[derive(Debug, Clone)]
pub struct CollectionChange {
    pub orders: Vec<OrderSnapshot>,
}

/// Storage boundary: fetch and upsert of order documents plus a live
/// change feed.
#[async_trait]
pub trait OrderGateway: Send + Sync {
    /// Fetch one order by id. A miss is [`GatewayError::NotFound`].
    async fn fetch_by_id(&self, order_id: &str) -> Result<OrderSnapshot, GatewayError>;

    /// Insert or replace the full order document under `order_id`.
    async fn upsert(&self, order_id: &str, order: &OrderSnapshot) -> Result<(), GatewayError>;

    /// Subscribe to collection change notifications.
    fn subscribe_to_changes(&self) -> broadcast::Receiver<CollectionChange>;
}
