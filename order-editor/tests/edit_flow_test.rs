//! End-to-end edit flow over the in-memory gateway
//!
//! Drives the editor the way a UI would: select, edit, save, and let
//! the gateway change feed refresh the snapshot.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use order_editor::{
    EditCommand, EditError, EditEvent, EditPhase, FieldChange, MemoryGateway, OrderEditor,
    OrderGateway, ProductRef,
};
use shared::order::{OrderLine, OrderSnapshot};

fn widget() -> ProductRef {
    ProductRef {
        product_id: 7,
        name: "Widget".to_string(),
        price: 10.0,
    }
}

fn stored_order(id: &str) -> OrderSnapshot {
    let mut order = OrderSnapshot::new_draft();
    order.order_id = Some(id.to_string());
    order.customer_name = Some("Acme Ltd".to_string());
    let mut line = OrderLine::empty();
    line.apply_product(&widget());
    line.quantity = 2;
    order.lines.push(line);
    order
}

/// Wait for a specific event, skipping unrelated ones.
async fn wait_for<F>(
    events: &mut tokio::sync::broadcast::Receiver<EditEvent>,
    mut matches: F,
) -> EditEvent
where
    F: FnMut(&EditEvent) -> bool,
{
    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            let event = events.recv().await.expect("event channel closed");
            if matches(&event) {
                return event;
            }
        }
    })
    .await
    .expect("timed out waiting for event")
}

#[tokio::test]
async fn test_full_edit_and_save_flow() {
    let gateway = Arc::new(MemoryGateway::new());
    let editor = OrderEditor::with_default_schemas(gateway.clone());
    let mut changes = gateway.subscribe_to_changes();

    // Build a new order from scratch
    editor.dispatch(EditCommand::SelectNewOrder).await.unwrap();
    editor
        .dispatch(EditCommand::EditOrder {
            changes: vec![FieldChange::new("customer_name", "Acme Ltd")],
        })
        .await
        .unwrap();
    editor.dispatch(EditCommand::AddOrderLine).await.unwrap();

    let line_id = editor.current().unwrap().lines[0].line_id.clone();
    editor
        .dispatch(EditCommand::EditOrderLineProduct {
            line_id: line_id.clone(),
            product: widget(),
        })
        .await
        .unwrap();
    editor
        .dispatch(EditCommand::EditOrderLine {
            line_id: line_id.clone(),
            field: "quantity".to_string(),
            value: json!(3),
        })
        .await
        .unwrap();

    let draft = editor.current().unwrap();
    assert_eq!(draft.order_total, 30.0);
    assert!(draft.is_valid());

    // Save and let the change feed refresh the snapshot
    editor.dispatch(EditCommand::SaveOrder).await.unwrap();
    let change = changes.recv().await.unwrap();
    assert_eq!(change.orders.len(), 1);
    editor.handle_collection_changed(change);

    let saved = editor.current().unwrap();
    assert!(saved.order_id.is_some());
    assert_eq!(saved.order_total, 30.0);
    assert_eq!(editor.store().phase(), EditPhase::Editing);
    assert!(!editor.store().is_dirty());
}

#[tokio::test]
async fn test_spawned_listener_refreshes_clean_focus() {
    let gateway = Arc::new(MemoryGateway::new());
    gateway.seed(stored_order("order-1"));
    let editor = Arc::new(OrderEditor::with_default_schemas(
        gateway.clone() as Arc<dyn OrderGateway>
    ));
    let listener = editor.spawn_change_listener();
    let mut events = editor.subscribe();

    editor.select_order("order-1").await.unwrap();

    // Another writer bumps the persisted copy
    let mut fresh = stored_order("order-1");
    fresh.lines[0].quantity = 9;
    gateway.upsert("order-1", &fresh).await.unwrap();

    let event = wait_for(&mut events, |e| {
        matches!(e, EditEvent::SnapshotRefreshed { .. })
    })
    .await;
    match event {
        EditEvent::SnapshotRefreshed { order } => {
            assert_eq!(order.lines[0].quantity, 9);
            assert_eq!(order.order_total, 90.0);
        }
        other => panic!("unexpected event {other:?}"),
    }
    assert_eq!(editor.current().unwrap().lines[0].quantity, 9);

    listener.abort();
}

#[tokio::test]
async fn test_editing_continues_after_failed_save() {
    struct FlakyGateway {
        inner: MemoryGateway,
        fail: std::sync::atomic::AtomicBool,
    }

    #[async_trait::async_trait]
    impl OrderGateway for FlakyGateway {
        async fn fetch_by_id(
            &self,
            order_id: &str,
        ) -> Result<OrderSnapshot, order_editor::GatewayError> {
            self.inner.fetch_by_id(order_id).await
        }

        async fn upsert(
            &self,
            order_id: &str,
            order: &OrderSnapshot,
        ) -> Result<(), order_editor::GatewayError> {
            if self.fail.load(std::sync::atomic::Ordering::SeqCst) {
                return Err(order_editor::GatewayError::Unavailable(
                    "backend offline".to_string(),
                ));
            }
            self.inner.upsert(order_id, order).await
        }

        fn subscribe_to_changes(
            &self,
        ) -> tokio::sync::broadcast::Receiver<order_editor::CollectionChange> {
            self.inner.subscribe_to_changes()
        }
    }

    let gateway = Arc::new(FlakyGateway {
        inner: MemoryGateway::new(),
        fail: std::sync::atomic::AtomicBool::new(true),
    });
    let editor = OrderEditor::with_default_schemas(gateway.clone());
    let mut events = editor.subscribe();

    editor.select_new_order();
    editor
        .edit_order(&[FieldChange::new("customer_name", "Acme Ltd")])
        .unwrap();
    let order = editor.add_order_line().unwrap();
    let line_id = order.lines[0].line_id.clone();
    editor.edit_order_line_product(&line_id, &widget()).unwrap();
    editor
        .edit_order_line(&line_id, "quantity", &json!(2))
        .unwrap();

    // First attempt fails; state and edits survive
    let result = editor.save_order().await;
    assert!(matches!(result, Err(EditError::SaveFailed(_))));
    assert_eq!(editor.store().phase(), EditPhase::Editing);
    assert!(editor.store().is_dirty());
    assert_eq!(editor.current().unwrap().order_total, 20.0);

    let failed = wait_for(&mut events, |e| matches!(e, EditEvent::SaveFailed { .. })).await;
    match failed {
        EditEvent::SaveFailed { message, .. } => assert!(message.contains("backend offline")),
        other => panic!("unexpected event {other:?}"),
    }

    // Editing continues, and a retry succeeds once the backend is back
    editor
        .edit_order_line(&line_id, "quantity", &json!(4))
        .unwrap();
    gateway.fail.store(false, std::sync::atomic::Ordering::SeqCst);
    let order_id = editor.save_order().await.unwrap();

    let persisted = gateway.inner.fetch_by_id(&order_id).await.unwrap();
    assert_eq!(persisted.order_total, 40.0);
    assert!(!editor.store().is_dirty());
}

#[tokio::test]
async fn test_edits_during_save_keep_snapshot_dirty() {
    /// Gateway whose upsert blocks until released, so a save can be
    /// held in flight deterministically.
    struct GatedGateway {
        inner: MemoryGateway,
        entered: tokio::sync::Notify,
        release: tokio::sync::Notify,
    }

    #[async_trait::async_trait]
    impl OrderGateway for GatedGateway {
        async fn fetch_by_id(
            &self,
            order_id: &str,
        ) -> Result<OrderSnapshot, order_editor::GatewayError> {
            self.inner.fetch_by_id(order_id).await
        }

        async fn upsert(
            &self,
            order_id: &str,
            order: &OrderSnapshot,
        ) -> Result<(), order_editor::GatewayError> {
            self.entered.notify_one();
            self.release.notified().await;
            self.inner.upsert(order_id, order).await
        }

        fn subscribe_to_changes(
            &self,
        ) -> tokio::sync::broadcast::Receiver<order_editor::CollectionChange> {
            self.inner.subscribe_to_changes()
        }
    }

    let gateway = Arc::new(GatedGateway {
        inner: MemoryGateway::new(),
        entered: tokio::sync::Notify::new(),
        release: tokio::sync::Notify::new(),
    });
    let editor = Arc::new(OrderEditor::with_default_schemas(
        gateway.clone() as Arc<dyn OrderGateway>
    ));

    editor.select_new_order();
    editor
        .edit_order(&[FieldChange::new("customer_name", "Acme Ltd")])
        .unwrap();
    let order = editor.add_order_line().unwrap();
    let line_id = order.lines[0].line_id.clone();
    editor.edit_order_line_product(&line_id, &widget()).unwrap();
    editor
        .edit_order_line(&line_id, "quantity", &json!(1))
        .unwrap();

    let save_task = tokio::spawn({
        let editor = editor.clone();
        async move { editor.save_order().await }
    });
    gateway.entered.notified().await;
    assert_eq!(editor.store().phase(), EditPhase::Saving);

    // Editing continues while the upsert is in flight
    editor
        .edit_order_line(&line_id, "quantity", &json!(5))
        .unwrap();

    gateway.release.notify_one();
    let order_id = save_task.await.unwrap().unwrap();

    // The racing edit keeps the snapshot dirty and local
    assert!(editor.store().is_dirty());
    assert_eq!(editor.current().unwrap().order_total, 50.0);
    // The persisted copy is the one captured at save time
    let persisted = gateway.inner.fetch_by_id(&order_id).await.unwrap();
    assert_eq!(persisted.order_total, 10.0);
}

#[tokio::test]
async fn test_validation_gate_blocks_save_until_fixed() {
    let gateway = Arc::new(MemoryGateway::new());
    let editor = OrderEditor::with_default_schemas(gateway.clone());

    editor.select_new_order();
    editor.add_order_line().unwrap(); // empty line: no product, quantity 0

    let result = editor.save_order().await;
    assert!(matches!(result, Err(EditError::ValidationFailed(_))));
    assert!(gateway.collection().is_empty());

    // Inline errors are attached for the UI
    let current = editor.current().unwrap();
    assert!(!current.errors.get("customer_name").is_empty());
    assert!(!current.lines[0].errors.get("quantity").is_empty());

    // Fix everything and save again
    editor
        .edit_order(&[FieldChange::new("customer_name", "Acme Ltd")])
        .unwrap();
    let line_id = current.lines[0].line_id.clone();
    editor.edit_order_line_product(&line_id, &widget()).unwrap();
    editor
        .edit_order_line(&line_id, "quantity", &json!(1))
        .unwrap();

    editor.save_order().await.unwrap();
    assert_eq!(gateway.collection().len(), 1);
}
