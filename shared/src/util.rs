/// Current UTC timestamp in milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a fresh entity id (orders and order lines).
///
/// Ids for new entities are minted locally and stay stable once the
/// entity is persisted.
pub fn new_entity_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
