//! Domain entities mirrored from persistent storage.

use serde::Serialize;
use uuid::Uuid;

/// A persisted tip, identity assigned by the durable store on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TipRecord {
    pub id: i64,
    pub message: String,
}

/// A session-scoped draft tip held in the fast store.
///
/// `session_id` partitions drafts by origin; it carries no ownership or
/// authentication semantics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DraftRecord {
    pub id: i64,
    pub message: String,
    pub session_id: Uuid,
}
