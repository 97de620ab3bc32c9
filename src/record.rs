// src/record.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Audit row appended atomically with every executed token move.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferRecord {
    pub id: Uuid,
    pub asset_id: u64,
    pub from: Uuid,
    pub to: Uuid,
    pub created_at: DateTime<Utc>,
}

impl TransferRecord {
    pub fn new(asset_id: u64, from: Uuid, to: Uuid) -> Self {
        Self {
            id: Uuid::now_v7(),
            asset_id,
            from,
            to,
            created_at: Utc::now(),
        }
    }
}
