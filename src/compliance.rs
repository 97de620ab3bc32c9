// src/compliance.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One allow-list row, keyed by `(asset_id, account)`.
///
/// Absence of a row means the account is denied for that asset. Rows are
/// only ever upserted, never deleted; revocation flips `approved` to false.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceEntry {
    pub asset_id: u64,
    pub account: Uuid,
    pub approved: bool,
    pub updated_at: DateTime<Utc>,
}

impl ComplianceEntry {
    pub fn new(asset_id: u64, account: Uuid, approved: bool) -> Self {
        Self {
            asset_id,
            account,
            approved,
            updated_at: Utc::now(),
        }
    }

    /// An entry only permits transfers *into* its account for its asset.
    pub fn permits_transfer(&self) -> bool {
        self.approved
    }
}
