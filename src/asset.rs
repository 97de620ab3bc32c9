// src/asset.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered real-world asset.
///
/// `owner` records the identity that **created** the asset and is never
/// revised when the representative token changes hands; the token-holder
/// mapping is the source of truth for the current holder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    pub id: u64,
    pub owner: Uuid,
    pub total_supply: u64,
    pub fractional_shares: u64,
    pub metadata_uri: String,
    pub is_transferable: bool,
    pub created_at: DateTime<Utc>,
}

/// Shape of an asset before the adapter has allocated its id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetDraft {
    pub owner: Uuid,
    pub total_supply: u64,
    pub fractional_shares: u64,
    pub metadata_uri: String,
    pub is_transferable: bool,
}

impl AssetDraft {
    pub fn new(
        owner: Uuid,
        total_supply: u64,
        fractional_shares: u64,
        metadata_uri: impl Into<String>,
    ) -> Self {
        Self {
            owner,
            total_supply,
            fractional_shares,
            metadata_uri: metadata_uri.into(),
            is_transferable: true,
        }
    }

    /// Finalize the draft once the adapter has allocated an id.
    pub fn into_asset(self, id: u64) -> Asset {
        Asset {
            id,
            owner: self.owner,
            total_supply: self.total_supply,
            fractional_shares: self.fractional_shares,
            metadata_uri: self.metadata_uri,
            is_transferable: self.is_transferable,
            created_at: Utc::now(),
        }
    }
}
