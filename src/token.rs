// src/token.rs
use crate::Asset;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Transfer eligibility of an asset id.
///
/// `Locked` is part of the data shape (an asset whose `is_transferable` flag
/// is false) even though no public operation sets it today.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TransferEligibility {
    /// No asset exists under this id
    Nonexistent,
    /// Asset exists and its representative token may move
    Transferable,
    /// Asset exists but transfers are gated off
    Locked,
}

impl TransferEligibility {
    /// Classify an asset lookup result.
    pub fn of(asset: Option<&Asset>) -> Self {
        match asset {
            None => TransferEligibility::Nonexistent,
            Some(a) if a.is_transferable => TransferEligibility::Transferable,
            Some(_) => TransferEligibility::Locked,
        }
    }

    pub fn is_transferable(&self) -> bool {
        matches!(self, TransferEligibility::Transferable)
    }

    pub fn is_nonexistent(&self) -> bool {
        matches!(self, TransferEligibility::Nonexistent)
    }

    pub fn is_locked(&self) -> bool {
        matches!(self, TransferEligibility::Locked)
    }
}

/// The single non-fungible token standing in for ownership of an asset.
///
/// Invariants:
/// - identifier equals the asset id; exactly one token per asset
/// - exactly one holder at any time
/// - minted exactly once, at asset creation, to the creator
/// - the holder changes only through a successful transfer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnershipToken {
    pub asset_id: u64,
    pub holder: Uuid,
    pub minted_at: DateTime<Utc>,
}

impl OwnershipToken {
    /// Mint the representative token for a freshly created asset.
    pub fn mint(asset_id: u64, holder: Uuid) -> Self {
        Self {
            asset_id,
            holder,
            minted_at: Utc::now(),
        }
    }

    pub fn is_held_by(&self, account: Uuid) -> bool {
        self.holder == account
    }
}
