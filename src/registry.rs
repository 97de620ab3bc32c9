// src/registry.rs
use crate::{Asset, AssetDraft, RegistryAdapter, RegistryError, TransferRecord, validation};
use metrics::counter;
use std::sync::Arc;
use uuid::Uuid;

/// The asset registry: owns asset records and the dense id allocator.
///
/// Construct through [`crate::RegistrySystem::registry`].
#[derive(Clone)]
pub struct Registry {
    adapter: Arc<dyn RegistryAdapter>,
}

impl Registry {
    pub(crate) fn new(adapter: Arc<dyn RegistryAdapter>) -> Self {
        Self { adapter }
    }

    /// Register an asset and mint its representative token to the caller.
    ///
    /// Ids are allocated densely starting at 1. On any validation failure
    /// nothing is written and the allocator does not advance.
    pub async fn create_asset(
        &self,
        caller: Uuid,
        total_supply: u64,
        fractional_shares: u64,
        metadata_uri: impl Into<String>,
    ) -> Result<u64, RegistryError> {
        let metadata_uri = metadata_uri.into();
        validation::validate_supply(total_supply)?;
        validation::validate_shares(fractional_shares)?;
        validation::validate_metadata_uri(&metadata_uri)?;

        let draft = AssetDraft::new(caller, total_supply, fractional_shares, metadata_uri);
        let asset = self.adapter.create_asset(draft).await?;

        counter!("registry.assets.created").increment(1);
        Ok(asset.id)
    }

    /// Look up an asset record. Unknown ids are `Ok(None)`, never an error.
    pub async fn get_asset_details(&self, asset_id: u64) -> Result<Option<Asset>, RegistryError> {
        self.adapter.get_asset(asset_id).await
    }

    /// Current holder of the representative token, if the asset exists.
    pub async fn token_holder(&self, asset_id: u64) -> Result<Option<Uuid>, RegistryError> {
        self.adapter.token_holder(asset_id).await
    }

    /// The id the next `create_asset` call will receive.
    pub async fn next_asset_id(&self) -> Result<u64, RegistryError> {
        self.adapter.next_asset_id().await
    }

    /// Audit trail of executed token moves for an asset, oldest first.
    pub async fn transfers_for_asset(
        &self,
        asset_id: u64,
    ) -> Result<Vec<TransferRecord>, RegistryError> {
        self.adapter.transfers_for_asset(asset_id).await
    }

    /// Look up a single audit row by its id.
    pub async fn transfer_record(
        &self,
        transfer_id: Uuid,
    ) -> Result<Option<TransferRecord>, RegistryError> {
        self.adapter.get_transfer(transfer_id).await
    }
}
