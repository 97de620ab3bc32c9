// src/lib.rs
pub mod adapters;
pub mod asset;
pub mod compliance;
pub mod engine;
pub mod error;
pub mod plan;
pub mod record;
pub mod registry;
pub mod token;
pub mod validation;

pub use asset::{Asset, AssetDraft};
pub use compliance::ComplianceEntry;
pub use engine::ComplianceEngine;
pub use error::RegistryError;
pub use plan::{ExecutionPlan, Operation};
pub use record::TransferRecord;
pub use registry::Registry;
pub use token::{OwnershipToken, TransferEligibility};

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

/// Storage seam to the hosting ledger.
#[async_trait]
pub trait RegistryAdapter: Send + Sync {
    /// Execute a transfer plan atomically.
    /// Implementors MUST:
    /// 1. BEGIN a storage transaction
    /// 2. Lock the token rows named in `holds`
    /// 3. Verify each token's current holder, returning TransferFailed if not
    /// 4. Apply all operations
    /// 5. COMMIT on success, ROLLBACK on any error
    async fn execute_plan(
        &self,
        plan: &ExecutionPlan,
        holds: &[(u64, Uuid)],
    ) -> Result<(), RegistryError>;

    // WRITE OPERATIONS (each atomic on its own)

    /// Allocate the next dense id, persist the record, mint the
    /// representative token to `draft.owner`, and advance the allocator,
    /// as one unit.
    async fn create_asset(&self, draft: AssetDraft) -> Result<Asset, RegistryError>;
    async fn set_compliance(&self, entry: ComplianceEntry) -> Result<(), RegistryError>;

    // READ OPERATIONS
    async fn get_asset(&self, asset_id: u64) -> Result<Option<Asset>, RegistryError>;
    async fn get_compliance(
        &self,
        asset_id: u64,
        account: Uuid,
    ) -> Result<Option<ComplianceEntry>, RegistryError>;
    async fn token_holder(&self, asset_id: u64) -> Result<Option<Uuid>, RegistryError>;
    async fn next_asset_id(&self) -> Result<u64, RegistryError>;
    async fn get_transfer(
        &self,
        transfer_id: Uuid,
    ) -> Result<Option<TransferRecord>, RegistryError>;
    async fn transfers_for_asset(
        &self,
        asset_id: u64,
    ) -> Result<Vec<TransferRecord>, RegistryError>;
}

/// Initialize the registry system with an adapter and the administrator
/// identity. The administrator is a plain configuration value compared on
/// every privileged call, never a hardcoded constant.
pub struct RegistrySystem {
    adapter: Arc<dyn RegistryAdapter>,
    admin: Uuid,
}

impl RegistrySystem {
    pub fn new(adapter: Box<dyn RegistryAdapter>, admin: Uuid) -> Self {
        Self {
            adapter: adapter.into(),
            admin,
        }
    }

    /// Get adapter reference
    pub fn adapter(&self) -> &dyn RegistryAdapter {
        self.adapter.as_ref()
    }

    /// Get adapter Arc (for creating components)
    pub fn adapter_arc(&self) -> Arc<dyn RegistryAdapter> {
        Arc::clone(&self.adapter)
    }

    pub fn admin(&self) -> Uuid {
        self.admin
    }

    /// Asset registry component
    pub fn registry(&self) -> Registry {
        Registry::new(Arc::clone(&self.adapter))
    }

    /// Compliance and transfer component
    pub fn compliance(&self) -> ComplianceEngine {
        ComplianceEngine::new(Arc::clone(&self.adapter), self.admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_finalization() {
        let creator = Uuid::now_v7();
        let asset = AssetDraft::new(creator, 100, 10, "uri://a").into_asset(1);

        assert_eq!(asset.id, 1);
        assert_eq!(asset.owner, creator);
        assert_eq!(asset.total_supply, 100);
        assert_eq!(asset.fractional_shares, 10);
        assert_eq!(asset.metadata_uri, "uri://a");
        assert!(asset.is_transferable);
    }

    #[test]
    fn test_admin_is_injected_configuration() {
        let admin = Uuid::now_v7();
        let system = RegistrySystem::new(Box::new(adapters::MemoryAdapter::new()), admin);

        assert_eq!(system.admin(), admin);
    }
}
