// src/adapters/memory.rs
use crate::{
    Asset, AssetDraft, ComplianceEntry, ExecutionPlan, Operation, OwnershipToken, RegistryAdapter,
    RegistryError, TransferRecord,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

#[derive(Clone)]
struct MemoryStore {
    assets: Arc<Mutex<HashMap<u64, Asset>>>,
    compliance: Arc<Mutex<HashMap<(u64, Uuid), ComplianceEntry>>>,
    tokens: Arc<Mutex<HashMap<u64, OwnershipToken>>>,
    transfers: Arc<Mutex<Vec<TransferRecord>>>,
    next_id: Arc<Mutex<u64>>,
}

impl MemoryStore {
    fn new() -> Self {
        Self {
            assets: Arc::new(Mutex::new(HashMap::new())),
            compliance: Arc::new(Mutex::new(HashMap::new())),
            tokens: Arc::new(Mutex::new(HashMap::new())),
            transfers: Arc::new(Mutex::new(Vec::new())),
            next_id: Arc::new(Mutex::new(1)),
        }
    }
}

pub struct MemoryAdapter {
    store: MemoryStore,
}

impl MemoryAdapter {
    pub fn new() -> Self {
        Self {
            store: MemoryStore::new(),
        }
    }
}

#[async_trait]
impl RegistryAdapter for MemoryAdapter {
    async fn execute_plan(
        &self,
        plan: &ExecutionPlan,
        holds: &[(u64, Uuid)],
    ) -> Result<(), RegistryError> {
        // One guard across verify and apply, the in-process analog of a
        // storage transaction.
        let mut tokens = self.store.tokens.lock().unwrap();

        // Checked INSIDE the lock; this is the real holder guard
        for (asset_id, expected) in holds {
            match tokens.get(asset_id) {
                Some(token) if token.is_held_by(*expected) => {}
                _ => return Err(RegistryError::TransferFailed),
            }
        }

        for op in plan.operations() {
            match op {
                Operation::MoveToken { asset_id, to, .. } => {
                    if let Some(token) = tokens.get_mut(asset_id) {
                        token.holder = *to;
                    }
                }
                Operation::RecordTransfer { record } => {
                    let mut transfers = self.store.transfers.lock().unwrap();
                    transfers.push(record.clone());
                }
            }
        }

        Ok(())
    }

    async fn create_asset(&self, draft: AssetDraft) -> Result<Asset, RegistryError> {
        // Lock ordering: allocator first, then tables. All three writes land
        // under the allocator guard, so ids stay dense.
        let mut next_id = self.store.next_id.lock().unwrap();
        let id = *next_id;

        let asset = draft.into_asset(id);

        let mut assets = self.store.assets.lock().unwrap();
        let mut tokens = self.store.tokens.lock().unwrap();
        assets.insert(id, asset.clone());
        tokens.insert(id, OwnershipToken::mint(id, asset.owner));
        *next_id += 1;

        Ok(asset)
    }

    async fn set_compliance(&self, entry: ComplianceEntry) -> Result<(), RegistryError> {
        let mut compliance = self.store.compliance.lock().unwrap();
        compliance.insert((entry.asset_id, entry.account), entry);
        Ok(())
    }

    async fn get_asset(&self, asset_id: u64) -> Result<Option<Asset>, RegistryError> {
        let assets = self.store.assets.lock().unwrap();
        Ok(assets.get(&asset_id).cloned())
    }

    async fn get_compliance(
        &self,
        asset_id: u64,
        account: Uuid,
    ) -> Result<Option<ComplianceEntry>, RegistryError> {
        let compliance = self.store.compliance.lock().unwrap();
        Ok(compliance.get(&(asset_id, account)).cloned())
    }

    async fn token_holder(&self, asset_id: u64) -> Result<Option<Uuid>, RegistryError> {
        let tokens = self.store.tokens.lock().unwrap();
        Ok(tokens.get(&asset_id).map(|token| token.holder))
    }

    async fn next_asset_id(&self) -> Result<u64, RegistryError> {
        let next_id = self.store.next_id.lock().unwrap();
        Ok(*next_id)
    }

    async fn get_transfer(
        &self,
        transfer_id: Uuid,
    ) -> Result<Option<TransferRecord>, RegistryError> {
        let transfers = self.store.transfers.lock().unwrap();
        Ok(transfers.iter().find(|r| r.id == transfer_id).cloned())
    }

    async fn transfers_for_asset(
        &self,
        asset_id: u64,
    ) -> Result<Vec<TransferRecord>, RegistryError> {
        let transfers = self.store.transfers.lock().unwrap();
        Ok(transfers
            .iter()
            .filter(|r| r.asset_id == asset_id)
            .cloned()
            .collect())
    }
}

impl Default for MemoryAdapter {
    fn default() -> Self {
        Self::new()
    }
}
