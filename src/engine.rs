// src/engine.rs
use crate::{
    ComplianceEntry, ExecutionPlan, Operation, RegistryAdapter, RegistryError, TransferEligibility,
    TransferRecord, validation,
};
use metrics::counter;
use std::sync::Arc;
use uuid::Uuid;

/// The compliance and transfer engine: owns the per-(asset, account)
/// allow-list and the ownership-token transfer protocol.
///
/// Construct through [`crate::RegistrySystem::compliance`].
#[derive(Clone)]
pub struct ComplianceEngine {
    adapter: Arc<dyn RegistryAdapter>,
    admin: Uuid,
}

impl ComplianceEngine {
    pub(crate) fn new(adapter: Arc<dyn RegistryAdapter>, admin: Uuid) -> Self {
        Self { adapter, admin }
    }

    /// Upsert the allow-list flag for `(asset_id, account)`.
    ///
    /// Administrator only. Shape checks run before the authorization check,
    /// so a malformed request surfaces as `InvalidInput` even from an
    /// unauthorized caller. The asset id is deliberately not checked for
    /// existence; an entry may pre-approve a not-yet-created id.
    pub async fn set_compliance_status(
        &self,
        caller: Uuid,
        asset_id: u64,
        account: Uuid,
        approved: bool,
    ) -> Result<bool, RegistryError> {
        validation::validate_asset_id(asset_id)?;
        validation::validate_counterparty(account, self.admin)?;
        if caller != self.admin {
            return Err(RegistryError::Unauthorized);
        }

        self.adapter
            .set_compliance(ComplianceEntry::new(asset_id, account, approved))
            .await?;

        counter!("registry.compliance.updates").increment(1);
        Ok(approved)
    }

    /// Default-deny read of the allow-list.
    pub async fn compliance_status(
        &self,
        asset_id: u64,
        account: Uuid,
    ) -> Result<bool, RegistryError> {
        Ok(self
            .adapter
            .get_compliance(asset_id, account)
            .await?
            .map(|entry| entry.permits_transfer())
            .unwrap_or(false))
    }

    /// Move the representative token for `asset_id` from the caller to `to`.
    ///
    /// Checks run in a fixed order, short-circuiting on the first failure:
    /// existence, id shape, counterparty, transferability, compliance. Only
    /// then is the plan executed; the adapter verifies under its transaction
    /// that the caller actually holds the token, surfacing `TransferFailed`
    /// otherwise. Any failure leaves no partial writes.
    ///
    /// `amount` is carried for the eventual per-holder share ledger; the
    /// current contract moves the whole representative token regardless.
    pub async fn transfer_fractional_ownership(
        &self,
        caller: Uuid,
        asset_id: u64,
        to: Uuid,
        amount: u64,
    ) -> Result<bool, RegistryError> {
        let _ = amount;

        let asset = self
            .adapter
            .get_asset(asset_id)
            .await?
            .ok_or(RegistryError::InvalidAsset(asset_id))?;
        validation::validate_asset_id(asset_id)?;
        validation::validate_counterparty(to, self.admin)?;

        if !TransferEligibility::of(Some(&asset)).is_transferable() {
            return Err(RegistryError::Unauthorized);
        }

        let approved = self
            .adapter
            .get_compliance(asset_id, to)
            .await?
            .map(|entry| entry.permits_transfer())
            .unwrap_or(false);
        if !approved {
            return Err(RegistryError::ComplianceCheckFailed);
        }

        let mut plan = ExecutionPlan::new();
        plan.add(Operation::MoveToken {
            asset_id,
            from: caller,
            to,
        });
        plan.add(Operation::RecordTransfer {
            record: TransferRecord::new(asset_id, caller, to),
        });

        let holds = plan.required_holds();
        let result = self.adapter.execute_plan(&plan, &holds).await;

        counter!("registry.transfers.total",
            "status" => if result.is_ok() { "success" } else { "failed" }
        )
        .increment(1);

        result.map(|()| true)
    }
}
