// src/adapters/postgres.rs
use crate::{
    Asset, AssetDraft, ComplianceEntry, ExecutionPlan, Operation, RegistryAdapter, RegistryError,
    TransferRecord,
};
use sqlx::Row;
use uuid::Uuid;

pub trait PostgresRegistryAdapter {
    fn get_pool(&self) -> sqlx::PgPool;
}

/// Ready-made postgres adapter over a connection pool.
///
/// Call [`PostgresSchemaRegistryAdapter::init_registry_schema`] once before
/// first use.
pub struct PostgresAdapter {
    pool: sqlx::PgPool,
}

impl PostgresAdapter {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

impl PostgresRegistryAdapter for PostgresAdapter {
    fn get_pool(&self) -> sqlx::PgPool {
        self.pool.clone()
    }
}

#[async_trait::async_trait]
pub trait PostgresSchemaRegistryAdapter {
    /// Initialize the schema for the registry tables, including the single
    /// counter row the dense id allocator locks on.
    async fn init_registry_schema(&self) -> Result<(), RegistryError>;
}

#[async_trait::async_trait]
impl<T> PostgresSchemaRegistryAdapter for T
where
    T: PostgresRegistryAdapter + Send + Sync,
{
    async fn init_registry_schema(&self) -> Result<(), RegistryError> {
        let mut tx = self
            .get_pool()
            .begin()
            .await
            .map_err(|e| RegistryError::Storage(e.to_string()))?;

        // Assets table
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS registry_assets (
                id BIGINT PRIMARY KEY,
                owner UUID NOT NULL,
                total_supply BIGINT NOT NULL CHECK (total_supply > 0),
                fractional_shares BIGINT NOT NULL CHECK (fractional_shares > 0),
                metadata_uri TEXT NOT NULL CHECK (char_length(metadata_uri) BETWEEN 1 AND 256),
                is_transferable BOOLEAN NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&mut *tx)
        .await
        .map_err(|e| RegistryError::Storage(e.to_string()))?;

        // Representative tokens: one row per asset, one holder per row
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS registry_tokens (
                asset BIGINT PRIMARY KEY REFERENCES registry_assets(id),
                holder UUID NOT NULL,
                minted_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&mut *tx)
        .await
        .map_err(|e| RegistryError::Storage(e.to_string()))?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_tokens_holder
            ON registry_tokens(holder)
            "#,
        )
        .execute(&mut *tx)
        .await
        .map_err(|e| RegistryError::Storage(e.to_string()))?;

        // Compliance allow-list; no foreign key on asset, since entries may
        // pre-approve not-yet-created ids
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS registry_compliance (
                asset BIGINT NOT NULL,
                account UUID NOT NULL,
                approved BOOLEAN NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                PRIMARY KEY (asset, account)
            )
            "#,
        )
        .execute(&mut *tx)
        .await
        .map_err(|e| RegistryError::Storage(e.to_string()))?;

        // Transfer audit trail
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS registry_transfers (
                id UUID PRIMARY KEY,
                asset BIGINT NOT NULL REFERENCES registry_assets(id),
                sender UUID NOT NULL,
                receiver UUID NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&mut *tx)
        .await
        .map_err(|e| RegistryError::Storage(e.to_string()))?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_transfers_asset
            ON registry_transfers(asset)
            "#,
        )
        .execute(&mut *tx)
        .await
        .map_err(|e| RegistryError::Storage(e.to_string()))?;

        // Single-row counter; a sequence would leave gaps on rollback
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS registry_counter (
                id SMALLINT PRIMARY KEY CHECK (id = 0),
                next_id BIGINT NOT NULL
            )
            "#,
        )
        .execute(&mut *tx)
        .await
        .map_err(|e| RegistryError::Storage(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO registry_counter (id, next_id)
            VALUES (0, 1)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .execute(&mut *tx)
        .await
        .map_err(|e| RegistryError::Storage(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| RegistryError::Storage(e.to_string()))?;

        Ok(())
    }
}

#[async_trait::async_trait]
trait PostgresInternalRegistryAdapter {
    async fn move_token_internal_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        asset_id: u64,
        to: Uuid,
    ) -> Result<(), RegistryError>;

    async fn record_transfer_internal_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        record: TransferRecord,
    ) -> Result<(), RegistryError>;

    fn row_to_asset(&self, row: &sqlx::postgres::PgRow) -> Result<Asset, RegistryError>;
}

#[async_trait::async_trait]
impl<T> PostgresInternalRegistryAdapter for T
where
    T: PostgresRegistryAdapter + Send + Sync,
{
    async fn move_token_internal_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        asset_id: u64,
        to: Uuid,
    ) -> Result<(), RegistryError> {
        sqlx::query(
            r#"
            UPDATE registry_tokens
            SET holder = $2
            WHERE asset = $1
            "#,
        )
        .bind(asset_id as i64)
        .bind(to)
        .execute(&mut **tx)
        .await
        .map_err(|e| RegistryError::Storage(e.to_string()))?;

        Ok(())
    }

    async fn record_transfer_internal_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        record: TransferRecord,
    ) -> Result<(), RegistryError> {
        sqlx::query(
            r#"
            INSERT INTO registry_transfers (id, asset, sender, receiver, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(record.id)
        .bind(record.asset_id as i64)
        .bind(record.from)
        .bind(record.to)
        .bind(record.created_at)
        .execute(&mut **tx)
        .await
        .map_err(|e| RegistryError::Storage(e.to_string()))?;

        Ok(())
    }

    fn row_to_asset(&self, row: &sqlx::postgres::PgRow) -> Result<Asset, RegistryError> {
        Ok(Asset {
            id: row
                .try_get::<i64, _>("id")
                .map_err(|e| RegistryError::Storage(e.to_string()))? as u64,
            owner: row
                .try_get("owner")
                .map_err(|e| RegistryError::Storage(e.to_string()))?,
            total_supply: row
                .try_get::<i64, _>("total_supply")
                .map_err(|e| RegistryError::Storage(e.to_string()))? as u64,
            fractional_shares: row
                .try_get::<i64, _>("fractional_shares")
                .map_err(|e| RegistryError::Storage(e.to_string()))? as u64,
            metadata_uri: row
                .try_get("metadata_uri")
                .map_err(|e| RegistryError::Storage(e.to_string()))?,
            is_transferable: row
                .try_get("is_transferable")
                .map_err(|e| RegistryError::Storage(e.to_string()))?,
            created_at: row
                .try_get("created_at")
                .map_err(|e| RegistryError::Storage(e.to_string()))?,
        })
    }
}

#[async_trait::async_trait]
impl RegistryAdapter for PostgresAdapter {
    async fn execute_plan(
        &self,
        plan: &ExecutionPlan,
        holds: &[(u64, Uuid)],
    ) -> Result<(), RegistryError> {
        let mut tx = self
            .get_pool()
            .begin()
            .await
            .map_err(|e| RegistryError::Storage(e.to_string()))?;

        // Phase 1: lock the token rows and verify the expected holders.
        // Checked INSIDE the lock; this is the real double-move guard.
        for (asset_id, expected) in holds {
            let row = sqlx::query(
                r#"
                SELECT holder
                FROM registry_tokens
                WHERE asset = $1
                FOR UPDATE
                "#,
            )
            .bind(*asset_id as i64)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| RegistryError::Storage(e.to_string()))?;

            let holder: Option<Uuid> = match row {
                Some(row) => Some(
                    row.try_get("holder")
                        .map_err(|e| RegistryError::Storage(e.to_string()))?,
                ),
                None => None,
            };

            if holder != Some(*expected) {
                tx.rollback().await.ok();
                return Err(RegistryError::TransferFailed);
            }
        }

        // Phase 2: apply the operations
        for op in plan.operations() {
            match op {
                Operation::MoveToken { asset_id, to, .. } => {
                    self.move_token_internal_tx(&mut tx, *asset_id, *to).await?;
                }
                Operation::RecordTransfer { record } => {
                    self.record_transfer_internal_tx(&mut tx, record.clone())
                        .await?;
                }
            }
        }

        tx.commit()
            .await
            .map_err(|e| RegistryError::Storage(e.to_string()))?;
        Ok(())
    }

    async fn create_asset(&self, draft: AssetDraft) -> Result<Asset, RegistryError> {
        let mut tx = self
            .get_pool()
            .begin()
            .await
            .map_err(|e| RegistryError::Storage(e.to_string()))?;

        // The counter row is the serialization point for id allocation
        let next_id: i64 = sqlx::query_scalar(
            r#"
            SELECT next_id
            FROM registry_counter
            WHERE id = 0
            FOR UPDATE
            "#,
        )
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| RegistryError::Storage(e.to_string()))?;

        let asset = draft.into_asset(next_id as u64);

        sqlx::query(
            r#"
            INSERT INTO registry_assets
                (id, owner, total_supply, fractional_shares, metadata_uri, is_transferable, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(asset.id as i64)
        .bind(asset.owner)
        .bind(asset.total_supply as i64)
        .bind(asset.fractional_shares as i64)
        .bind(asset.metadata_uri.clone())
        .bind(asset.is_transferable)
        .bind(asset.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| RegistryError::Storage(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO registry_tokens (asset, holder, minted_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(asset.id as i64)
        .bind(asset.owner)
        .bind(asset.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| RegistryError::Storage(e.to_string()))?;

        sqlx::query(
            r#"
            UPDATE registry_counter
            SET next_id = next_id + 1
            WHERE id = 0
            "#,
        )
        .execute(&mut *tx)
        .await
        .map_err(|e| RegistryError::Storage(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| RegistryError::Storage(e.to_string()))?;

        Ok(asset)
    }

    async fn set_compliance(&self, entry: ComplianceEntry) -> Result<(), RegistryError> {
        sqlx::query(
            r#"
            INSERT INTO registry_compliance (asset, account, approved, updated_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (asset, account) DO UPDATE SET approved = $3, updated_at = $4
            "#,
        )
        .bind(entry.asset_id as i64)
        .bind(entry.account)
        .bind(entry.approved)
        .bind(entry.updated_at)
        .execute(&self.get_pool())
        .await
        .map_err(|e| RegistryError::Storage(e.to_string()))?;

        Ok(())
    }

    async fn get_asset(&self, asset_id: u64) -> Result<Option<Asset>, RegistryError> {
        let row = sqlx::query(
            r#"
            SELECT id, owner, total_supply, fractional_shares, metadata_uri, is_transferable, created_at
            FROM registry_assets
            WHERE id = $1
            "#,
        )
        .bind(asset_id as i64)
        .fetch_optional(&self.get_pool())
        .await
        .map_err(|e| RegistryError::Storage(e.to_string()))?;

        row.map(|row| self.row_to_asset(&row)).transpose()
    }

    async fn get_compliance(
        &self,
        asset_id: u64,
        account: Uuid,
    ) -> Result<Option<ComplianceEntry>, RegistryError> {
        let row = sqlx::query(
            r#"
            SELECT asset, account, approved, updated_at
            FROM registry_compliance
            WHERE asset = $1 AND account = $2
            "#,
        )
        .bind(asset_id as i64)
        .bind(account)
        .fetch_optional(&self.get_pool())
        .await
        .map_err(|e| RegistryError::Storage(e.to_string()))?;

        match row {
            None => Ok(None),
            Some(row) => Ok(Some(ComplianceEntry {
                asset_id: row
                    .try_get::<i64, _>("asset")
                    .map_err(|e| RegistryError::Storage(e.to_string()))?
                    as u64,
                account: row
                    .try_get("account")
                    .map_err(|e| RegistryError::Storage(e.to_string()))?,
                approved: row
                    .try_get("approved")
                    .map_err(|e| RegistryError::Storage(e.to_string()))?,
                updated_at: row
                    .try_get("updated_at")
                    .map_err(|e| RegistryError::Storage(e.to_string()))?,
            })),
        }
    }

    async fn token_holder(&self, asset_id: u64) -> Result<Option<Uuid>, RegistryError> {
        let holder: Option<Uuid> = sqlx::query_scalar(
            r#"
            SELECT holder
            FROM registry_tokens
            WHERE asset = $1
            "#,
        )
        .bind(asset_id as i64)
        .fetch_optional(&self.get_pool())
        .await
        .map_err(|e| RegistryError::Storage(e.to_string()))?;

        Ok(holder)
    }

    async fn next_asset_id(&self) -> Result<u64, RegistryError> {
        let next_id: i64 = sqlx::query_scalar(
            r#"
            SELECT next_id
            FROM registry_counter
            WHERE id = 0
            "#,
        )
        .fetch_one(&self.get_pool())
        .await
        .map_err(|e| RegistryError::Storage(e.to_string()))?;

        Ok(next_id as u64)
    }

    async fn get_transfer(
        &self,
        transfer_id: Uuid,
    ) -> Result<Option<TransferRecord>, RegistryError> {
        let row = sqlx::query(
            r#"
            SELECT id, asset, sender, receiver, created_at
            FROM registry_transfers
            WHERE id = $1
            "#,
        )
        .bind(transfer_id)
        .fetch_optional(&self.get_pool())
        .await
        .map_err(|e| RegistryError::Storage(e.to_string()))?;

        match row {
            None => Ok(None),
            Some(row) => Ok(Some(row_to_transfer(&row)?)),
        }
    }

    async fn transfers_for_asset(
        &self,
        asset_id: u64,
    ) -> Result<Vec<TransferRecord>, RegistryError> {
        let rows = sqlx::query(
            r#"
            SELECT id, asset, sender, receiver, created_at
            FROM registry_transfers
            WHERE asset = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(asset_id as i64)
        .fetch_all(&self.get_pool())
        .await
        .map_err(|e| RegistryError::Storage(e.to_string()))?;

        rows.iter().map(row_to_transfer).collect()
    }
}

fn row_to_transfer(row: &sqlx::postgres::PgRow) -> Result<TransferRecord, RegistryError> {
    Ok(TransferRecord {
        id: row
            .try_get("id")
            .map_err(|e| RegistryError::Storage(e.to_string()))?,
        asset_id: row
            .try_get::<i64, _>("asset")
            .map_err(|e| RegistryError::Storage(e.to_string()))? as u64,
        from: row
            .try_get("sender")
            .map_err(|e| RegistryError::Storage(e.to_string()))?,
        to: row
            .try_get("receiver")
            .map_err(|e| RegistryError::Storage(e.to_string()))?,
        created_at: row
            .try_get("created_at")
            .map_err(|e| RegistryError::Storage(e.to_string()))?,
    })
}
