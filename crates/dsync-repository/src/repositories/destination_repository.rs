use std::{sync::Arc, time::Instant};

use chrono::Utc;
use sea_orm::{
    ActiveValue, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, QueryFilter,
    TransactionTrait, sea_query::OnConflict,
};

use crate::{
    error::Result,
    models::destination::{ActiveModel, Column, Entity},
    observability::record_repository_query,
    repositories::bundle_repository::matching_bundle_ids,
    types::{BundleMatchCriteria, DestinationRow},
};

const REPOSITORY: &str = "destination";

#[derive(Clone)]
pub struct DestinationRepository {
    conn: Arc<DatabaseConnection>,
}

impl DestinationRepository {
    pub fn new(conn: Arc<DatabaseConnection>) -> Self {
        Self { conn }
    }

    /// Open a write batch. Nothing written through it is visible until
    /// [`DestinationBatch::commit`]; dropping the batch rolls back.
    pub async fn begin(&self) -> Result<DestinationBatch> {
        Ok(DestinationBatch {
            txn: self.conn.begin().await?,
            upserted: 0,
        })
    }

    /// Delete every row of `tenant_id` whose revision differs from `revision`.
    pub async fn delete_stale(&self, tenant_id: &str, revision: &str) -> Result<u64> {
        let started = Instant::now();
        let result = async {
            let txn = self.conn.begin().await?;
            let deleted = Entity::delete_many()
                .filter(Column::TenantId.eq(tenant_id))
                .filter(Column::Revision.ne(revision))
                .exec(&txn)
                .await?;
            txn.commit().await?;
            Ok(deleted.rows_affected)
        }
        .await;

        match &result {
            Ok(rows) => record_repository_query(
                REPOSITORY,
                "delete_stale",
                "ok",
                started.elapsed(),
                Some(*rows),
            ),
            Err(_) => record_repository_query(
                REPOSITORY,
                "delete_stale",
                "error",
                started.elapsed(),
                None,
            ),
        }

        result
    }
}

/// Writes for one page of a sync pass, applied atomically.
pub struct DestinationBatch {
    txn: DatabaseTransaction,
    upserted: u64,
}

impl DestinationBatch {
    /// Bundle lookup that reads through the batch's transaction.
    pub async fn matching_bundle_ids(
        &self,
        tenant_id: &str,
        criteria: BundleMatchCriteria<'_>,
    ) -> Result<Vec<String>> {
        matching_bundle_ids(&self.txn, tenant_id, criteria).await
    }

    /// Insert the row or overwrite the existing (tenant, name, bundle) row.
    pub async fn upsert(&mut self, row: DestinationRow) -> Result<()> {
        let model = ActiveModel {
            tenant_id: ActiveValue::Set(row.tenant_id),
            name: ActiveValue::Set(row.name),
            bundle_id: ActiveValue::Set(row.bundle_id),
            revision: ActiveValue::Set(row.revision),
            destination_type: ActiveValue::Set(row.destination_type),
            url: ActiveValue::Set(row.url),
            authentication: ActiveValue::Set(row.authentication),
            x_correlation_id: ActiveValue::Set(row.x_correlation_id),
            x_system_tenant_id: ActiveValue::Set(row.x_system_tenant_id),
            x_system_tenant_name: ActiveValue::Set(row.x_system_tenant_name),
            x_system_type: ActiveValue::Set(row.x_system_type),
            x_system_base_url: ActiveValue::Set(row.x_system_base_url),
            updated_at: ActiveValue::Set(Utc::now().timestamp()),
        };

        Entity::insert(model)
            .on_conflict(
                OnConflict::columns([Column::TenantId, Column::Name, Column::BundleId])
                    .update_columns([
                        Column::Revision,
                        Column::DestinationType,
                        Column::Url,
                        Column::Authentication,
                        Column::XCorrelationId,
                        Column::XSystemTenantId,
                        Column::XSystemTenantName,
                        Column::XSystemType,
                        Column::XSystemBaseUrl,
                        Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.txn)
            .await?;

        self.upserted += 1;
        Ok(())
    }

    /// Commit the batch, returning the number of upserted rows.
    pub async fn commit(self) -> Result<u64> {
        let started = Instant::now();
        let upserted = self.upserted;
        let result = self.txn.commit().await;

        let status = if result.is_ok() { "ok" } else { "error" };
        record_repository_query(
            REPOSITORY,
            "commit_batch",
            status,
            started.elapsed(),
            Some(upserted),
        );

        result?;
        Ok(upserted)
    }
}

#[cfg(any(test, feature = "test-util"))]
mod test_support {
    use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

    use super::DestinationRepository;
    use crate::{
        error::Result,
        models::destination::{Column, Entity, Model},
        types::DestinationRow,
    };

    impl DestinationRepository {
        /// Stored rows of a tenant ordered by name, then bundle.
        pub async fn list_for_tenant(&self, tenant_id: &str) -> Result<Vec<DestinationRow>> {
            Ok(Entity::find()
                .filter(Column::TenantId.eq(tenant_id))
                .order_by_asc(Column::Name)
                .order_by_asc(Column::BundleId)
                .all(self.conn.as_ref())
                .await?
                .into_iter()
                .map(to_row)
                .collect())
        }
    }

    fn to_row(model: Model) -> DestinationRow {
        DestinationRow {
            tenant_id: model.tenant_id,
            name: model.name,
            bundle_id: model.bundle_id,
            revision: model.revision,
            destination_type: model.destination_type,
            url: model.url,
            authentication: model.authentication,
            x_correlation_id: model.x_correlation_id,
            x_system_tenant_id: model.x_system_tenant_id,
            x_system_tenant_name: model.x_system_tenant_name,
            x_system_type: model.x_system_type,
            x_system_base_url: model.x_system_base_url,
        }
    }
}
