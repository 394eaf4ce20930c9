use std::sync::Arc;

use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

use crate::{
    error::{RepositoryError, Result},
    models::{
        application::{Column as ApplicationColumn, Entity as ApplicationEntity},
        bundle::{Column as BundleColumn, Entity as BundleEntity},
    },
    types::BundleMatchCriteria,
};

#[derive(Clone)]
pub struct BundleRepository {
    conn: Arc<DatabaseConnection>,
}

impl BundleRepository {
    pub fn new(conn: Arc<DatabaseConnection>) -> Self {
        Self { conn }
    }
}

/// Applications are selected by local tenant id when the destination carries
/// one, otherwise by (base URL, name). Their bundles match when the stored
/// correlation ids contain the destination's correlation id.
pub(crate) async fn matching_bundle_ids<C: ConnectionTrait>(
    conn: &C,
    tenant_id: &str,
    criteria: BundleMatchCriteria<'_>,
) -> Result<Vec<String>> {
    if criteria.x_correlation_id.is_empty() {
        return Ok(Vec::new());
    }

    let mut applications =
        ApplicationEntity::find().filter(ApplicationColumn::TenantId.eq(tenant_id));
    applications = if !criteria.x_system_tenant_id.is_empty() {
        applications.filter(ApplicationColumn::LocalTenantId.eq(criteria.x_system_tenant_id))
    } else {
        if criteria.x_system_base_url.is_empty() {
            return Ok(Vec::new());
        }
        applications
            .filter(ApplicationColumn::BaseUrl.eq(criteria.x_system_base_url))
            .filter(ApplicationColumn::Name.eq(criteria.x_system_tenant_name))
    };

    let application_ids: Vec<String> = applications
        .select_only()
        .column(ApplicationColumn::Id)
        .into_tuple()
        .all(conn)
        .await?;
    if application_ids.is_empty() {
        return Ok(Vec::new());
    }

    let bundles = BundleEntity::find()
        .filter(BundleColumn::TenantId.eq(tenant_id))
        .filter(BundleColumn::ApplicationId.is_in(application_ids))
        .order_by_asc(BundleColumn::Id)
        .all(conn)
        .await?;

    let mut matching = Vec::new();
    for bundle in bundles {
        let correlation_ids: Vec<String> =
            serde_json::from_str(&bundle.correlation_ids).map_err(|e| {
                RepositoryError::CorrelationIds {
                    bundle_id: bundle.id.clone(),
                    reason: e.to_string(),
                }
            })?;
        if correlation_ids
            .iter()
            .any(|id| id == criteria.x_correlation_id)
        {
            matching.push(bundle.id);
        }
    }

    Ok(matching)
}

/// Seeding and lookups used by tests; applications and bundles are owned by
/// the catalog service in production.
#[cfg(any(test, feature = "test-util"))]
mod test_support {
    use sea_orm::{ActiveValue, EntityTrait, sea_query::OnConflict};

    use super::{BundleRepository, matching_bundle_ids};
    use crate::{
        error::{RepositoryError, Result},
        models::{
            application::{
                ActiveModel as ApplicationActiveModel, Column as ApplicationColumn,
                Entity as ApplicationEntity,
            },
            bundle::{
                ActiveModel as BundleActiveModel, Column as BundleColumn, Entity as BundleEntity,
            },
        },
        types::{ApplicationEntry, BundleEntry, BundleMatchCriteria},
    };

    impl BundleRepository {
        /// Ids of the tenant's bundles a destination with `criteria` correlates to.
        pub async fn find_matching_bundle_ids(
            &self,
            tenant_id: &str,
            criteria: BundleMatchCriteria<'_>,
        ) -> Result<Vec<String>> {
            matching_bundle_ids(self.conn.as_ref(), tenant_id, criteria).await
        }

        pub async fn upsert_application(&self, entry: ApplicationEntry) -> Result<()> {
            let model = ApplicationActiveModel {
                id: ActiveValue::Set(entry.id),
                tenant_id: ActiveValue::Set(entry.tenant_id),
                name: ActiveValue::Set(entry.name),
                base_url: ActiveValue::Set(entry.base_url),
                local_tenant_id: ActiveValue::Set(entry.local_tenant_id),
                system_type: ActiveValue::Set(entry.system_type),
            };

            ApplicationEntity::insert(model)
                .on_conflict(
                    OnConflict::column(ApplicationColumn::Id)
                        .update_columns([
                            ApplicationColumn::TenantId,
                            ApplicationColumn::Name,
                            ApplicationColumn::BaseUrl,
                            ApplicationColumn::LocalTenantId,
                            ApplicationColumn::SystemType,
                        ])
                        .to_owned(),
                )
                .exec_without_returning(self.conn.as_ref())
                .await?;

            Ok(())
        }

        pub async fn upsert_bundle(&self, entry: BundleEntry) -> Result<()> {
            let correlation_ids = serde_json::to_string(&entry.correlation_ids).map_err(|e| {
                RepositoryError::CorrelationIds {
                    bundle_id: entry.id.clone(),
                    reason: e.to_string(),
                }
            })?;

            let model = BundleActiveModel {
                id: ActiveValue::Set(entry.id),
                tenant_id: ActiveValue::Set(entry.tenant_id),
                application_id: ActiveValue::Set(entry.application_id),
                name: ActiveValue::Set(entry.name),
                correlation_ids: ActiveValue::Set(correlation_ids),
            };

            BundleEntity::insert(model)
                .on_conflict(
                    OnConflict::column(BundleColumn::Id)
                        .update_columns([
                            BundleColumn::TenantId,
                            BundleColumn::ApplicationId,
                            BundleColumn::Name,
                            BundleColumn::CorrelationIds,
                        ])
                        .to_owned(),
                )
                .exec_without_returning(self.conn.as_ref())
                .await?;

            Ok(())
        }
    }
}
