use std::sync::Arc;

use sea_orm::{
    ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, sea_query::OnConflict,
};

use crate::{
    error::Result,
    models::tenant_label::{ActiveModel, Column, Entity},
};

#[derive(Clone)]
pub struct TenantLabelRepository {
    conn: Arc<DatabaseConnection>,
}

impl TenantLabelRepository {
    pub fn new(conn: Arc<DatabaseConnection>) -> Self {
        Self { conn }
    }

    /// Value of one label on a tenant, if set.
    pub async fn get_label(&self, tenant_id: &str, key: &str) -> Result<Option<String>> {
        Ok(Entity::find()
            .filter(Column::TenantId.eq(tenant_id))
            .filter(Column::Key.eq(key))
            .one(self.conn.as_ref())
            .await?
            .map(|label| label.value))
    }

    /// Tenants carrying `key`, ordered by tenant id.
    pub async fn tenants_with_label(&self, key: &str) -> Result<Vec<String>> {
        Ok(Entity::find()
            .select_only()
            .column(Column::TenantId)
            .filter(Column::Key.eq(key))
            .distinct()
            .order_by_asc(Column::TenantId)
            .into_tuple()
            .all(self.conn.as_ref())
            .await?)
    }

    pub async fn set_label(&self, tenant_id: &str, key: &str, value: &str) -> Result<()> {
        let model = ActiveModel {
            tenant_id: ActiveValue::Set(tenant_id.to_string()),
            key: ActiveValue::Set(key.to_string()),
            value: ActiveValue::Set(value.to_string()),
        };

        Entity::insert(model)
            .on_conflict(
                OnConflict::columns([Column::TenantId, Column::Key])
                    .update_column(Column::Value)
                    .to_owned(),
            )
            .exec_without_returning(self.conn.as_ref())
            .await?;

        Ok(())
    }
}

#[cfg(any(test, feature = "test-util"))]
mod test_support {
    use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

    use super::TenantLabelRepository;
    use crate::{
        error::Result,
        models::tenant_label::{Column, Entity},
    };

    impl TenantLabelRepository {
        pub async fn remove_label(&self, tenant_id: &str, key: &str) -> Result<u64> {
            let result = Entity::delete_many()
                .filter(Column::TenantId.eq(tenant_id))
                .filter(Column::Key.eq(key))
                .exec(self.conn.as_ref())
                .await?;
            Ok(result.rows_affected)
        }
    }
}
