use std::sync::Arc;

use sea_orm::{
    ActiveValue, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, SqlErr,
    sea_query::Expr,
};

use crate::{
    error::Result,
    models::leader_lease::{ActiveModel, Column, Entity},
};

#[derive(Clone)]
pub struct LeaderLeaseRepository {
    conn: Arc<DatabaseConnection>,
}

impl LeaderLeaseRepository {
    pub fn new(conn: Arc<DatabaseConnection>) -> Self {
        Self { conn }
    }

    /// Acquire or renew the lease `name` for `holder` until `expires_at_ms`.
    ///
    /// Succeeds when the lease is free, expired at `now_ms`, or already held by
    /// `holder`. Returns `false` when another holder owns a live lease.
    pub async fn try_acquire(
        &self,
        name: &str,
        holder: &str,
        now_ms: i64,
        expires_at_ms: i64,
    ) -> Result<bool> {
        let renewed = Entity::update_many()
            .col_expr(Column::Holder, Expr::value(holder))
            .col_expr(Column::ExpiresAt, Expr::value(expires_at_ms))
            .filter(Column::Name.eq(name))
            .filter(
                Condition::any()
                    .add(Column::Holder.eq(holder))
                    .add(Column::ExpiresAt.lt(now_ms)),
            )
            .exec(self.conn.as_ref())
            .await?;
        if renewed.rows_affected > 0 {
            return Ok(true);
        }

        // MySQL reports zero affected rows when a renewal writes identical values
        if let Some(lease) = Entity::find_by_id(name.to_string())
            .one(self.conn.as_ref())
            .await?
        {
            return Ok(lease.holder == holder);
        }

        let model = ActiveModel {
            name: ActiveValue::Set(name.to_string()),
            holder: ActiveValue::Set(holder.to_string()),
            expires_at: ActiveValue::Set(expires_at_ms),
        };
        match Entity::insert(model)
            .exec_without_returning(self.conn.as_ref())
            .await
        {
            Ok(_) => Ok(true),
            // another replica inserted first
            Err(error) if matches!(error.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Ok(false)
            }
            Err(error) => Err(error.into()),
        }
    }

    /// Give up the lease if `holder` owns it.
    pub async fn release(&self, name: &str, holder: &str) -> Result<bool> {
        let result = Entity::delete_many()
            .filter(Column::Name.eq(name))
            .filter(Column::Holder.eq(holder))
            .exec(self.conn.as_ref())
            .await?;
        Ok(result.rows_affected > 0)
    }
}

#[cfg(any(test, feature = "test-util"))]
mod test_support {
    use sea_orm::EntityTrait;

    use super::LeaderLeaseRepository;
    use crate::{error::Result, models::leader_lease::Entity};

    impl LeaderLeaseRepository {
        /// Holder and expiry (ms) of lease `name`, if any.
        pub async fn current_holder(&self, name: &str) -> Result<Option<(String, i64)>> {
            Ok(Entity::find_by_id(name.to_string())
                .one(self.conn.as_ref())
                .await?
                .map(|lease| (lease.holder, lease.expires_at)))
        }
    }
}
