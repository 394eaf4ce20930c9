//! Cluster-wide leadership for recurring jobs.
//!
//! A job body runs on a replica only while `try_lead` returns true for it.
//! Leases are renewed on every tick and expire on their own if the holder
//! disappears, so a crashed leader is replaced after one lease duration.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use dsync_repository::LeaderLeaseRepository;
use uuid::Uuid;

#[async_trait]
pub(crate) trait LeaderElector: Send + Sync {
    /// Acquire or renew leadership for `job`. Errors count as "not leader".
    async fn try_lead(&self, job: &str) -> bool;

    /// Give up leadership for `job`, if held.
    async fn step_down(&self, _job: &str) {}
}

/// Single-replica deployments: every replica leads every job.
pub(crate) struct AlwaysLeader;

#[async_trait]
impl LeaderElector for AlwaysLeader {
    async fn try_lead(&self, _job: &str) -> bool {
        true
    }
}

/// Leadership backed by the `leader_lease` table.
pub(crate) struct LeaseElector {
    leases: LeaderLeaseRepository,
    replica_id: String,
    lease_duration: Duration,
}

impl LeaseElector {
    pub(crate) fn new(leases: LeaderLeaseRepository, lease_duration: Duration) -> Self {
        Self::with_replica_id(leases, Uuid::new_v4().to_string(), lease_duration)
    }

    pub(crate) fn with_replica_id(
        leases: LeaderLeaseRepository,
        replica_id: String,
        lease_duration: Duration,
    ) -> Self {
        Self {
            leases,
            replica_id,
            lease_duration,
        }
    }

    pub(crate) fn replica_id(&self) -> &str {
        &self.replica_id
    }
}

#[async_trait]
impl LeaderElector for LeaseElector {
    async fn try_lead(&self, job: &str) -> bool {
        let now_ms = Utc::now().timestamp_millis();
        let lease_ms = i64::try_from(self.lease_duration.as_millis()).unwrap_or(i64::MAX);
        let expires_at_ms = now_ms.saturating_add(lease_ms);

        match self
            .leases
            .try_acquire(job, &self.replica_id, now_ms, expires_at_ms)
            .await
        {
            Ok(true) => true,
            Ok(false) => {
                tracing::debug!(job, replica_id = %self.replica_id, "Lease held by another replica");
                false
            }
            Err(error) => {
                tracing::warn!(
                    job,
                    replica_id = %self.replica_id,
                    error = %error,
                    "Failed to acquire leader lease"
                );
                false
            }
        }
    }

    async fn step_down(&self, job: &str) {
        match self.leases.release(job, &self.replica_id).await {
            Ok(true) => tracing::info!(job, replica_id = %self.replica_id, "Released leader lease"),
            Ok(false) => {}
            Err(error) => tracing::warn!(
                job,
                replica_id = %self.replica_id,
                error = %error,
                "Failed to release leader lease"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use dsync_repository::RepositoryManager;
    use sea_orm::{ConnectOptions, Database};

    use super::*;

    async fn leases() -> LeaderLeaseRepository {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1).min_connections(1);
        RepositoryManager::from_connection(Database::connect(opt).await.unwrap())
            .await
            .unwrap()
            .leader_lease_repository()
    }

    #[tokio::test]
    async fn only_one_replica_leads_a_job() {
        let leases = leases().await;
        let first = LeaseElector::new(leases.clone(), Duration::from_secs(60));
        let second = LeaseElector::new(leases.clone(), Duration::from_secs(60));

        assert!(first.try_lead("destination_sync").await);
        assert!(!second.try_lead("destination_sync").await);
        // renewal by the holder keeps the lease
        assert!(first.try_lead("destination_sync").await);
        // other jobs are elected independently
        assert!(second.try_lead("other_job").await);

        let (holder, _) = leases
            .current_holder("destination_sync")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(holder, first.replica_id());
    }

    #[tokio::test]
    async fn stepping_down_hands_over_leadership() {
        let leases = leases().await;
        let first = LeaseElector::new(leases.clone(), Duration::from_secs(60));
        let second = LeaseElector::new(leases, Duration::from_secs(60));

        assert!(first.try_lead("destination_sync").await);
        first.step_down("destination_sync").await;

        assert!(second.try_lead("destination_sync").await);
    }

    #[tokio::test]
    async fn expired_lease_is_taken_over() {
        let leases = leases().await;
        let stale = LeaseElector::with_replica_id(leases.clone(), "stale".to_string(), Duration::ZERO);
        let fresh = LeaseElector::new(leases, Duration::from_secs(60));

        assert!(stale.try_lead("destination_sync").await);
        tokio::time::sleep(Duration::from_millis(5)).await;

        assert!(fresh.try_lead("destination_sync").await);
        assert!(!stale.try_lead("destination_sync").await);
    }

    #[tokio::test]
    async fn always_leader_leads() {
        assert!(AlwaysLeader.try_lead("anything").await);
        AlwaysLeader.step_down("anything").await;
    }
}
