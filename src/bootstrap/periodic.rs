use std::sync::Arc;

use dsync_repository::RepositoryManager;

use crate::{
    config::Config,
    leader_election::{AlwaysLeader, LeaderElector, LeaseElector},
    periodic_tasks::{self, DestinationSyncDeps},
    services::{DestinationSync, Services},
};

pub(crate) fn build_periodic_tasks_deps(
    config: &Config,
    repository: &RepositoryManager,
    services: &Services,
) -> Arc<periodic_tasks::PeriodicTasksDeps> {
    let leader_elector: Arc<dyn LeaderElector> = if config.sync.election_enabled {
        let elector = LeaseElector::new(
            repository.leader_lease_repository(),
            config.sync.lease_duration(),
        );
        tracing::info!(
            replica_id = %elector.replica_id(),
            lease_duration_secs = config.sync.lease_duration_secs,
            "Leader election enabled"
        );
        Arc::new(elector)
    } else {
        tracing::info!("Leader election disabled; this replica runs every tick");
        Arc::new(AlwaysLeader)
    };

    Arc::new(periodic_tasks::PeriodicTasksDeps {
        destination_sync: DestinationSyncDeps {
            destination_sync: Arc::clone(&services.destination_sync) as Arc<dyn DestinationSync>,
            leader_elector,
        },
    })
}
