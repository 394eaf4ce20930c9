use std::sync::Arc;

use crate::{leader_election::LeaderElector, services::DestinationSync};

#[derive(Clone)]
pub(crate) struct DestinationSyncDeps {
    pub(crate) destination_sync: Arc<dyn DestinationSync>,
    pub(crate) leader_elector: Arc<dyn LeaderElector>,
}

#[derive(Clone)]
pub(crate) struct PeriodicTasksDeps {
    pub(crate) destination_sync: DestinationSyncDeps,
}
