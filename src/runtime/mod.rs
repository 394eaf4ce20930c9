mod runner;
mod shutdown;

use std::sync::Arc;

use crate::periodic_tasks;

pub(crate) struct RuntimeDeps {
    pub(crate) periodic_tasks_deps: Arc<periodic_tasks::PeriodicTasksDeps>,
}

pub(crate) use runner::run;
