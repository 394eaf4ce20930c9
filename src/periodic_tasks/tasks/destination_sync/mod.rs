//! Recurring destination synchronization for all subscribed tenants.
//!
//! Each tick runs only on the elected leader, syncs up to `parallel_tenants`
//! tenants at a time, each under its own deadline, and completes once every
//! tenant worker has finished.

mod config;
mod task;

pub(crate) use config::DestinationSyncConfig;
pub(crate) use task::DestinationSyncTask;
