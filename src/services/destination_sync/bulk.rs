use std::{collections::BTreeMap, sync::Arc, time::Instant};

use dsync_destination_client::DestinationApi;
use dsync_observability::record_bulk_fetch;
use serde::Serialize;
use serde_json::value::RawValue;
use tokio::{sync::Semaphore, task::JoinSet};
use tokio_util::sync::CancellationToken;

use super::ServiceError;

#[derive(Serialize)]
struct BulkResponse<'a> {
    destinations: &'a BTreeMap<String, Box<RawValue>>,
}

/// Fetch every name with at most `parallelism` requests in flight.
///
/// The first failure, or cancellation of `cancel`, stops all outstanding
/// fetches; remaining tasks are aborted when the set is dropped.
pub(super) async fn fetch_all(
    client: Arc<dyn DestinationApi>,
    names: &[String],
    parallelism: usize,
    cancel: CancellationToken,
) -> Result<Box<RawValue>, ServiceError> {
    let started = Instant::now();
    let cancel = cancel.child_token();
    let permits = Arc::new(Semaphore::new(parallelism.max(1)));
    let mut tasks = JoinSet::new();

    let mut requested: Vec<&String> = names.iter().collect();
    requested.sort();
    requested.dedup();

    for name in &requested {
        let name = (*name).clone();
        let client = Arc::clone(&client);
        let permits = Arc::clone(&permits);
        let cancel = cancel.clone();

        tasks.spawn(async move {
            let _permit = tokio::select! {
                permit = permits.acquire_owned() => {
                    permit.map_err(|_| ServiceError::Cancelled)?
                }
                _ = cancel.cancelled() => return Err(ServiceError::Cancelled),
            };

            tokio::select! {
                result = client.fetch_sensitive(&name) => Ok((name, result?)),
                _ = cancel.cancelled() => Err(ServiceError::Cancelled),
            }
        });
    }

    let mut destinations = BTreeMap::new();
    while let Some(joined) = tasks.join_next().await {
        let result = joined.unwrap_or_else(|error| Err(ServiceError::Join(error.to_string())));
        match result {
            Ok((name, raw)) => {
                destinations.insert(name, raw);
            }
            Err(error) => {
                cancel.cancel();
                tasks.abort_all();
                record_bulk_fetch("error", requested.len(), started.elapsed());
                return Err(error);
            }
        }
    }

    record_bulk_fetch("ok", requested.len(), started.elapsed());

    let body = serde_json::to_string(&BulkResponse {
        destinations: &destinations,
    })?;
    Ok(RawValue::from_string(body)?)
}
