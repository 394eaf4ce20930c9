use std::sync::Arc;

use axum::{extract::FromRef, http::HeaderName};

use crate::services::DestinationSync;

#[derive(Clone)]
pub(crate) struct HttpApiDeps {
    pub(crate) destination_sync: Arc<dyn DestinationSync>,
    pub(crate) tenant_header: HeaderName,
}

#[derive(Clone)]
pub(crate) struct SyncDestinationsHttpApiControllerDeps {
    pub(crate) destination_sync: Arc<dyn DestinationSync>,
    pub(crate) tenant_header: HeaderName,
}

impl FromRef<HttpApiDeps> for SyncDestinationsHttpApiControllerDeps {
    fn from_ref(input: &HttpApiDeps) -> Self {
        Self {
            destination_sync: Arc::clone(&input.destination_sync),
            tenant_header: input.tenant_header.clone(),
        }
    }
}

#[derive(Clone)]
pub(crate) struct DestinationsHttpApiControllerDeps {
    pub(crate) destination_sync: Arc<dyn DestinationSync>,
    pub(crate) tenant_header: HeaderName,
}

impl FromRef<HttpApiDeps> for DestinationsHttpApiControllerDeps {
    fn from_ref(input: &HttpApiDeps) -> Self {
        Self {
            destination_sync: Arc::clone(&input.destination_sync),
            tenant_header: input.tenant_header.clone(),
        }
    }
}
