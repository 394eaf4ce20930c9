use axum::{
    Json,
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
};

use super::{
    dto::{error::ErrorResponse, sync_destinations::SyncDestinationsResponse},
    tenant::tenant_from_headers,
};
use crate::controllers::http_api_controller::SyncDestinationsHttpApiControllerDeps;

pub(crate) struct SyncDestinationsHttpApiController;

impl SyncDestinationsHttpApiController {
    /// `PUT /v1/syncDestinations`: run one sync pass for the calling tenant.
    pub(crate) async fn handle_request(
        State(deps): State<SyncDestinationsHttpApiControllerDeps>,
        headers: HeaderMap,
    ) -> Response {
        let tenant_id = match tenant_from_headers(&headers, &deps.tenant_header) {
            Ok(tenant_id) => tenant_id,
            Err(response) => return response,
        };

        tracing::info!(tenant_id = %tenant_id, "On-demand destination sync requested");

        match deps.destination_sync.sync_tenant(&tenant_id).await {
            Ok(outcome) => Json(SyncDestinationsResponse::from(outcome)).into_response(),
            Err(error) => ErrorResponse::from_service_error(&error),
        }
    }
}
