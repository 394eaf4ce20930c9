use axum::{
    Json,
    extract::{RawQuery, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use tokio_util::sync::CancellationToken;

use super::{dto::error::ErrorResponse, tenant::tenant_from_headers};
use crate::controllers::http_api_controller::DestinationsHttpApiControllerDeps;

pub(crate) struct DestinationsHttpApiController;

impl DestinationsHttpApiController {
    /// `GET /v1/destinations?name=a&name=b`: sensitive data for every name.
    pub(crate) async fn handle_request(
        State(deps): State<DestinationsHttpApiControllerDeps>,
        headers: HeaderMap,
        RawQuery(query): RawQuery,
    ) -> Response {
        let tenant_id = match tenant_from_headers(&headers, &deps.tenant_header) {
            Ok(tenant_id) => tenant_id,
            Err(response) => return response,
        };

        let names = requested_names(query.as_deref().unwrap_or_default());
        if names.is_empty() {
            return ErrorResponse::bad_request("At least one destination name is required");
        }

        // dropped with the request future when the client goes away
        let cancel = CancellationToken::new();
        let _cancel_on_drop = cancel.clone().drop_guard();

        match deps
            .destination_sync
            .fetch_sensitive_bulk(&tenant_id, &names, cancel)
            .await
        {
            Ok(body) => Json(body).into_response(),
            Err(error) => ErrorResponse::from_service_error(&error),
        }
    }
}

/// Names from repeated `name` parameters, each optionally comma-separated.
fn requested_names(query: &str) -> Vec<String> {
    url::form_urlencoded::parse(query.as_bytes())
        .filter(|(key, _)| key == "name")
        .flat_map(|(_, value)| {
            value
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect()
}
