use axum::{
    http::{HeaderMap, HeaderName},
    response::Response,
};

use super::dto::error::ErrorResponse;

/// Tenant id from the identity header; missing or blank is a bad request.
pub(super) fn tenant_from_headers(
    headers: &HeaderMap,
    tenant_header: &HeaderName,
) -> Result<String, Response> {
    headers
        .get(tenant_header)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|tenant| !tenant.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            ErrorResponse::bad_request(format!("Missing tenant in header '{tenant_header}'"))
        })
}
