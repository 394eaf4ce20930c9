//! Conversion of raw registry records into validated local destinations.
//!
//! Defaulting rules for S/4HANA Cloud destinations:
//! - `x_system_type` falls back to the product name
//! - `x_correlation_id` is derived from the communication scenario
//! - `x_system_tenant_name` falls back to `XFSystemName`
//! - `x_system_base_url` is derived from the destination URL host

use thiserror::Error;
use url::Url;

use crate::destination::{DestinationRecord, NormalizedDestination, S4HANA_CLOUD_PRODUCT};

const S4_CORRELATION_PREFIX: &str = "sap.s4:communicationScenario:";
const API_HOST_SUFFIX: &str = "-api";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("destination name is empty")]
    MissingName,

    #[error("invalid destination URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("host of URL '{0}' has fewer than 2 labels")]
    InsufficientHostLabels(String),
}

/// Normalize a registry record. Records that fail here must not be persisted.
pub fn normalize(record: DestinationRecord) -> Result<NormalizedDestination, NormalizeError> {
    if record.name.trim().is_empty() {
        return Err(NormalizeError::MissingName);
    }

    if !record.url.is_empty() {
        parse_url(&record.url)?;
    }

    let mut destination = NormalizedDestination {
        name: record.name,
        destination_type: record.destination_type,
        url: record.url,
        authentication: record.authentication,
        x_correlation_id: record.x_correlation_id,
        x_system_tenant_id: record.x_system_tenant_id,
        x_system_tenant_name: record.x_system_tenant_name,
        x_system_type: record.x_system_type,
        x_system_base_url: record.x_system_base_url,
    };

    if destination.x_system_type.is_empty() {
        destination.x_system_type = record.product_name;
    }

    if destination.x_system_type != S4HANA_CLOUD_PRODUCT {
        return Ok(destination);
    }

    if destination.x_correlation_id.is_empty() {
        destination.x_correlation_id =
            format!("{S4_CORRELATION_PREFIX}{}", record.communication_scenario_id);
    }

    if destination.x_system_tenant_name.is_empty() {
        destination.x_system_tenant_name = record.xf_system_name;
    }

    if destination.x_system_base_url.is_empty() && !destination.url.is_empty() {
        destination.x_system_base_url = derive_base_url(&destination.url)?;
    }

    Ok(destination)
}

/// Derive the system base URL from an S/4HANA API URL.
///
/// `https://my54321-api.s4.com:443/sap/opu` becomes `https://my54321.s4.com`;
/// port, path and query are dropped.
pub fn derive_base_url(raw: &str) -> Result<String, NormalizeError> {
    let url = parse_url(raw)?;
    let host = url.host_str().unwrap_or_default();

    let mut labels: Vec<&str> = host.split('.').collect();
    if labels.len() < 2 {
        return Err(NormalizeError::InsufficientHostLabels(raw.to_string()));
    }

    labels[0] = labels[0].strip_suffix(API_HOST_SUFFIX).unwrap_or(labels[0]);
    let host = labels.join(".");

    Ok(format!("{}://{}", url.scheme(), host))
}

fn parse_url(raw: &str) -> Result<Url, NormalizeError> {
    let url = Url::parse(raw).map_err(|e| NormalizeError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(NormalizeError::InvalidUrl {
            url: raw.to_string(),
            reason: "missing host".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s4_record() -> DestinationRecord {
        DestinationRecord {
            name: "s4".to_string(),
            destination_type: "HTTP".to_string(),
            url: "https://my54321-api.s4.com".to_string(),
            product_name: S4HANA_CLOUD_PRODUCT.to_string(),
            communication_scenario_id: "SAP_COM_0108".to_string(),
            xf_system_name: "S4 Production".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn s4_defaults_are_applied() {
        let destination = normalize(s4_record()).unwrap();

        assert_eq!(destination.x_system_type, S4HANA_CLOUD_PRODUCT);
        assert_eq!(
            destination.x_correlation_id,
            "sap.s4:communicationScenario:SAP_COM_0108"
        );
        assert_eq!(destination.x_system_tenant_name, "S4 Production");
        assert_eq!(destination.x_system_base_url, "https://my54321.s4.com");
    }

    #[test]
    fn explicit_s4_values_are_kept() {
        let record = DestinationRecord {
            x_correlation_id: "custom.correlation".to_string(),
            x_system_tenant_name: "explicit".to_string(),
            x_system_base_url: "https://base.example.com".to_string(),
            ..s4_record()
        };

        let destination = normalize(record).unwrap();
        assert_eq!(destination.x_correlation_id, "custom.correlation");
        assert_eq!(destination.x_system_tenant_name, "explicit");
        assert_eq!(destination.x_system_base_url, "https://base.example.com");
    }

    #[test]
    fn non_s4_destinations_pass_through() {
        let record = DestinationRecord {
            name: "plain".to_string(),
            url: "https://my-api.example.com".to_string(),
            product_name: "Other Product".to_string(),
            xf_system_name: "ignored".to_string(),
            ..Default::default()
        };

        let destination = normalize(record).unwrap();
        assert_eq!(destination.x_system_type, "Other Product");
        assert!(destination.x_correlation_id.is_empty());
        assert!(destination.x_system_tenant_name.is_empty());
        assert!(destination.x_system_base_url.is_empty());
    }

    #[test]
    fn explicit_system_type_wins_over_product_name() {
        let record = DestinationRecord {
            x_system_type: "Custom".to_string(),
            ..s4_record()
        };

        let destination = normalize(record).unwrap();
        assert_eq!(destination.x_system_type, "Custom");
        assert!(destination.x_correlation_id.is_empty());
    }

    #[test]
    fn malformed_url_is_rejected() {
        let record = DestinationRecord {
            url: "not a url".to_string(),
            ..s4_record()
        };
        assert!(matches!(
            normalize(record),
            Err(NormalizeError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn single_label_host_is_rejected_for_s4() {
        let record = DestinationRecord {
            url: "https://localhost/path".to_string(),
            ..s4_record()
        };
        assert_eq!(
            normalize(record),
            Err(NormalizeError::InsufficientHostLabels(
                "https://localhost/path".to_string()
            ))
        );
    }

    #[test]
    fn missing_name_is_rejected() {
        let record = DestinationRecord {
            name: "  ".to_string(),
            ..s4_record()
        };
        assert_eq!(normalize(record), Err(NormalizeError::MissingName));
    }

    #[test]
    fn base_url_drops_port_and_path() {
        assert_eq!(
            derive_base_url("http://host-api.example.com:8443/sap/opu/odata").unwrap(),
            "http://host.example.com"
        );
    }

    #[test]
    fn base_url_without_api_suffix_is_unchanged() {
        assert_eq!(
            derive_base_url("https://host.example.com").unwrap(),
            "https://host.example.com"
        );
    }
}
