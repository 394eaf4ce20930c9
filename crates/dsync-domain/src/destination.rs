use serde::{Deserialize, Serialize};

/// Product type that receives S/4HANA-specific correlation defaults.
pub const S4HANA_CLOUD_PRODUCT: &str = "SAP S/4HANA Cloud";

/// Destination as returned by the remote destination registry.
///
/// Every field is optional on the wire; missing fields decode as empty strings
/// so that normalization can apply its defaulting rules uniformly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationRecord {
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "Type", default)]
    pub destination_type: String,
    #[serde(rename = "URL", default)]
    pub url: String,
    #[serde(rename = "Authentication", default)]
    pub authentication: String,
    #[serde(rename = "product.name", default)]
    pub product_name: String,
    #[serde(rename = "communicationScenarioId", default)]
    pub communication_scenario_id: String,
    #[serde(rename = "XFSystemName", default)]
    pub xf_system_name: String,
    #[serde(rename = "x-correlation-id", default)]
    pub x_correlation_id: String,
    #[serde(rename = "x-system-id", default)]
    pub x_system_tenant_id: String,
    #[serde(rename = "x-system-name", default)]
    pub x_system_tenant_name: String,
    #[serde(rename = "x-system-type", default)]
    pub x_system_type: String,
    #[serde(rename = "x-system-base-url", default)]
    pub x_system_base_url: String,
}

/// Validated destination ready to be correlated with bundles and persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedDestination {
    pub name: String,
    pub destination_type: String,
    pub url: String,
    pub authentication: String,
    pub x_correlation_id: String,
    pub x_system_tenant_id: String,
    pub x_system_tenant_name: String,
    pub x_system_type: String,
    pub x_system_base_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_registry_field_names() {
        let json = r#"{
            "Name": "s4-dest",
            "Type": "HTTP",
            "URL": "https://my54321-api.s4.com",
            "Authentication": "BasicAuthentication",
            "product.name": "SAP S/4HANA Cloud",
            "communicationScenarioId": "SAP_COM_0108",
            "XFSystemName": "S4 Prod",
            "x-system-id": "tenant-1"
        }"#;

        let record: DestinationRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.name, "s4-dest");
        assert_eq!(record.destination_type, "HTTP");
        assert_eq!(record.product_name, S4HANA_CLOUD_PRODUCT);
        assert_eq!(record.communication_scenario_id, "SAP_COM_0108");
        assert_eq!(record.xf_system_name, "S4 Prod");
        assert_eq!(record.x_system_tenant_id, "tenant-1");
        assert!(record.x_correlation_id.is_empty());
        assert!(record.x_system_base_url.is_empty());
    }

    #[test]
    fn ignores_unknown_fields() {
        let json = r#"{"Name": "d", "ProxyType": "Internet", "tokenServiceURL": "x"}"#;
        let record: DestinationRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.name, "d");
    }
}
