/// One persisted (destination × bundle) row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationRow {
    pub tenant_id: String,
    pub name: String,
    pub bundle_id: String,
    pub revision: String,
    pub destination_type: String,
    pub url: String,
    pub authentication: String,
    pub x_correlation_id: String,
    pub x_system_tenant_id: String,
    pub x_system_tenant_name: String,
    pub x_system_type: String,
    pub x_system_base_url: String,
}

/// Correlation attributes of a destination used to find its bundles.
#[derive(Debug, Clone, Copy)]
pub struct BundleMatchCriteria<'a> {
    pub x_correlation_id: &'a str,
    pub x_system_tenant_id: &'a str,
    pub x_system_tenant_name: &'a str,
    pub x_system_base_url: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationEntry {
    pub id: String,
    pub tenant_id: String,
    pub name: String,
    pub base_url: Option<String>,
    pub local_tenant_id: Option<String>,
    pub system_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleEntry {
    pub id: String,
    pub tenant_id: String,
    pub application_id: String,
    pub name: String,
    pub correlation_ids: Vec<String>,
}
