use dsync_repository::TenantLabelRepository;

use super::ServiceError;

/// Where a tenant's destinations live in the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TenantCredentials {
    pub(crate) region: String,
    pub(crate) subdomain: String,
}

/// Maps a tenant to its registry region and subdomain through tenant labels.
#[derive(Clone)]
pub(crate) struct TenantCredentialResolver {
    labels: TenantLabelRepository,
    subdomain_label_key: String,
    region_label_key: String,
}

impl TenantCredentialResolver {
    pub(crate) fn new(
        labels: TenantLabelRepository,
        subdomain_label_key: String,
        region_label_key: String,
    ) -> Self {
        Self {
            labels,
            subdomain_label_key,
            region_label_key,
        }
    }

    /// Tenants with a subscription, i.e. carrying the subdomain label.
    pub(crate) async fn subscribed_tenants(&self) -> Result<Vec<String>, ServiceError> {
        Ok(self
            .labels
            .tenants_with_label(&self.subdomain_label_key)
            .await?)
    }

    pub(crate) async fn resolve(&self, tenant_id: &str) -> Result<TenantCredentials, ServiceError> {
        let subdomain = self
            .labels
            .get_label(tenant_id, &self.subdomain_label_key)
            .await?
            .filter(|value| !value.is_empty())
            .ok_or_else(|| ServiceError::TenantNotFound(tenant_id.to_string()))?;

        let region = self
            .labels
            .get_label(tenant_id, &self.region_label_key)
            .await?
            .filter(|value| !value.is_empty())
            .ok_or_else(|| ServiceError::TenantNotFound(tenant_id.to_string()))?;

        Ok(TenantCredentials { region, subdomain })
    }
}
