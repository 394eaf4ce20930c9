pub(crate) mod bundle_repository;
pub(crate) mod destination_repository;
pub(crate) mod leader_lease_repository;
pub(crate) mod tenant_label_repository;
