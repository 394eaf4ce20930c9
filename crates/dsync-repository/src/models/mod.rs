pub(crate) mod application;
pub(crate) mod bundle;
pub(crate) mod destination;
pub(crate) mod leader_lease;
pub(crate) mod tenant_label;
