pub(crate) mod error;
pub(crate) mod info;
pub(crate) mod sync_destinations;
