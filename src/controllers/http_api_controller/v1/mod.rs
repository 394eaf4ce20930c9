pub(crate) mod destinations;
pub(crate) mod dto;
pub(crate) mod info;
pub(crate) mod sync_destinations;
mod tenant;
