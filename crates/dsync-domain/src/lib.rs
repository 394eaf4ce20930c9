mod destination;
mod normalize;
mod revision;

pub use destination::{DestinationRecord, NormalizedDestination, S4HANA_CLOUD_PRODUCT};
pub use normalize::{NormalizeError, derive_base_url, normalize};
pub use revision::Revision;
