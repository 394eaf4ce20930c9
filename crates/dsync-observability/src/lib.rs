mod destination_client;
mod sync;
mod task;

pub use destination_client::*;
pub use sync::*;
pub use task::*;
