pub(crate) mod deps;
pub(crate) mod router;
mod v1;

pub(crate) use deps::{
    DestinationsHttpApiControllerDeps, HttpApiDeps, SyncDestinationsHttpApiControllerDeps,
};
