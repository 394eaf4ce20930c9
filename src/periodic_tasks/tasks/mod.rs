pub(crate) mod destination_sync;
