use serde::Serialize;

#[derive(Serialize)]
pub(crate) struct InfoResponse {
    pub name: &'static str,
    pub version: &'static str,
}

impl InfoResponse {
    pub(crate) fn new(name: &'static str, version: &'static str) -> Self {
        Self { name, version }
    }
}
