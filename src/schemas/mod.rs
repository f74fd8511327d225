use std::collections::BTreeMap;

use serde::Serialize;

pub(crate) mod account;
pub(crate) mod allocation;
pub(crate) mod exam;
pub(crate) mod generated_exam;
pub(crate) mod payload;
pub(crate) mod question_bank;
pub(crate) mod response;

#[derive(Debug, Serialize)]
pub(crate) struct HealthResponse {
    pub(crate) service: String,
    pub(crate) status: &'static str,
    pub(crate) components: BTreeMap<&'static str, String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RootResponse {
    pub(crate) message: String,
    pub(crate) version: String,
    pub(crate) api_prefix: String,
}
