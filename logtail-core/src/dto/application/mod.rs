//! Application DTOs returned by the cloud controller v3 API

use serde::Deserialize;

use crate::domain::application::Application;

/// Paginated application listing (`GET /v3/apps`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplicationList {
    #[serde(default)]
    pub resources: Vec<Application>,
}
