//! Application domain types

use serde::Deserialize;

/// An application as reported by the cloud controller
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Application {
    pub guid: String,
    pub name: String,
    #[serde(default)]
    pub state: String,
}
