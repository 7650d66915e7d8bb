use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// Service health report; `components` carries one entry per checked
/// dependency with its error message when unhealthy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub service: String,
    pub version: String,
    pub components: BTreeMap<String, String>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl HealthReport {
    pub fn new(service: &str, version: &str) -> Self {
        Self {
            status: HealthStatus::Healthy,
            service: service.to_string(),
            version: version.to_string(),
            components: BTreeMap::new(),
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn component_ok(mut self, name: &str) -> Self {
        self.components.insert(name.to_string(), "ok".to_string());
        self
    }

    /// Any failing component marks the whole report unhealthy.
    pub fn component_failed(mut self, name: &str, message: String) -> Self {
        self.status = HealthStatus::Unhealthy;
        self.components.insert(name.to_string(), message);
        self
    }

    pub fn is_healthy(&self) -> bool {
        self.status == HealthStatus::Healthy
    }
}
