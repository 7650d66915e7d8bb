use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::{connector::ConnectorSummary, ids, machine::Machine};

/// Reusable VM template: a machine profile plus metadata and, optionally, the
/// connector it is provisioned through.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VmImage {
    pub identifier: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub machine: Machine,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_connector: Option<ConnectorSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewVmImage {
    #[validate(custom(function = "non_blank_name"))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[validate(length(min = 1, message = "Machine identifier cannot be empty"))]
    pub machine_identifier: String,
    pub connector_id: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

fn non_blank_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::new("blank")
            .with_message("Image name cannot be empty".into()));
    }
    Ok(())
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ImagePatch {
    #[validate(custom(function = "non_blank_name"))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(length(min = 1, message = "Machine identifier cannot be empty"))]
    pub machine_identifier: Option<String>,
    pub active: Option<bool>,
}

impl VmImage {
    pub fn create(
        name: String,
        description: String,
        machine: Machine,
        active: bool,
        cloud_connector: Option<ConnectorSummary>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            identifier: ids::image_id(),
            name,
            description,
            machine,
            active,
            created_at: now,
            updated_at: now,
            cloud_connector,
        }
    }

    /// Merges a patch whose machine has already been resolved against the
    /// catalog. `updated_at` is refreshed even when nothing else changed.
    pub fn apply_patch(
        &mut self,
        patch: ImagePatch,
        machine: Option<Machine>,
        now: DateTime<Utc>,
    ) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(machine) = machine {
            self.machine = machine;
        }
        if let Some(active) = patch.active {
            self.active = active;
        }
        self.touch(now);
    }

    pub fn set_active(&mut self, active: bool, now: DateTime<Utc>) {
        self.active = active;
        self.touch(now);
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        // Keep updated_at strictly increasing even when the clock has not
        // moved since the previous write.
        self.updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at + chrono::Duration::microseconds(1)
        };
    }
}
