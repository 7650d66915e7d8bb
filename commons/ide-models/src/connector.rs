use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::ids;

pub const DEFAULT_CONNECTOR_LOGO: &str = "/images/brand/default-logo.svg";

struct ProviderInfo {
    key: &'static str,
    display_name: &'static str,
    logo: &'static str,
}

const KNOWN_PROVIDERS: &[ProviderInfo] = &[
    ProviderInfo {
        key: "aws",
        display_name: "AWS",
        logo: "/images/brand/aws-logo.svg",
    },
    ProviderInfo {
        key: "azure",
        display_name: "Azure",
        logo: "/images/brand/azure-logo.svg",
    },
    ProviderInfo {
        key: "gcp",
        display_name: "GCP",
        logo: "/images/brand/gcp-logo.svg",
    },
];

fn provider_info(provider: &str) -> Option<&'static ProviderInfo> {
    KNOWN_PROVIDERS.iter().find(|p| p.key == provider)
}

/// Display name for a provider key; unknown providers keep their raw key.
pub fn provider_display_name(provider: &str) -> String {
    provider_info(provider)
        .map(|p| p.display_name.to_string())
        .unwrap_or_else(|| provider.to_string())
}

pub fn provider_logo(provider: &str) -> &'static str {
    provider_info(provider)
        .map(|p| p.logo)
        .unwrap_or(DEFAULT_CONNECTOR_LOGO)
}

/// Stored credential/configuration for a cloud provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CloudConnector {
    pub id: String,
    pub provider: String,
    pub name: String,
    pub added: DateTime<Utc>,
    pub region: String,
    pub service_type: String,
    pub active: bool,
    pub access_key: String,
    pub secret_key: String,
    pub logo: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewCloudConnector {
    #[validate(length(min = 1, message = "Provider cannot be empty"))]
    pub provider: String,
    #[serde(default)]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "Region cannot be empty"))]
    pub region: String,
    #[serde(alias = "type")]
    #[validate(length(min = 1, message = "Service type cannot be empty"))]
    pub service_type: String,
    #[serde(default)]
    pub status: Option<bool>,
    #[validate(length(min = 1, message = "Access key cannot be empty"))]
    pub access_key: String,
    #[validate(length(min = 1, message = "Secret key cannot be empty"))]
    pub secret_key: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ConnectorPatch {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "Region cannot be empty"))]
    pub region: Option<String>,
    #[serde(default, alias = "type")]
    #[validate(length(min = 1, message = "Service type cannot be empty"))]
    pub service_type: Option<String>,
    pub active: Option<bool>,
    #[validate(length(min = 1, message = "Access key cannot be empty"))]
    pub access_key: Option<String>,
    #[validate(length(min = 1, message = "Secret key cannot be empty"))]
    pub secret_key: Option<String>,
}

/// Credential-free copy of a connector, embedded by value into images.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConnectorSummary {
    pub id: String,
    pub name: String,
    pub provider: String,
    pub region: String,
    pub service_type: String,
    pub logo: String,
}

impl CloudConnector {
    pub fn create(input: NewCloudConnector, now: DateTime<Utc>) -> Self {
        let name = input
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| provider_display_name(&input.provider));
        let logo = provider_logo(&input.provider).to_string();

        Self {
            id: ids::connector_id(),
            provider: input.provider,
            name,
            added: now,
            region: input.region,
            service_type: input.service_type,
            active: input.status.unwrap_or(false),
            access_key: input.access_key,
            secret_key: input.secret_key,
            logo,
        }
    }

    pub fn apply_patch(&mut self, patch: ConnectorPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(region) = patch.region {
            self.region = region;
        }
        if let Some(service_type) = patch.service_type {
            self.service_type = service_type;
        }
        if let Some(active) = patch.active {
            self.active = active;
        }
        if let Some(access_key) = patch.access_key {
            self.access_key = access_key;
        }
        if let Some(secret_key) = patch.secret_key {
            self.secret_key = secret_key;
        }
    }

    pub fn summary(&self) -> ConnectorSummary {
        ConnectorSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            provider: self.provider.clone(),
            region: self.region.clone(),
            service_type: self.service_type.clone(),
            logo: self.logo.clone(),
        }
    }

    /// Copy suitable for API responses: the secret key is masked.
    pub fn redacted(&self) -> Self {
        Self {
            secret_key: mask_secret(&self.secret_key),
            ..self.clone()
        }
    }
}

/// Masks everything but the last four characters.
pub fn mask_secret(secret: &str) -> String {
    let total = secret.chars().count();
    if total <= 4 {
        return "*".repeat(total);
    }
    let tail: String = secret.chars().skip(total - 4).collect();
    format!("{}{}", "*".repeat(total - 4), tail)
}
