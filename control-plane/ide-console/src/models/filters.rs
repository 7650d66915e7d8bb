use ide_models::RunnerState;
use ide_storage::{ConnectorFilter, ImageFilter, RunnerFilter};
use serde::{Deserialize, Serialize};

use crate::models::PageRequest;

/// Query string accepted by `GET /api/v1/connectors`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConnectorQuery {
    pub q: Option<String>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
    pub provider: Option<String>,
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ImageQuery {
    pub q: Option<String>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
    pub active: Option<bool>,
    pub connector_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RunnerQuery {
    pub q: Option<String>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
    pub state: Option<RunnerState>,
    pub image_id: Option<String>,
    pub user: Option<String>,
}

impl ConnectorQuery {
    pub fn search(q: impl Into<String>) -> Self {
        Self {
            q: Some(q.into()),
            ..Default::default()
        }
    }

    pub fn page_request(&self, default_size: usize) -> PageRequest {
        PageRequest::new(self.page, self.per_page, default_size)
    }

    pub fn storage_filter(&self) -> ConnectorFilter {
        ConnectorFilter {
            provider: self.provider.clone(),
            active: self.active,
        }
    }
}

impl ImageQuery {
    pub fn search(q: impl Into<String>) -> Self {
        Self {
            q: Some(q.into()),
            ..Default::default()
        }
    }

    pub fn page_request(&self, default_size: usize) -> PageRequest {
        PageRequest::new(self.page, self.per_page, default_size)
    }

    pub fn storage_filter(&self) -> ImageFilter {
        ImageFilter {
            active: self.active,
            connector_id: self.connector_id.clone(),
        }
    }
}

impl RunnerQuery {
    pub fn search(q: impl Into<String>) -> Self {
        Self {
            q: Some(q.into()),
            ..Default::default()
        }
    }

    pub fn page_request(&self, default_size: usize) -> PageRequest {
        PageRequest::new(self.page, self.per_page, default_size)
    }

    pub fn storage_filter(&self) -> RunnerFilter {
        RunnerFilter {
            state: self.state,
            image_id: self.image_id.clone(),
            user: self.user.clone(),
        }
    }
}
