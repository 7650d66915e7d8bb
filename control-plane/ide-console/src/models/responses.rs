use chrono::{DateTime, Utc};
use ide_models::{Runner, RunnerState};
use serde::{Deserialize, Serialize};

/// Runner as returned by the API, with the operator actions it permits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunnerView {
    #[serde(flatten)]
    pub runner: Runner,
    pub expired: bool,
    pub can_connect: bool,
    pub can_terminate: bool,
}

impl RunnerView {
    pub fn new(runner: Runner, now: DateTime<Utc>) -> Self {
        Self {
            expired: runner.is_expired(now),
            can_connect: runner.state.can_connect(),
            can_terminate: runner.state.can_terminate(),
            runner,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConnectInfo {
    pub runner_id: String,
    pub url: String,
    pub state: RunnerState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignRequest {
    pub user: String,
}

/// Draft image submitted for a build-log preview.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildPreviewRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub machine_identifier: String,
    pub connector_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BuildLog {
    pub lines: Vec<String>,
}
