use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{ids, image::VmImage};

pub const MIN_SESSION_MINUTES: u32 = 1;
pub const MAX_SESSION_MINUTES: u32 = 1440;

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd,
    Ord,
)]
#[serde(rename_all = "snake_case")]
pub enum RunnerState {
    Starting,
    Ready,
    AwaitingClient,
    Active,
    Terminated,
}

impl RunnerState {
    pub const ALL: [RunnerState; 5] = [
        RunnerState::Starting,
        RunnerState::Ready,
        RunnerState::AwaitingClient,
        RunnerState::Active,
        RunnerState::Terminated,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RunnerState::Starting => "starting",
            RunnerState::Ready => "ready",
            RunnerState::AwaitingClient => "awaiting_client",
            RunnerState::Active => "active",
            RunnerState::Terminated => "terminated",
        }
    }

    /// Human readable label, as shown in runner listings.
    pub fn label(&self) -> &'static str {
        match self {
            RunnerState::Starting => "Starting",
            RunnerState::Ready => "Ready",
            RunnerState::AwaitingClient => "Awaiting Client",
            RunnerState::Active => "Active",
            RunnerState::Terminated => "Terminated",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RunnerState::Terminated)
    }

    pub fn can_connect(&self) -> bool {
        matches!(self, RunnerState::Active | RunnerState::AwaitingClient)
    }

    pub fn can_terminate(&self) -> bool {
        !self.is_terminal()
    }
}

impl std::fmt::Display for RunnerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RunnerState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RunnerState::ALL
            .into_iter()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| format!("invalid runner state: '{s}'"))
    }
}

/// Ephemeral VM session instantiated from an image.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Runner {
    pub id: String,
    /// `None` for pool runners that have not been assigned yet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// Snapshot of the image at launch time; later image edits do not apply.
    pub image: VmImage,
    pub key_pair_name: String,
    pub state: RunnerState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_start: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_end: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewRunner {
    #[validate(length(min = 1, message = "Image id cannot be empty"))]
    pub image_id: String,
    #[validate(range(
        min = 1,
        max = 1440,
        message = "Duration must be between 1 and 1440 minutes"
    ))]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub user: Option<String>,
}

/// Start and end of a session of `duration_minutes` starting at `start`.
pub fn session_window(
    start: DateTime<Utc>,
    duration_minutes: u32,
) -> (DateTime<Utc>, DateTime<Utc>) {
    (start, start + Duration::minutes(i64::from(duration_minutes)))
}

impl Runner {
    /// A freshly launched runner: `starting`, no url, session window fixed.
    pub fn launch(
        image: VmImage,
        duration_minutes: u32,
        user: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let (session_start, session_end) =
            session_window(now, duration_minutes);
        Self {
            id: ids::runner_id(),
            user,
            image,
            key_pair_name: ids::key_pair_name(now),
            state: RunnerState::Starting,
            url: None,
            session_start: Some(session_start),
            session_end: Some(session_end),
            duration_minutes: Some(duration_minutes),
            created_at: now,
        }
    }

    /// Informational only; nothing terminates a runner when this turns true.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        !self.state.is_terminal()
            && self.session_end.is_some_and(|end| end <= now)
    }
}
