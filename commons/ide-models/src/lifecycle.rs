//! Runner lifecycle engine.
//!
//! ```text
//! starting --ProvisionComplete--> ready --Assign--> awaiting_client
//!     --ClientConnected--> active
//! any non-terminated state --Terminate--> terminated
//! ```
//!
//! Transitions only move forward. `Terminate` on an already terminated runner
//! is accepted and leaves the record unchanged.

use crate::runner::{Runner, RunnerState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunnerEvent {
    /// The provisioning delay for a `starting` runner has elapsed.
    ProvisionComplete,
    /// A user has been bound to a pooled runner.
    Assign { user: String },
    /// The assigned user opened the session.
    ClientConnected,
    Terminate,
}

impl RunnerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            RunnerEvent::ProvisionComplete => "provision_complete",
            RunnerEvent::Assign { .. } => "assign",
            RunnerEvent::ClientConnected => "client_connected",
            RunnerEvent::Terminate => "terminate",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("cannot apply '{event}' to a runner in state '{from}'")]
    Invalid {
        from: RunnerState,
        event: &'static str,
    },

    #[error("assigned user cannot be empty")]
    EmptyUser,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Changed { from: RunnerState, to: RunnerState },
    Unchanged,
}

pub fn next_state(
    current: RunnerState,
    event: &RunnerEvent,
) -> Result<RunnerState, TransitionError> {
    use RunnerState::*;

    let next = match (current, event) {
        (Starting, RunnerEvent::ProvisionComplete) => Ready,
        (Ready, RunnerEvent::Assign { .. }) => AwaitingClient,
        (AwaitingClient, RunnerEvent::ClientConnected) => Active,
        (_, RunnerEvent::Terminate) => Terminated,
        _ => {
            return Err(TransitionError::Invalid {
                from: current,
                event: event.name(),
            });
        }
    };
    Ok(next)
}

pub fn runner_url(base: &str, runner_id: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), runner_id)
}

/// Applies `event` to `runner` in place.
///
/// The url is derived from `url_base` the first time the runner reaches
/// `ready` and is never cleared afterwards.
pub fn apply_event(
    runner: &mut Runner,
    event: RunnerEvent,
    url_base: &str,
) -> Result<Transition, TransitionError> {
    if let RunnerEvent::Assign { user } = &event {
        if user.trim().is_empty() {
            return Err(TransitionError::EmptyUser);
        }
    }

    let from = runner.state;
    let to = next_state(from, &event)?;
    if from == to {
        return Ok(Transition::Unchanged);
    }

    if to == RunnerState::Ready && runner.url.is_none() {
        runner.url = Some(runner_url(url_base, &runner.id));
    }
    if let RunnerEvent::Assign { user } = event {
        runner.user = Some(user);
    }
    runner.state = to;

    Ok(Transition::Changed { from, to })
}
