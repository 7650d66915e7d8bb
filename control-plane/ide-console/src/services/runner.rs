use std::sync::Arc;

use chrono::Utc;
use ide_models::{
    MAX_SESSION_MINUTES, MIN_SESSION_MINUTES, NewRunner, Runner, RunnerEvent,
    RunnerState, Transition, apply_event,
};
use ide_storage::{ImageStorage, RunnerFilter, RunnerStorage};
use tokio::sync::Mutex;
use tracing::{debug, info};
use validator::Validate;

use crate::{
    config::{LifecycleConfig, ViewConfig},
    errors::{ConsoleError, EntityKind},
    models::{ConnectInfo, Page, RunnerQuery, search_page},
    services::Provisioner,
};

pub struct RunnerService {
    storage: Arc<dyn RunnerStorage>,
    images: Arc<dyn ImageStorage>,
    provisioner: Provisioner,
    write_lock: Arc<Mutex<()>>,
    lifecycle: LifecycleConfig,
    views: ViewConfig,
}

impl RunnerService {
    pub fn new(
        storage: Arc<dyn RunnerStorage>,
        images: Arc<dyn ImageStorage>,
        lifecycle: LifecycleConfig,
        views: ViewConfig,
    ) -> Self {
        let write_lock = Arc::new(Mutex::new(()));
        let provisioner =
            Provisioner::new(storage.clone(), write_lock.clone(), &lifecycle);
        Self {
            storage,
            images,
            provisioner,
            write_lock,
            lifecycle,
            views,
        }
    }

    pub async fn health(&self) -> Result<(), ConsoleError> {
        self.storage.health().await.map_err(Into::into)
    }

    /// Launches a runner from an active image. The runner starts in
    /// `starting` and is promoted to `ready` once the provisioning delay
    /// has elapsed.
    pub async fn add_runner(
        &self,
        input: NewRunner,
    ) -> Result<Runner, ConsoleError> {
        let duration = input
            .duration_minutes
            .unwrap_or(self.lifecycle.default_duration_minutes);
        if !(MIN_SESSION_MINUTES..=MAX_SESSION_MINUTES).contains(&duration) {
            return Err(ConsoleError::Validation(format!(
                "Duration must be between {} and {} minutes, got {}",
                MIN_SESSION_MINUTES, MAX_SESSION_MINUTES, duration
            )));
        }
        input.validate()?;

        let image = self
            .images
            .get_image(&input.image_id)
            .await?
            .ok_or_else(|| {
                ConsoleError::not_found(EntityKind::Image, &input.image_id)
            })?;
        if !image.active {
            return Err(ConsoleError::Validation(format!(
                "Image {} is inactive",
                image.identifier
            )));
        }

        let user = input
            .user
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());
        let runner = Runner::launch(image, duration, user, Utc::now());
        info!(
            runner = %runner.id,
            image = %runner.image.identifier,
            duration_minutes = duration,
            "Launching runner"
        );
        self.storage.store_runner(&runner).await?;
        self.provisioner.schedule(&runner.id).await;
        Ok(runner)
    }

    pub async fn get_runner(&self, id: &str) -> Result<Runner, ConsoleError> {
        debug!(runner = %id, "Getting runner");
        self.storage
            .get_runner(id)
            .await?
            .ok_or_else(|| ConsoleError::not_found(EntityKind::Runner, id))
    }

    pub async fn list_runners(
        &self,
        query: RunnerQuery,
    ) -> Result<Page<Runner>, ConsoleError> {
        info!("Listing runners with query: {:?}", query);
        let runners = self.storage.list_runners(query.storage_filter()).await?;
        Ok(search_page(
            runners,
            query.q.as_deref(),
            query.page_request(self.views.page_size),
        ))
    }

    /// Terminates a runner. Terminating an already terminated runner
    /// returns it unchanged.
    pub async fn terminate_runner(
        &self,
        id: &str,
    ) -> Result<Runner, ConsoleError> {
        let runner = {
            let _guard = self.write_lock.lock().await;
            let mut runner = self.get_runner(id).await?;
            let transition = apply_event(
                &mut runner,
                RunnerEvent::Terminate,
                self.url_base(),
            )?;
            match transition {
                Transition::Changed { from, .. } => {
                    self.storage.store_runner(&runner).await?;
                    info!(runner = %id, from = %from, "Terminated runner");
                }
                Transition::Unchanged => {
                    debug!(runner = %id, "Runner already terminated");
                }
            }
            runner
        };
        self.provisioner.cancel(id).await;
        Ok(runner)
    }

    /// Binds `user` to a `ready` runner, moving it to `awaiting_client`.
    pub async fn assign_runner(
        &self,
        id: &str,
        user: &str,
    ) -> Result<Runner, ConsoleError> {
        let event = RunnerEvent::Assign {
            user: user.trim().to_string(),
        };
        let runner = self.apply(id, event).await?;
        info!(runner = %id, user = %user.trim(), "Assigned runner");
        Ok(runner)
    }

    pub async fn activate_runner(
        &self,
        id: &str,
    ) -> Result<Runner, ConsoleError> {
        let runner = self.apply(id, RunnerEvent::ClientConnected).await?;
        info!(runner = %id, "Client connected to runner");
        Ok(runner)
    }

    pub async fn connect(&self, id: &str) -> Result<ConnectInfo, ConsoleError> {
        let runner = self.get_runner(id).await?;
        if !runner.state.can_connect() {
            return Err(ConsoleError::InvalidState(format!(
                "runner {} is {}; connecting requires {} or {}",
                id,
                runner.state,
                RunnerState::AwaitingClient,
                RunnerState::Active
            )));
        }
        let url = runner.url.ok_or_else(|| {
            ConsoleError::Internal(format!("runner {} has no url", id))
        })?;
        info!(runner = %id, "Connecting to runner");
        Ok(ConnectInfo {
            runner_id: runner.id,
            url,
            state: runner.state,
        })
    }

    /// Schedules provisioning for every stored runner still in `starting`.
    pub async fn resume_provisioning(&self) -> Result<usize, ConsoleError> {
        let starting = self
            .storage
            .list_runners(RunnerFilter {
                state: Some(RunnerState::Starting),
                ..Default::default()
            })
            .await?;
        for runner in &starting {
            self.provisioner.schedule(&runner.id).await;
        }
        if !starting.is_empty() {
            info!(count = starting.len(), "Resumed runner provisioning");
        }
        Ok(starting.len())
    }

    pub async fn pending_provisioning(&self) -> usize {
        self.provisioner.pending_count().await
    }

    /// Cancels all pending provisioning. Runners left in `starting` stay
    /// there.
    pub fn shutdown(&self) {
        self.provisioner.shutdown();
    }

    async fn apply(
        &self,
        id: &str,
        event: RunnerEvent,
    ) -> Result<Runner, ConsoleError> {
        let _guard = self.write_lock.lock().await;
        let mut runner = self.get_runner(id).await?;
        if let Transition::Changed { from, to } =
            apply_event(&mut runner, event, self.url_base())?
        {
            debug!(runner = %id, from = %from, to = %to, "Runner transition");
            self.storage.store_runner(&runner).await?;
        }
        Ok(runner)
    }

    fn url_base(&self) -> &str {
        &self.lifecycle.url_base
    }
}
