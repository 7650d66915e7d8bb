//! Delayed `starting -> ready` promotion of freshly launched runners.
//!
//! Every scheduled runner gets a child of the provisioner's root token.
//! Terminating the runner cancels its child token; shutting the provisioner
//! down (or dropping it) cancels the root and with it every pending task.

use std::{collections::HashMap, sync::Arc, time::Duration};

use ide_models::{RunnerEvent, RunnerState, Transition, apply_event};
use ide_storage::RunnerStorage;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    config::LifecycleConfig,
    errors::{ConsoleError, EntityKind},
};

pub struct Provisioner {
    storage: Arc<dyn RunnerStorage>,
    write_lock: Arc<Mutex<()>>,
    url_base: String,
    delay: Duration,
    token: CancellationToken,
    pending: Arc<Mutex<HashMap<String, CancellationToken>>>,
}

impl Provisioner {
    pub fn new(
        storage: Arc<dyn RunnerStorage>,
        write_lock: Arc<Mutex<()>>,
        config: &LifecycleConfig,
    ) -> Self {
        Self {
            storage,
            write_lock,
            url_base: config.url_base.clone(),
            delay: config.provision_delay,
            token: CancellationToken::new(),
            pending: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Spawns the provisioning task for `runner_id`. A no-op once the
    /// provisioner has been shut down.
    pub async fn schedule(&self, runner_id: &str) {
        if self.token.is_cancelled() {
            warn!(runner = %runner_id, "Provisioner is shut down, not scheduling");
            return;
        }

        let token = self.token.child_token();
        self.pending
            .lock()
            .await
            .insert(runner_id.to_string(), token.clone());

        let storage = self.storage.clone();
        let write_lock = self.write_lock.clone();
        let pending = self.pending.clone();
        let url_base = self.url_base.clone();
        let delay = self.delay;
        let runner_id = runner_id.to_string();

        debug!(runner = %runner_id, ?delay, "Scheduled provisioning");
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    debug!(runner = %runner_id, "Provisioning cancelled");
                }
                _ = tokio::time::sleep(delay) => {
                    if let Err(e) = complete_provisioning(
                        storage.as_ref(),
                        &write_lock,
                        &runner_id,
                        &url_base,
                    )
                    .await
                    {
                        warn!(runner = %runner_id, error = %e, "Provisioning failed");
                    }
                }
            }
            pending.lock().await.remove(&runner_id);
        });
    }

    /// Cancels the pending task of one runner. Returns whether one existed.
    pub async fn cancel(&self, runner_id: &str) -> bool {
        match self.pending.lock().await.remove(runner_id) {
            Some(token) => {
                token.cancel();
                debug!(runner = %runner_id, "Cancelled pending provisioning");
                true
            }
            None => false,
        }
    }

    pub async fn pending_count(&self) -> usize {
        self.pending.lock().await.len()
    }

    pub fn shutdown(&self) {
        if !self.token.is_cancelled() {
            info!("Shutting down runner provisioner");
            self.token.cancel();
        }
    }
}

impl Drop for Provisioner {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

async fn complete_provisioning(
    storage: &dyn RunnerStorage,
    write_lock: &Mutex<()>,
    runner_id: &str,
    url_base: &str,
) -> Result<Transition, ConsoleError> {
    let _guard = write_lock.lock().await;

    let mut runner = storage
        .get_runner(runner_id)
        .await?
        .ok_or_else(|| ConsoleError::not_found(EntityKind::Runner, runner_id))?;

    if runner.state != RunnerState::Starting {
        debug!(
            runner = %runner_id,
            state = %runner.state,
            "Runner left 'starting' before provisioning completed"
        );
        return Ok(Transition::Unchanged);
    }

    let transition =
        apply_event(&mut runner, RunnerEvent::ProvisionComplete, url_base)?;
    storage.store_runner(&runner).await?;
    info!(
        runner = %runner_id,
        url = runner.url.as_deref().unwrap_or_default(),
        "Runner is ready"
    );
    Ok(transition)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use ide_models::{Runner, VmImage, find_machine};
    use ide_storage::memory::MemoryRunnerStorage;

    fn config() -> LifecycleConfig {
        LifecycleConfig {
            url_base: "https://ide.example.com".to_string(),
            provision_delay: Duration::from_millis(500),
            default_duration_minutes: 180,
        }
    }

    async fn stored_runner(storage: &MemoryRunnerStorage) -> Runner {
        let image = VmImage::create(
            "Go Development".to_string(),
            String::new(),
            find_machine("t2.medium").unwrap(),
            true,
            None,
            Utc::now(),
        );
        let runner = Runner::launch(image, 60, None, Utc::now());
        storage.store_runner(&runner).await.unwrap();
        runner
    }

    #[tokio::test(start_paused = true)]
    async fn promotes_after_delay() {
        let storage = MemoryRunnerStorage::new();
        let runner = stored_runner(&storage).await;
        let provisioner = Provisioner::new(
            Arc::new(storage.clone()),
            Arc::new(Mutex::new(())),
            &config(),
        );

        provisioner.schedule(&runner.id).await;
        assert_eq!(provisioner.pending_count().await, 1);

        tokio::time::sleep(Duration::from_millis(499)).await;
        let early = storage.get_runner(&runner.id).await.unwrap().unwrap();
        assert_eq!(early.state, RunnerState::Starting);

        tokio::time::sleep(Duration::from_millis(2)).await;
        let ready = storage.get_runner(&runner.id).await.unwrap().unwrap();
        assert_eq!(ready.state, RunnerState::Ready);
        assert_eq!(
            ready.url,
            Some(format!("https://ide.example.com/{}", runner.id))
        );
        assert_eq!(provisioner.pending_count().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_runner_stays_starting() {
        let storage = MemoryRunnerStorage::new();
        let runner = stored_runner(&storage).await;
        let provisioner = Provisioner::new(
            Arc::new(storage.clone()),
            Arc::new(Mutex::new(())),
            &config(),
        );

        provisioner.schedule(&runner.id).await;
        assert!(provisioner.cancel(&runner.id).await);
        assert!(!provisioner.cancel(&runner.id).await);

        tokio::time::sleep(Duration::from_secs(2)).await;
        let after = storage.get_runner(&runner.id).await.unwrap().unwrap();
        assert_eq!(after.state, RunnerState::Starting);
        assert!(after.url.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_cancels_everything_and_rejects_new_work() {
        let storage = MemoryRunnerStorage::new();
        let first = stored_runner(&storage).await;
        let second = stored_runner(&storage).await;
        let provisioner = Provisioner::new(
            Arc::new(storage.clone()),
            Arc::new(Mutex::new(())),
            &config(),
        );

        provisioner.schedule(&first.id).await;
        provisioner.shutdown();
        provisioner.schedule(&second.id).await;
        assert!(provisioner.token.is_cancelled());

        tokio::time::sleep(Duration::from_secs(2)).await;
        for id in [&first.id, &second.id] {
            let runner = storage.get_runner(id).await.unwrap().unwrap();
            assert_eq!(runner.state, RunnerState::Starting);
        }
    }

    #[tokio::test]
    async fn completion_leaves_terminated_runner_alone() {
        let storage = MemoryRunnerStorage::new();
        let mut runner = stored_runner(&storage).await;
        runner.state = RunnerState::Terminated;
        storage.store_runner(&runner).await.unwrap();

        let lock = Mutex::new(());
        let t = complete_provisioning(
            &storage,
            &lock,
            &runner.id,
            "https://ide.example.com",
        )
        .await
        .unwrap();
        assert_eq!(t, Transition::Unchanged);
        let after = storage.get_runner(&runner.id).await.unwrap().unwrap();
        assert_eq!(after.state, RunnerState::Terminated);
        assert!(after.url.is_none());
    }
}
