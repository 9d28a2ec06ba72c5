//! The CursorHome event loop.

use std::time::Instant;

use cursorhome_common::clock::interval_from_hz;
use cursorhome_common::config::AppConfig;
use cursorhome_common::error::CursorHomeResult;
use cursorhome_gesture::{build_shake_source, ShakeSource, SharedShakeSignal};
use cursorhome_highlight::{
    CoordinatorOutcome, CoordinatorSettings, CoordinatorState, HighlightCoordinator,
    SurfaceRenderer,
};
use cursorhome_model::CursorSample;
use cursorhome_platform_core::{DisplayTopology, PointerDevice};
use cursorhome_remote_monitor::{candidate_paths, parse_batch, LogTailer, LogWatcher};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use crate::command::EngineCommand;

/// Owns every CursorHome component and routes inputs between them.
pub struct Engine<R, P> {
    config: AppConfig,
    coordinator: HighlightCoordinator<R, P>,
    shake: Box<dyn ShakeSource>,
    /// Kept so a strategy change can rebuild `shake` around it.
    native: Option<SharedShakeSignal>,
    tailer: Option<LogTailer>,
    /// Bumped whenever the tailer is rebuilt so the loop re-creates its
    /// file watcher.
    remote_generation: u64,
    running: bool,
}

impl<R: SurfaceRenderer, P: PointerDevice> Engine<R, P> {
    pub fn new(config: AppConfig, topology: DisplayTopology, renderer: R, pointer: P) -> Self {
        Self::with_native_shake(config, topology, renderer, pointer, None)
    }

    /// Build an engine that may use a platform shake signal.
    pub fn with_native_shake(
        config: AppConfig,
        topology: DisplayTopology,
        renderer: R,
        pointer: P,
        native: Option<SharedShakeSignal>,
    ) -> Self {
        let config = config.sanitized();
        let shake = build_shake_source(&config.shake, topology.bounds(), native.clone());
        tracing::info!(
            strategy = shake.name(),
            sensitivity = config.shake.sensitivity,
            displays = topology.displays().len(),
            "Engine configured"
        );
        let coordinator = HighlightCoordinator::new(
            CoordinatorSettings::from(&config),
            topology,
            renderer,
            pointer,
        );
        Self {
            config,
            coordinator,
            shake,
            native,
            tailer: None,
            remote_generation: 0,
            running: true,
        }
    }

    /// Start following the remote log if enabled. Safe to call again; the
    /// previous tailer is replaced.
    pub fn start_remote(&mut self, now: Instant) {
        if let Some(mut tailer) = self.tailer.take() {
            tailer.stop();
        }
        self.remote_generation += 1;

        if !self.config.remote.enabled {
            tracing::debug!("Remote log monitoring disabled");
            return;
        }
        let mut tailer = LogTailer::from_settings(&self.config.remote);
        tailer.start(candidate_paths(&self.config.remote), now);
        self.tailer = Some(tailer);
    }

    /// Handle one command to completion.
    pub fn handle(&mut self, command: EngineCommand, now: Instant) -> Option<CoordinatorOutcome> {
        let outcome = match command {
            EngineCommand::FindCursor => Some(self.find(now)),
            EngineCommand::HideAll => Some(self.coordinator.hide_all()),
            EngineCommand::ApplySettings(config) => Some(self.apply_settings(*config, now)),
            EngineCommand::DisplaysChanged(topology) => {
                self.shake.set_display_bounds(topology.bounds());
                Some(self.coordinator.refresh_topology(topology))
            }
            EngineCommand::PointerMoved(sample) => self.on_pointer_sample(sample),
            EngineCommand::Shutdown => {
                let outcome = self.coordinator.hide_all();
                if let Some(tailer) = self.tailer.as_mut() {
                    tailer.stop();
                }
                self.running = false;
                tracing::info!("Engine shutting down");
                Some(outcome)
            }
        };

        if let Some(outcome) = &outcome {
            log_outcome(outcome);
        }
        outcome
    }

    /// Feed one pointer sample to shake detection.
    pub fn on_pointer_sample(&mut self, sample: CursorSample) -> Option<CoordinatorOutcome> {
        self.shake.on_sample(sample)?;
        let outcome = self.coordinator.on_shake(sample.timestamp);
        self.after_find(&outcome, sample.timestamp);
        Some(outcome)
    }

    /// Tracking tick. Also samples the pointer when configured to poll.
    pub fn tick(&mut self, now: Instant) -> CoordinatorOutcome {
        if self.config.tracking.poll_pointer {
            let point = self.coordinator.pointer().current_pointer_location();
            if let Some(outcome) = self.on_pointer_sample(CursorSample::new(point, now)) {
                log_outcome(&outcome);
            }
        }
        let outcome = self.coordinator.tick(now);
        if matches!(
            outcome,
            CoordinatorOutcome::Expired | CoordinatorOutcome::Transferred { .. } | CoordinatorOutcome::Failed { .. }
        ) {
            log_outcome(&outcome);
        }
        outcome
    }

    /// Read new remote log lines and apply any transitions.
    pub fn poll_remote(&mut self, now: Instant) -> Vec<CoordinatorOutcome> {
        let Some(tailer) = self.tailer.as_mut() else {
            return Vec::new();
        };
        let lines = tailer.poll(now);
        self.apply_log_lines(&lines, now)
    }

    /// Apply transitions found in `lines`, in order.
    pub fn apply_log_lines<S: AsRef<str>>(&mut self, lines: &[S], now: Instant) -> Vec<CoordinatorOutcome> {
        parse_batch(lines, now)
            .into_iter()
            .map(|transition| {
                let outcome = self.coordinator.on_transition(&transition, now);
                self.after_find(&outcome, now);
                log_outcome(&outcome);
                outcome
            })
            .collect()
    }

    pub fn coordinator(&self) -> &HighlightCoordinator<R, P> {
        &self.coordinator
    }

    pub fn coordinator_mut(&mut self) -> &mut HighlightCoordinator<R, P> {
        &mut self.coordinator
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn state(&self) -> CoordinatorState {
        self.coordinator.state()
    }

    pub fn tailer(&self) -> Option<&LogTailer> {
        self.tailer.as_ref()
    }

    pub fn shake_strategy(&self) -> &str {
        self.shake.name()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Run until `Shutdown` arrives or every command sender is dropped.
    pub async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<EngineCommand>,
    ) -> CursorHomeResult<()> {
        self.start_remote(Instant::now());

        let mut watched_generation = self.remote_generation;
        let mut watch = self.watch_remote();

        let mut tick_hz = self.config.tracking.tick_hz;
        let mut tick = tokio::time::interval(interval_from_hz(tick_hz));
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut rediscovery = tokio::time::interval(self.config.remote.rediscovery_interval());
        rediscovery.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(tick_hz, "Engine loop started");

        while self.running {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => {
                        self.handle(command, Instant::now());
                    }
                    None => {
                        tracing::debug!("All engine handles dropped");
                        self.handle(EngineCommand::Shutdown, Instant::now());
                    }
                },
                Some(()) = next_wake(&mut watch) => {
                    self.poll_remote(Instant::now());
                }
                _ = tick.tick() => {
                    self.tick(Instant::now());
                }
                _ = rediscovery.tick() => {
                    self.poll_remote(Instant::now());
                }
            }

            if self.remote_generation != watched_generation {
                watched_generation = self.remote_generation;
                watch = self.watch_remote();
                rediscovery = tokio::time::interval(self.config.remote.rediscovery_interval());
                rediscovery.set_missed_tick_behavior(MissedTickBehavior::Delay);
            }
            if self.config.tracking.tick_hz != tick_hz {
                tick_hz = self.config.tracking.tick_hz;
                tick = tokio::time::interval(interval_from_hz(tick_hz));
                tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
                tracing::debug!(tick_hz, "Tracking rate changed");
            }
        }

        tracing::info!("Engine loop stopped");
        Ok(())
    }

    fn find(&mut self, now: Instant) -> CoordinatorOutcome {
        let outcome = self.coordinator.find(now);
        self.after_find(&outcome, now);
        outcome
    }

    /// Our own warp looks exactly like a seam jump; keep it away from the
    /// shake detector.
    fn after_find(&mut self, outcome: &CoordinatorOutcome, now: Instant) {
        if matches!(
            outcome,
            CoordinatorOutcome::Recentered { .. } | CoordinatorOutcome::Created { .. }
        ) {
            self.shake.suppress_from(now);
        }
    }

    fn apply_settings(&mut self, config: AppConfig, now: Instant) -> CoordinatorOutcome {
        let config = config.sanitized();
        let remote_changed = config.remote != self.config.remote;

        if config.shake.strategy != self.config.shake.strategy {
            self.shake = build_shake_source(
                &config.shake,
                self.coordinator.topology().bounds(),
                self.native.clone(),
            );
            tracing::info!(strategy = self.shake.name(), "Shake strategy changed");
        } else {
            self.shake.reconfigure(&config.shake);
        }
        let outcome = self.coordinator.apply_settings(CoordinatorSettings::from(&config));
        self.config = config;

        if remote_changed {
            tracing::info!("Remote log settings changed, restarting monitor");
            self.start_remote(now);
        }
        tracing::info!("Settings applied");
        outcome
    }

    fn watch_remote(&self) -> Option<(LogWatcher, mpsc::UnboundedReceiver<()>)> {
        let tailer = self.tailer.as_ref()?;
        match LogWatcher::watch(tailer.candidates()) {
            Ok(watch) => Some(watch),
            Err(e) => {
                tracing::warn!(error = %e, "File watching unavailable, polling remote log");
                None
            }
        }
    }
}

async fn next_wake(watch: &mut Option<(LogWatcher, mpsc::UnboundedReceiver<()>)>) -> Option<()> {
    match watch {
        Some((_, rx)) => rx.recv().await,
        None => std::future::pending().await,
    }
}

fn log_outcome(outcome: &CoordinatorOutcome) {
    match outcome {
        CoordinatorOutcome::Ignored(reason) => tracing::debug!(%reason, "Request ignored"),
        CoordinatorOutcome::Failed { display: id, error } => {
            tracing::warn!(display = %id, error = %error, "Highlight failed")
        }
        CoordinatorOutcome::Tracked => {}
        other => tracing::debug!(outcome = ?other, "Coordinator"),
    }
}
