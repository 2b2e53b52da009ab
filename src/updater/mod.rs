//! Waypoint updater node: the fixed-rate loop publishing final waypoints
pub mod shared;

use self::shared::SharedInputs;
use crate::config::UpdaterConfig;
use crate::control::{TrajectoryGenerator, TrajectoryWindow};
use crate::error::Result;
use crate::lifecycle::{LifecycleNode, LifecycleNodeBase, State};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

/// Publishes a fresh lookahead window on every tick once pose and path are known
#[derive(Debug)]
pub struct WaypointUpdater {
    base: LifecycleNodeBase,
    config: UpdaterConfig,
    inputs: Arc<SharedInputs>,
    generator: TrajectoryGenerator,
}

impl WaypointUpdater {
    /// Create an unconfigured updater reading from `inputs`
    pub fn new(config: UpdaterConfig, inputs: Arc<SharedInputs>) -> Self {
        let generator = TrajectoryGenerator::new(&config);
        WaypointUpdater {
            base: LifecycleNodeBase::new("waypoint_updater"),
            config,
            inputs,
            generator,
        }
    }

    pub fn config(&self) -> &UpdaterConfig {
        &self.config
    }

    pub fn inputs(&self) -> &Arc<SharedInputs> {
        &self.inputs
    }

    pub fn state(&self) -> State {
        self.base.get_state()
    }

    /// Evaluate one tick.
    ///
    /// Returns None, without logging, while the node is not active or the
    /// pose or reference path has not arrived yet.
    pub fn tick(&self) -> Option<TrajectoryWindow> {
        if self.base.get_state() != State::Active {
            return None;
        }
        let inputs = self.inputs.snapshot()?;
        Some(
            self.generator
                .generate(&inputs.pose, &inputs.path, inputs.stop_line),
        )
    }

    /// Run the update loop at the configured rate until `tx` is closed.
    ///
    /// Each window is offered with `try_send`; if the consumer has not taken
    /// the previous one the new window is dropped.
    pub async fn run(self: Arc<Self>, tx: mpsc::Sender<TrajectoryWindow>) {
        let mut ticker = interval(self.config.tick_period());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!("Waypoint updater running at {} Hz", self.config.rate_hz);

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = tx.closed() => break,
            }

            let Some(window) = self.tick() else {
                continue;
            };
            debug!(
                start = window.start_index,
                len = window.len(),
                "publishing final waypoints"
            );

            match tx.try_send(window) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => debug!("consumer busy, dropping window"),
                Err(TrySendError::Closed(_)) => break,
            }
        }

        info!("Waypoint updater stopped");
    }
}

impl LifecycleNode for WaypointUpdater {
    fn on_configure(&self) -> Result<()> {
        self.config.validate()?;
        self.base.transition(State::Unconfigured, State::Inactive)
    }

    fn on_activate(&self) -> Result<()> {
        self.base.transition(State::Inactive, State::Active)
    }

    fn on_deactivate(&self) -> Result<()> {
        self.base.transition(State::Active, State::Inactive)
    }

    fn on_cleanup(&self) -> Result<()> {
        self.base.transition(State::Inactive, State::Unconfigured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{PathPoint, StopLine, VehiclePose};
    use std::time::Duration;

    fn inputs_with_path(n: usize) -> Arc<SharedInputs> {
        let inputs = Arc::new(SharedInputs::new());
        let points = (0..n)
            .map(|i| PathPoint::planar(i as f64, 0.0, 0.0, 10.0))
            .collect();
        inputs.load_path(points).unwrap();
        inputs
    }

    fn active_updater(config: UpdaterConfig, inputs: Arc<SharedInputs>) -> WaypointUpdater {
        let updater = WaypointUpdater::new(config, inputs);
        updater.on_configure().unwrap();
        updater.on_activate().unwrap();
        updater
    }

    #[test]
    fn test_tick_skips_until_inputs_ready() {
        let inputs = Arc::new(SharedInputs::new());
        let updater = active_updater(UpdaterConfig::default(), Arc::clone(&inputs));
        assert!(updater.tick().is_none());

        inputs.set_pose(VehiclePose::planar(5.0, 0.0, 0.0));
        assert!(updater.tick().is_none());

        let points = (0..200)
            .map(|i| PathPoint::planar(i as f64, 0.0, 0.0, 10.0))
            .collect();
        inputs.load_path(points).unwrap();
        let window = updater.tick().unwrap();
        assert_eq!(window.start_index, 5);
        assert_eq!(window.len(), 80);
    }

    #[test]
    fn test_tick_skips_while_inactive() {
        let inputs = inputs_with_path(200);
        inputs.set_pose(VehiclePose::planar(5.0, 0.0, 0.0));
        let updater = WaypointUpdater::new(UpdaterConfig::default(), inputs);
        assert!(updater.tick().is_none());

        updater.on_configure().unwrap();
        assert!(updater.tick().is_none());
        updater.on_activate().unwrap();
        assert!(updater.tick().is_some());
        updater.on_deactivate().unwrap();
        assert!(updater.tick().is_none());
    }

    #[test]
    fn test_configure_rejects_invalid_config() {
        let config = UpdaterConfig {
            rate_hz: 0.0,
            ..UpdaterConfig::default()
        };
        let updater = WaypointUpdater::new(config, Arc::new(SharedInputs::new()));
        assert!(updater.on_configure().is_err());
        assert_eq!(updater.state(), State::Unconfigured);
    }

    #[test]
    fn test_each_tick_sees_latest_stop_line() {
        let inputs = inputs_with_path(200);
        inputs.set_pose(VehiclePose::planar(10.0, 0.0, 0.0));
        let updater = active_updater(UpdaterConfig::default(), Arc::clone(&inputs));

        inputs.set_stop_line(30);
        let stopped = updater.tick().unwrap();
        assert_eq!(stopped.points[17].speed, 0.0);

        inputs.set_stop_line(-1);
        let free = updater.tick().unwrap();
        assert!(free.speeds().all(|s| s == 10.0));
        assert_eq!(inputs.stop_line(), StopLine::None);
    }

    #[tokio::test]
    async fn test_run_emits_windows() {
        let inputs = inputs_with_path(300);
        inputs.set_pose(VehiclePose::planar(42.0, 0.0, 0.0));
        let config = UpdaterConfig {
            rate_hz: 200.0,
            ..UpdaterConfig::default()
        };
        let updater = Arc::new(active_updater(config, Arc::clone(&inputs)));

        let (tx, mut rx) = mpsc::channel(1);
        let handle = tokio::spawn(Arc::clone(&updater).run(tx));

        let first = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("no window within timeout")
            .expect("channel closed");
        assert_eq!(first.start_index, 42);

        inputs.set_pose(VehiclePose::planar(100.5, 0.0, 0.0));
        let moved = loop {
            let window = tokio::time::timeout(Duration::from_secs(2), rx.recv())
                .await
                .expect("no window within timeout")
                .expect("channel closed");
            if window.start_index != 42 {
                break window;
            }
        };
        assert_eq!(moved.start_index, 101);

        drop(rx);
        tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("loop did not stop")
            .unwrap();
    }

    #[tokio::test]
    async fn test_run_idles_without_inputs() {
        let config = UpdaterConfig {
            rate_hz: 200.0,
            ..UpdaterConfig::default()
        };
        let updater = Arc::new(active_updater(config, Arc::new(SharedInputs::new())));
        let (tx, mut rx) = mpsc::channel(1);
        let handle = tokio::spawn(Arc::clone(&updater).run(tx));

        let result = tokio::time::timeout(Duration::from_millis(100), rx.recv()).await;
        assert!(result.is_err());

        drop(rx);
        handle.await.unwrap();
    }

    #[test]
    fn test_tick_skips_non_finite_pose() {
        let inputs = inputs_with_path(200);
        let updater = active_updater(UpdaterConfig::default(), Arc::clone(&inputs));

        inputs.set_pose(VehiclePose::planar(f64::NAN, 0.0, 0.0));
        assert!(updater.tick().is_none());

        inputs.set_pose(VehiclePose::planar(12.0, 0.0, 0.0));
        assert_eq!(updater.tick().unwrap().start_index, 12);
    }

    async fn next_window(rx: &mut mpsc::Receiver<TrajectoryWindow>) -> TrajectoryWindow {
        tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("no window within timeout")
            .expect("channel closed")
    }

    #[tokio::test]
    async fn test_run_survives_non_finite_pose() {
        let inputs = inputs_with_path(300);
        let config = UpdaterConfig {
            rate_hz: 200.0,
            ..UpdaterConfig::default()
        };
        let updater = Arc::new(active_updater(config, Arc::clone(&inputs)));
        let (tx, mut rx) = mpsc::channel(1);
        let handle = tokio::spawn(Arc::clone(&updater).run(tx));

        inputs.set_pose(VehiclePose::planar(f64::NAN, f64::NAN, 0.0));
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!handle.is_finished());
        assert!(rx.try_recv().is_err());

        inputs.set_pose(VehiclePose::planar(60.0, 0.0, 0.0));
        assert_eq!(next_window(&mut rx).await.start_index, 60);

        drop(rx);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_deactivate_running_loop() {
        let inputs = inputs_with_path(300);
        inputs.set_pose(VehiclePose::planar(20.0, 0.0, 0.0));
        let config = UpdaterConfig {
            rate_hz: 200.0,
            ..UpdaterConfig::default()
        };
        let updater = Arc::new(active_updater(config, Arc::clone(&inputs)));
        let (tx, mut rx) = mpsc::channel(1);
        let handle = tokio::spawn(Arc::clone(&updater).run(tx));

        assert_eq!(next_window(&mut rx).await.start_index, 20);

        updater.on_deactivate().unwrap();
        assert_eq!(updater.state(), State::Inactive);
        // A window queued before the transition may still be buffered
        tokio::time::sleep(Duration::from_millis(20)).await;
        while rx.try_recv().is_ok() {}

        let idle = tokio::time::timeout(Duration::from_millis(100), rx.recv()).await;
        assert!(idle.is_err(), "inactive node kept publishing");
        assert!(!handle.is_finished());

        updater.on_activate().unwrap();
        assert_eq!(next_window(&mut rx).await.start_index, 20);

        updater.on_deactivate().unwrap();
        updater.on_cleanup().unwrap();
        assert_eq!(updater.state(), State::Unconfigured);

        drop(rx);
        handle.await.unwrap();
    }
}
