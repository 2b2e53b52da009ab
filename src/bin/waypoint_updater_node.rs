use anyhow::{Context, Result};
use std::f64::consts::PI;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{info, warn};
use waypoint_updater::lifecycle::LifecycleNode;
use waypoint_updater::{
    PathPoint, SharedInputs, TrajectoryWindow, UpdaterConfig, VehiclePose, WaypointUpdater,
};

// Simulated track
const STRAIGHT_LENGTH: f64 = 200.0;
const TURN_RADIUS: f64 = 40.0;
const WAYPOINT_SPACING: f64 = 1.0;
const CRUISE_SPEED: f64 = 11.1;

// Simulated traffic light
const STOP_LINE_INDEX: i64 = 150;
const LIGHT_CYCLE: Duration = Duration::from_secs(12);

const RUN_TIME: Duration = Duration::from_secs(60);

/// Closed oval: bottom straight, left-hand turn, top straight, left-hand turn
fn oval_track() -> Vec<PathPoint> {
    let mut points = Vec::new();
    let straight_steps = (STRAIGHT_LENGTH / WAYPOINT_SPACING) as usize;
    let turn_steps = (PI * TURN_RADIUS / WAYPOINT_SPACING) as usize;

    for i in 0..straight_steps {
        let x = i as f64 * WAYPOINT_SPACING;
        points.push(PathPoint::planar(x, 0.0, 0.0, CRUISE_SPEED));
    }
    for i in 0..turn_steps {
        let angle = -PI / 2.0 + PI * i as f64 / turn_steps as f64;
        let x = STRAIGHT_LENGTH + TURN_RADIUS * angle.cos();
        let y = TURN_RADIUS + TURN_RADIUS * angle.sin();
        points.push(PathPoint::planar(x, y, angle + PI / 2.0, CRUISE_SPEED));
    }
    for i in 0..straight_steps {
        let x = STRAIGHT_LENGTH - i as f64 * WAYPOINT_SPACING;
        points.push(PathPoint::planar(x, 2.0 * TURN_RADIUS, PI, CRUISE_SPEED));
    }
    for i in 0..turn_steps {
        let angle = PI / 2.0 + PI * i as f64 / turn_steps as f64;
        let x = TURN_RADIUS * angle.cos();
        let y = TURN_RADIUS + TURN_RADIUS * angle.sin();
        points.push(PathPoint::planar(x, y, angle + PI / 2.0, CRUISE_SPEED));
    }
    points
}

/// Vehicle that drives along the track at the commanded speed
struct SimulatedVehicle {
    track: Vec<PathPoint>,
    segment: usize,
    progress: f64,
}

impl SimulatedVehicle {
    fn new(track: Vec<PathPoint>) -> Self {
        SimulatedVehicle {
            track,
            segment: 0,
            progress: 0.0,
        }
    }

    fn advance(&mut self, mut distance: f64) {
        let len = self.track.len();
        while distance > 0.0 {
            let from = &self.track[self.segment];
            let to = &self.track[(self.segment + 1) % len];
            let remaining = from.distance_to(to) - self.progress;
            if distance < remaining {
                self.progress += distance;
                return;
            }
            distance -= remaining;
            self.segment = (self.segment + 1) % len;
            self.progress = 0.0;
        }
    }

    fn pose(&self) -> VehiclePose {
        let len = self.track.len();
        let from = &self.track[self.segment];
        let to = &self.track[(self.segment + 1) % len];
        let seg_len = from.distance_to(to);
        let t = if seg_len > 0.0 { self.progress / seg_len } else { 0.0 };
        let position = from.position + (to.position - from.position) * t;
        let heading = (to.position.y - from.position.y).atan2(to.position.x - from.position.x);
        let mut pose = VehiclePose::planar(position.x, position.y, heading);
        pose.position.z = position.z;
        pose
    }
}

/// Localization stand-in: publishes a pose on every step at the commanded speed
async fn localization(
    inputs: Arc<SharedInputs>,
    track: Vec<PathPoint>,
    mut command: watch::Receiver<f64>,
) {
    let step = Duration::from_millis(20);
    let mut vehicle = SimulatedVehicle::new(track);
    let mut ticker = interval(step);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        let speed = *command.borrow_and_update();
        vehicle.advance(speed * step.as_secs_f64());
        inputs.set_pose(vehicle.pose());
    }
}

/// Traffic light stand-in: alternates red (stop line set) and green
async fn traffic_light(inputs: Arc<SharedInputs>) {
    let mut ticker = interval(LIGHT_CYCLE);
    let mut red = false;

    loop {
        ticker.tick().await;
        red = !red;
        if red {
            info!("Traffic light RED, stop line at waypoint {}", STOP_LINE_INDEX);
            inputs.set_stop_line(STOP_LINE_INDEX);
        } else {
            info!("Traffic light GREEN");
            inputs.set_stop_line(-1);
        }
    }
}

fn log_window(window: &TrajectoryWindow) {
    let first = window.points.first().map_or(0.0, |p| p.speed);
    let last = window.points.last().map_or(0.0, |p| p.speed);
    info!(
        "final waypoints: start={} len={} speed first={:.2} last={:.2}",
        window.start_index,
        window.len(),
        first,
        last
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("waypoint_updater=info,waypoint_updater_node=info")
            }),
        )
        .init();

    info!("Initializing waypoint updater node...");

    let config = match std::env::args().nth(1) {
        Some(path) => UpdaterConfig::load(Path::new(&path))
            .with_context(|| format!("loading config from {}", path))?,
        None => {
            info!("Using default configuration");
            UpdaterConfig::default()
        }
    };
    info!(
        "Using parameters: lookahead_wps={}, max_decel={}, stop_margin={}, rate_hz={}",
        config.lookahead_wps, config.max_decel, config.stop_margin, config.rate_hz
    );

    let inputs = Arc::new(SharedInputs::new());
    let updater = WaypointUpdater::new(config, Arc::clone(&inputs));
    updater.on_configure().context("configuring waypoint updater")?;
    updater.on_activate().context("activating waypoint updater")?;
    let updater = Arc::new(updater);

    let track = oval_track();
    inputs
        .load_path(track.clone())
        .context("loading base waypoints")?;

    let (command_tx, command_rx) = watch::channel(0.0);
    let (window_tx, mut window_rx) = mpsc::channel::<TrajectoryWindow>(1);

    let loop_handle = tokio::spawn(Arc::clone(&updater).run(window_tx));
    let localization_handle = tokio::spawn(localization(Arc::clone(&inputs), track, command_rx));
    let light_handle = tokio::spawn(traffic_light(Arc::clone(&inputs)));

    let deadline = Instant::now() + RUN_TIME;
    let mut last_log = Instant::now();

    loop {
        tokio::select! {
            window = window_rx.recv() => {
                let Some(window) = window else {
                    warn!("Waypoint updater stopped unexpectedly");
                    break;
                };
                // Motion control stand-in: track the first waypoint's target speed
                let speed = window.points.first().map_or(0.0, |p| p.speed);
                command_tx.send_replace(speed);

                if last_log.elapsed() >= Duration::from_secs(1) {
                    log_window(&window);
                    last_log = Instant::now();
                }
            }
            _ = tokio::time::sleep_until(deadline) => {
                info!("Simulation finished");
                break;
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown requested");
                break;
            }
        }
    }

    updater.on_deactivate().context("deactivating waypoint updater")?;
    updater.on_cleanup().context("cleaning up waypoint updater")?;

    drop(window_rx);
    loop_handle.await.context("update loop task failed")?;
    localization_handle.abort();
    light_handle.abort();

    Ok(())
}
