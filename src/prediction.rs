//! Orbit prediction.
//!
//! Forecasts a body's future path by forward-simulating a snapshot of the
//! whole roster, leaving live state untouched. The predictor runs hundreds
//! to thousands of steps per call, so it uses velocity Verlet (2nd order,
//! symplectic) rather than the live integrator's per-frame scheme; the two
//! serve different goals and are intentionally not unified.

use std::f64::consts::TAU;

use bevy::math::DVec3;
use bevy::prelude::*;
use thiserror::Error;

use crate::physics::{SimulationSet, acceleration_at};
use crate::types::{Body, SimulationSettings};

/// Fraction of the estimated period to simulate, overshooting a full loop
/// so closed orbits visibly close.
const PERIOD_MARGIN: f64 = 1.2;

/// Target seconds of estimated orbit covered per integration step, before
/// the step count is clamped.
const SECONDS_PER_STEP: f64 = 10.0;

/// Displacement bound relative to the initial orbital distance. A target
/// that strays this far from its starting point has left any plausible
/// orbit; the trace is cut short and flagged unstable.
const DIVERGENCE_FACTOR: f64 = 1000.0;

/// Plugin providing per-body orbit prediction.
pub struct PredictionPlugin;

impl Plugin for PredictionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SimulationSettings>()
            .add_systems(PostStartup, orbit_sanity_check)
            .add_systems(
                Update,
                predict_orbits
                    .in_set(SimulationSet::Predict)
                    .run_if(prediction_enabled),
            );
    }
}

fn prediction_enabled(settings: Res<SimulationSettings>) -> bool {
    settings.predict_orbits
}

/// Reasons a prediction request is declined.
///
/// None of these are fatal: one body's skip never blocks advancement or
/// prediction for the rest of the roster.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictionSkip {
    /// The target is not moving fast enough to have a meaningful orbit.
    #[error("target is effectively at rest (speed² = {speed_squared:.4})")]
    TargetAtRest {
        /// Squared speed that fell below the minimum-motion threshold.
        speed_squared: f64,
    },
    /// No stationary body with dominant mass was found to orbit around.
    #[error("no central body to orbit")]
    NoCentralBody,
    /// The target sits too close to, or moves too slowly around, its
    /// central body for the period estimate to mean anything.
    #[error("degenerate orbit geometry (distance {distance:.2}, speed {speed:.2})")]
    DegenerateGeometry {
        /// Separation from the resolved central body.
        distance: f64,
        /// Target speed.
        speed: f64,
    },
}

/// Predicted future path for one body.
///
/// Refilled on every prediction pass and consumed by a rendering
/// collaborator; the point sequence always starts at the body's current
/// position. An unstable trace carries the points accumulated before the
/// divergence guard tripped; the caller decides whether to draw it.
#[derive(Component, Clone, Debug, Default, PartialEq)]
pub struct OrbitTrace {
    /// Predicted positions in step order, starting position included.
    pub points: Vec<DVec3>,
    /// False when the divergence guard terminated the simulation early.
    pub stable: bool,
    /// Circular-approximation period estimate used to size the simulation.
    pub estimated_period: f64,
    /// Number of integration steps the simulation was sized for.
    pub steps: usize,
    /// Per-step timestep in seconds.
    pub dt: f64,
    /// Sum of consecutive segment lengths. Diagnostic only, computed on
    /// normal completion; zero for unstable traces.
    pub path_length: f64,
}

impl OrbitTrace {
    /// Drop all prediction data, e.g. when the body's prediction is skipped.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Frozen copy of the roster used for forward simulation.
///
/// Captured from immutable borrows, so predicting can never mutate live
/// body state. Order follows capture order and is preserved in the working
/// arrays throughout the simulation.
#[derive(Clone, Debug, Default)]
pub struct SystemSnapshot {
    names: Vec<String>,
    positions: Vec<DVec3>,
    velocities: Vec<DVec3>,
    masses: Vec<f64>,
}

impl SystemSnapshot {
    /// Snapshot positions, velocities and masses of every body.
    pub fn capture<'a>(bodies: impl IntoIterator<Item = &'a Body>) -> Self {
        let mut snapshot = Self::default();
        for body in bodies {
            snapshot.names.push(body.name.clone());
            snapshot.positions.push(body.pos);
            snapshot.velocities.push(body.vel);
            snapshot.masses.push(body.mass);
        }
        snapshot
    }

    /// Number of captured bodies.
    pub fn len(&self) -> usize {
        self.masses.len()
    }

    /// True when no bodies were captured.
    pub fn is_empty(&self) -> bool {
        self.masses.is_empty()
    }

    /// Display name of the body at `index`.
    pub fn name(&self, index: usize) -> &str {
        &self.names[index]
    }

    /// Heuristically resolve the central body the target orbits.
    ///
    /// Candidates are every body other than the target whose squared speed
    /// is below the stationary threshold; among those the strictly greatest
    /// mass wins, first found keeping the slot on ties. `None` is a
    /// legitimate outcome (e.g. a roster of only moving bodies) that
    /// callers handle by skipping prediction.
    pub fn find_central_body(
        &self,
        target: usize,
        settings: &SimulationSettings,
    ) -> Option<usize> {
        let mut central = None;
        let mut largest_mass = 0.0;

        for candidate in 0..self.len() {
            if candidate == target {
                continue;
            }
            if self.velocities[candidate].length_squared() < settings.stationary_speed_squared
                && self.masses[candidate] > largest_mass
            {
                central = Some(candidate);
                largest_mass = self.masses[candidate];
            }
        }

        central
    }
}

/// Forecast the orbit of the body at `target` within the snapshot.
///
/// Estimates the orbital period from the circular approximation
/// (2π·distance/speed), sizes the step count and timestep from it, then
/// integrates the entire snapshot forward with velocity Verlet, recording
/// the target's position each step. Pure function of its inputs: two calls
/// on the same snapshot produce identical traces.
pub fn predict_orbit(
    snapshot: &SystemSnapshot,
    target: usize,
    settings: &SimulationSettings,
) -> Result<OrbitTrace, PredictionSkip> {
    let speed_squared = snapshot.velocities[target].length_squared();
    if speed_squared < settings.min_motion_squared {
        return Err(PredictionSkip::TargetAtRest { speed_squared });
    }

    let central = snapshot
        .find_central_body(target, settings)
        .ok_or(PredictionSkip::NoCentralBody)?;

    let start_pos = snapshot.positions[target];
    let distance = (start_pos - snapshot.positions[central]).length();
    let speed = snapshot.velocities[target].length();

    if distance < settings.min_separation || speed < settings.min_orbit_speed {
        return Err(PredictionSkip::DegenerateGeometry { distance, speed });
    }

    // Circular approximation: one loop of circumference 2πd at speed v.
    let estimated_period = TAU * distance / speed;

    let steps = ((estimated_period / SECONDS_PER_STEP).ceil() as usize)
        .clamp(settings.min_steps, settings.max_steps);
    let duration = estimated_period * PERIOD_MARGIN;
    let dt = (duration / steps as f64).clamp(settings.min_dt, settings.max_dt);

    debug!(
        "Simulating orbit for {} around {}: distance {:.2}, speed {:.2}, period {:.2}, steps {}, dt {:.2}",
        snapshot.name(target),
        snapshot.name(central),
        distance,
        speed,
        estimated_period,
        steps,
        dt
    );

    // Working copies; live state stays untouched.
    let mut positions = snapshot.positions.clone();
    let mut velocities = snapshot.velocities.clone();

    let mut trace = OrbitTrace {
        points: Vec::with_capacity(steps + 1),
        stable: true,
        estimated_period,
        steps,
        dt,
        path_length: 0.0,
    };
    trace.points.push(start_pos);

    for step in 0..steps {
        let accelerations: Vec<DVec3> = (0..positions.len())
            .map(|i| acceleration_at(i, &positions, &snapshot.masses, settings))
            .collect();

        // x += v·dt + ½·a·dt²
        for i in 0..positions.len() {
            positions[i] += velocities[i] * dt + accelerations[i] * (0.5 * dt * dt);
        }

        let new_accelerations: Vec<DVec3> = (0..positions.len())
            .map(|i| acceleration_at(i, &positions, &snapshot.masses, settings))
            .collect();

        // v += ½·(a_old + a_new)·dt
        for i in 0..velocities.len() {
            velocities[i] += (accelerations[i] + new_accelerations[i]) * (0.5 * dt);
        }

        if (positions[target] - start_pos).length() > distance * DIVERGENCE_FACTOR {
            warn!(
                "Orbit simulation unstable for {} at step {} - position exploded",
                snapshot.name(target),
                step
            );
            trace.stable = false;
            break;
        }

        trace.points.push(positions[target]);
    }

    if trace.stable {
        trace.path_length = trace
            .points
            .windows(2)
            .map(|pair| (pair[1] - pair[0]).length())
            .sum();

        let expected_circumference = TAU * distance;
        debug!(
            "Orbit for {}: {} points, path length {:.2}, expected circumference {:.2}, ratio {:.2}",
            snapshot.name(target),
            trace.points.len(),
            trace.path_length,
            expected_circumference,
            trace.path_length / expected_circumference
        );
    }

    Ok(trace)
}

/// Recompute the orbit trace of every predictable body.
///
/// Takes one snapshot of the advanced roster, then fills each body's
/// [`OrbitTrace`] from it. Skips clear the trace so stale paths are never
/// rendered; a missing central body or degenerate geometry is logged, a
/// merely resting target is not.
fn predict_orbits(
    settings: Res<SimulationSettings>,
    bodies: Query<(Entity, &Body)>,
    mut traces: Query<(Entity, &mut OrbitTrace), With<Body>>,
) {
    let entities: Vec<Entity> = bodies.iter().map(|(entity, _)| entity).collect();
    let snapshot = SystemSnapshot::capture(bodies.iter().map(|(_, body)| body));

    for (entity, mut trace) in &mut traces {
        let Some(index) = entities.iter().position(|&e| e == entity) else {
            continue;
        };

        match predict_orbit(&snapshot, index, &settings) {
            Ok(predicted) => *trace = predicted,
            Err(PredictionSkip::TargetAtRest { .. }) => trace.clear(),
            Err(skip) => {
                warn!("Skipping orbit for {}: {}", snapshot.name(index), skip);
                trace.clear();
            }
        }
    }
}

/// Log how close each moving body is to a circular orbit around its primary.
///
/// Startup diagnostic: compares the body's speed to the circular-orbit
/// speed √(G·M/d) for the resolved central body. A ratio near 1.0 means the
/// scene was authored close to a stable circular orbit.
fn orbit_sanity_check(settings: Res<SimulationSettings>, bodies: Query<&Body>) {
    let snapshot = SystemSnapshot::capture(&bodies);

    for index in 0..snapshot.len() {
        if snapshot.velocities[index].length_squared() <= settings.min_motion_squared {
            continue;
        }
        let Some(central) = snapshot.find_central_body(index, &settings) else {
            continue;
        };

        let distance = (snapshot.positions[index] - snapshot.positions[central]).length();
        let speed = snapshot.velocities[index].length();
        let circular_speed =
            (settings.gravitational_constant * snapshot.masses[central] / distance).sqrt();

        info!(
            "Orbit check - {}: distance {:.2}, speed {:.4}, circular speed {:.4}, ratio {:.4}",
            snapshot.name(index),
            distance,
            speed,
            circular_speed,
            speed / circular_speed
        );
    }
}
