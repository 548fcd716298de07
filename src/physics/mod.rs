//! Real-time gravitational simulation.
//!
//! Each tick accumulates every pairwise force into the bodies' acceleration
//! accumulators, then commits a semi-implicit Euler step per body. Updating
//! velocity before position keeps long-run energy behavior acceptable for a
//! per-frame loop at no extra cost; the orbit predictor uses a higher-order
//! scheme instead (see [`crate::prediction`]) and the two are deliberately
//! kept separate.

mod gravity;

#[cfg(test)]
mod proptest_physics;

use std::ops::DerefMut;

use bevy::prelude::*;

pub use gravity::{acceleration_at, gravitational_force};

use crate::types::{Body, SimulationSettings};

/// Ordering for the per-frame simulation systems.
///
/// Prediction must observe the already-advanced state, so it runs in a set
/// chained after advancement.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Pairwise force accumulation and integration.
    Advance,
    /// Orbit prediction over the advanced state.
    Predict,
}

/// Plugin providing the real-time n-body integrator.
///
/// Adds the per-frame advancement system and a startup roster log. The
/// roster is expected to be fixed for the duration of a tick; bodies are
/// spawned by the scene before simulation starts.
pub struct PhysicsPlugin;

impl Plugin for PhysicsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SimulationSettings>()
            .configure_sets(
                Update,
                (SimulationSet::Advance, SimulationSet::Predict).chain(),
            )
            .add_systems(PostStartup, log_roster)
            .add_systems(Update, advance_simulation.in_set(SimulationSet::Advance));
    }
}

/// Advance every body by one step of `dt`.
///
/// Phase one visits each unordered pair exactly once and applies the force
/// to both bodies with opposite sign, so Newton's third law holds exactly
/// within the step. Phase two commits the accumulated accelerations.
/// Deterministic for a fixed body order and `dt`; degenerate pairs are
/// zero-forced rather than treated as errors.
///
/// Generic over mutable references so it serves both plain slices and ECS
/// query items.
pub fn advance<B>(bodies: &mut [B], dt: f64, settings: &SimulationSettings)
where
    B: DerefMut<Target = Body>,
{
    for i in 0..bodies.len() {
        let (head, tail) = bodies.split_at_mut(i + 1);
        let a = &mut head[i];
        for b in tail.iter_mut() {
            let force = gravitational_force(&*a, &*b, settings);
            a.apply_force(force);
            b.apply_force(-force);
        }
    }

    for body in bodies.iter_mut() {
        body.integrate(dt);
    }
}

/// Per-frame advancement system.
///
/// Scales the frame delta by the configured time scale and runs one
/// integration step over the whole roster.
pub fn advance_simulation(
    time: Res<Time>,
    settings: Res<SimulationSettings>,
    mut query: Query<&mut Body>,
) {
    let dt = time.delta_secs_f64() * settings.time_scale;
    if dt <= 0.0 {
        return;
    }

    let mut bodies: Vec<Mut<Body>> = query.iter_mut().collect();
    advance(&mut bodies, dt, &settings);
}

/// Log the discovered roster once the scene has spawned it.
fn log_roster(bodies: Query<&Body>) {
    for body in &bodies {
        info!(
            "Found body: {} | pos: ({:.2}, {:.2}, {:.2}) | mass: {:.2e} | speed: {:.4}",
            body.name, body.pos.x, body.pos.y, body.pos.z, body.mass, body.speed()
        );
    }
}
