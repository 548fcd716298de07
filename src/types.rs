//! Core simulation types and constants.

use bevy::math::DVec3;
use bevy::prelude::*;

/// Gravitational constant in scene units.
///
/// Masses and distances in this simulation are abstract scene units, not
/// kilograms and meters; the physical constant (~6.674e-11) is rescaled by
/// 1e7 so that unit-scale masses produce visible accelerations. Calibrated
/// SI data can still be simulated by overriding
/// [`SimulationSettings::gravitational_constant`].
pub const G: f64 = 6.674e-4;

/// Separation below which a body pair exerts no force (singularity guard).
pub const MIN_SEPARATION: f64 = 1.0;

/// Squared speed below which a body is not worth predicting an orbit for.
pub const MIN_MOTION_SQUARED: f64 = 0.01;

/// Squared speed below which a body counts as stationary when resolving
/// the central body of an orbit.
pub const STATIONARY_SPEED_SQUARED: f64 = 0.1;

/// Minimum speed relative to the central body for a meaningful orbit.
pub const MIN_ORBIT_SPEED: f64 = 0.1;

/// Global simulation configuration.
///
/// One resource per [`App`]; there is no process-wide state, so independent
/// simulations (e.g. parallel tests) can coexist with different settings.
#[derive(Resource, Clone, Debug)]
pub struct SimulationSettings {
    /// Gravitational constant applied to every pair computation.
    pub gravitational_constant: f64,
    /// Multiplier applied to the frame delta before integration.
    pub time_scale: f64,
    /// Whether orbit traces are recomputed each frame.
    pub predict_orbits: bool,
    /// Separation below which a pair is zero-forced.
    pub min_separation: f64,
    /// Squared-speed threshold below which prediction is skipped.
    pub min_motion_squared: f64,
    /// Squared-speed threshold for central-body candidates.
    pub stationary_speed_squared: f64,
    /// Minimum orbital speed relative to the central body.
    pub min_orbit_speed: f64,
    /// Lower bound on predicted integration steps.
    pub min_steps: usize,
    /// Upper bound on predicted integration steps.
    pub max_steps: usize,
    /// Lower bound on the prediction timestep (seconds).
    pub min_dt: f64,
    /// Upper bound on the prediction timestep (seconds).
    pub max_dt: f64,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            gravitational_constant: G,
            time_scale: 1.0,
            predict_orbits: true,
            min_separation: MIN_SEPARATION,
            min_motion_squared: MIN_MOTION_SQUARED,
            stationary_speed_squared: STATIONARY_SPEED_SQUARED,
            min_orbit_speed: MIN_ORBIT_SPEED,
            min_steps: 200,
            max_steps: 2000,
            min_dt: 0.1,
            max_dt: 50.0,
        }
    }
}

/// Point-mass body participating in gravitational interaction.
///
/// Bodies are owned by the scene; the simulation borrows them through
/// queries. Mass must be strictly positive; construction upstream is
/// expected to enforce this, the hot path does not re-check it.
///
/// Uses f64 ([`DVec3`]) throughout for accuracy over long integrations.
#[derive(Component, Clone, Debug)]
pub struct Body {
    /// Display name used in diagnostics.
    pub name: String,
    /// Mass in scene units (strictly positive).
    pub mass: f64,
    /// Body radius. Informational to the simulation; read by the visual
    /// representation collaborators.
    pub radius: f64,
    /// Position in world space.
    pub pos: DVec3,
    /// Current velocity.
    pub vel: DVec3,
    /// Transient acceleration accumulator. Contributions are summed during
    /// the force pass and consumed exactly once by [`Body::integrate`],
    /// which resets it to zero.
    acceleration: DVec3,
}

impl Body {
    /// Create a body with the given initial state.
    pub fn new(
        name: impl Into<String>,
        mass: f64,
        radius: f64,
        pos: DVec3,
        vel: DVec3,
    ) -> Self {
        Self {
            name: name.into(),
            mass,
            radius,
            pos,
            vel,
            acceleration: DVec3::ZERO,
        }
    }

    /// Add a force contribution for this step.
    ///
    /// The force is converted to an acceleration (F/m) and summed into the
    /// accumulator; nothing moves until [`Body::integrate`] consumes it.
    pub fn apply_force(&mut self, force: DVec3) {
        self.acceleration += force / self.mass;
    }

    /// Commit one integration step of the scaled delta time.
    ///
    /// Semi-implicit Euler: velocity is updated from the accumulated
    /// acceleration first, then position from the new velocity. The
    /// accumulator is reset afterwards, so calling this again without new
    /// force contributions coasts on the current velocity.
    pub fn integrate(&mut self, dt: f64) {
        self.vel += self.acceleration * dt;
        self.pos += self.vel * dt;
        self.acceleration = DVec3::ZERO;
    }

    /// Currently accumulated (not yet integrated) acceleration.
    pub fn accumulated_acceleration(&self) -> DVec3 {
        self.acceleration
    }

    /// Speed magnitude.
    pub fn speed(&self) -> f64 {
        self.vel.length()
    }

    /// Squared speed, for threshold comparisons.
    pub fn speed_squared(&self) -> f64 {
        self.vel.length_squared()
    }
}

/// Derive a mass from a desired surface gravity and radius.
///
/// From g_surface = G·m/r²: m = g_surface·r²/G. Convenient when authoring
/// scenes around "how strong should standing on it feel" rather than raw
/// mass values.
pub fn mass_from_surface_gravity(surface_gravity: f64, radius: f64, g: f64) -> f64 {
    surface_gravity * radius * radius / g
}
