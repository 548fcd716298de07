//! Common test utilities for integration tests.

use bevy::math::DVec3;
use solarsim::physics::advance;
use solarsim::types::{Body, SimulationSettings};

/// Run `n` live integration steps of `dt` over the roster.
pub fn tick_n(bodies: &mut [Body], dt: f64, n: usize, settings: &SimulationSettings) {
    for _ in 0..n {
        let mut refs: Vec<&mut Body> = bodies.iter_mut().collect();
        advance(&mut refs, dt, settings);
    }
}

/// Circular orbit speed √(G·M/d).
pub fn circular_speed(settings: &SimulationSettings, central_mass: f64, distance: f64) -> f64 {
    (settings.gravitational_constant * central_mass / distance).sqrt()
}

/// Specific orbital energy about a primary with gravitational parameter `gm`.
pub fn orbital_energy(pos: DVec3, vel: DVec3, gm: f64) -> f64 {
    0.5 * vel.length_squared() - gm / pos.length()
}
