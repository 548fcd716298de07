//! Preset rosters and spawn helpers.
//!
//! Scenes own their bodies; these helpers author common configurations
//! (a stationary star with orbiters at circular velocity) and spawn them
//! with prediction traces attached.

use bevy::math::DVec3;
use bevy::prelude::*;

use crate::prediction::OrbitTrace;
use crate::types::{Body, SimulationSettings};

/// A stationary star at the origin.
pub fn star(name: impl Into<String>, mass: f64, radius: f64) -> Body {
    Body::new(name, mass, radius, DVec3::ZERO, DVec3::ZERO)
}

/// A body in a circular orbit around `central`.
///
/// Placed along +x from the central body at `distance`, with tangential
/// velocity v = √(G·M/d) in +y on top of the central body's own velocity.
pub fn circular_orbiter(
    name: impl Into<String>,
    central: &Body,
    distance: f64,
    mass: f64,
    radius: f64,
    settings: &SimulationSettings,
) -> Body {
    let speed = (settings.gravitational_constant * central.mass / distance).sqrt();
    Body::new(
        name,
        mass,
        radius,
        central.pos + DVec3::new(distance, 0.0, 0.0),
        central.vel + DVec3::new(0.0, speed, 0.0),
    )
}

/// Canonical two-body roster: a 1e6-mass star with a unit-mass planet on a
/// circular orbit at distance 1000.
pub fn star_and_planet(settings: &SimulationSettings) -> Vec<Body> {
    let sun = star("Sun", 1e6, 100.0);
    let planet = circular_orbiter("Planet", &sun, 1000.0, 1.0, 10.0, settings);
    vec![sun, planet]
}

/// A star with three planets at staggered circular orbits.
pub fn star_with_planets(settings: &SimulationSettings) -> Vec<Body> {
    let sun = star("Sun", 1e6, 100.0);
    let inner = circular_orbiter("Inner", &sun, 600.0, 1.0, 6.0, settings);
    let middle = circular_orbiter("Middle", &sun, 1000.0, 2.0, 10.0, settings);
    let outer = circular_orbiter("Outer", &sun, 1600.0, 0.5, 8.0, settings);
    vec![sun, inner, middle, outer]
}

/// Spawn a roster, attaching an empty [`OrbitTrace`] to every body.
pub fn spawn_bodies(commands: &mut Commands, bodies: Vec<Body>) -> Vec<Entity> {
    bodies
        .into_iter()
        .map(|body| {
            info!("Spawning {} (mass {:.2e})", body.name, body.mass);
            commands.spawn((body, OrbitTrace::default())).id()
        })
        .collect()
}
