//! Pairwise Newtonian gravity.
//!
//! Two entry points for the two consumers: the live integrator accumulates
//! forces between [`Body`] pairs, the orbit predictor accumulates pure
//! accelerations over snapshot arrays.

use bevy::math::DVec3;

use crate::types::{Body, SimulationSettings};

/// Compute the gravitational force exerted on `a` by `b`.
///
/// Returns the zero vector when the pair is closer than the minimum
/// separation, so degenerate geometry never produces NaN or infinity.
/// The caller applies `+force` to `a` and `-force` to `b` within the same
/// step, which keeps Newton's third law exact per pair.
#[inline]
pub fn gravitational_force(a: &Body, b: &Body, settings: &SimulationSettings) -> DVec3 {
    let direction = b.pos - a.pos;
    let distance = direction.length();

    if distance < settings.min_separation {
        return DVec3::ZERO;
    }

    // The mass product is grouped so the swapped call computes the exact
    // same magnitude and antisymmetry holds bit-for-bit.
    let magnitude =
        settings.gravitational_constant * (a.mass * b.mass) / (distance * distance);

    direction / distance * magnitude
}

/// Gravitational acceleration on the body at `index` from every other body.
///
/// Operates on parallel position/mass arrays so the predictor can run on a
/// snapshot without touching live state. Pairs under the minimum separation
/// contribute nothing.
#[inline]
pub fn acceleration_at(
    index: usize,
    positions: &[DVec3],
    masses: &[f64],
    settings: &SimulationSettings,
) -> DVec3 {
    let mut acc = DVec3::ZERO;

    for (j, (&other_pos, &other_mass)) in positions.iter().zip(masses).enumerate() {
        if j == index {
            continue;
        }

        let direction = other_pos - positions[index];
        let distance = direction.length();

        if distance > settings.min_separation {
            // a = G*m/d² toward the other body
            let magnitude = settings.gravitational_constant * other_mass / (distance * distance);
            acc += direction / distance * magnitude;
        }
    }

    acc
}
