//! Property-based tests for the gravity core.
//!
//! Verifies the force law, integrator and predictor invariants across wide
//! parameter ranges rather than hand-picked rosters.

use bevy::math::DVec3;
use proptest::prelude::*;

use crate::physics::{advance, gravitational_force};
use crate::prediction::{SystemSnapshot, predict_orbit};
use crate::test_utils::{assertions, fixtures};
use crate::types::{Body, SimulationSettings};

fn body(name: &str, mass: f64, pos: DVec3, vel: DVec3) -> Body {
    Body::new(name, mass, 1.0, pos, vel)
}

fn tick_n(bodies: &mut [Body], dt: f64, n: usize, settings: &SimulationSettings) {
    for _ in 0..n {
        let mut refs: Vec<&mut Body> = bodies.iter_mut().collect();
        advance(&mut refs, dt, settings);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Newton's third law must hold bit-for-bit for every pair.
    #[test]
    fn prop_force_antisymmetric(
        ax in -1e4f64..1e4, ay in -1e4f64..1e4, az in -1e4f64..1e4,
        bx in -1e4f64..1e4, by in -1e4f64..1e4, bz in -1e4f64..1e4,
        mass_a in 0.1f64..1e7, mass_b in 0.1f64..1e7,
    ) {
        let settings = SimulationSettings::default();
        let a = body("A", mass_a, DVec3::new(ax, ay, az), DVec3::ZERO);
        let b = body("B", mass_b, DVec3::new(bx, by, bz), DVec3::ZERO);

        let f_ab = gravitational_force(&a, &b, &settings);
        let f_ba = gravitational_force(&b, &a, &settings);

        prop_assert_eq!(f_ab, -f_ba);
        prop_assert!(f_ab.x.is_finite() && f_ab.y.is_finite() && f_ab.z.is_finite());
    }

    /// Pairs under the minimum separation exert exactly zero force,
    /// regardless of how large the masses are.
    #[test]
    fn prop_close_pair_zero_forced(
        offset in 0.0f64..0.999,
        mass in 1.0f64..1e12,
    ) {
        let settings = SimulationSettings::default();
        let a = body("A", mass, DVec3::ZERO, DVec3::ZERO);
        let b = body("B", mass, DVec3::new(offset, 0.0, 0.0), DVec3::ZERO);

        prop_assert_eq!(gravitational_force(&a, &b, &settings), DVec3::ZERO);
    }

    /// Equal-and-opposite force application keeps total momentum fixed
    /// through the live integrator.
    #[test]
    fn prop_momentum_conserved(
        x in 100.0f64..5000.0,
        y in 100.0f64..5000.0,
        mass_a in 1e3f64..1e6,
        mass_b in 1e3f64..1e6,
        vx in -1.0f64..1.0,
    ) {
        let settings = SimulationSettings::default();
        let mut bodies = vec![
            body("A", mass_a, DVec3::ZERO, DVec3::new(vx, 0.0, 0.0)),
            body("B", mass_b, DVec3::new(x, y, 0.0), DVec3::new(0.0, -vx, 0.0)),
        ];

        let before = assertions::total_momentum(&bodies);
        tick_n(&mut bodies, 0.5, 20, &settings);
        let after = assertions::total_momentum(&bodies);

        let scale = before.length().max(1.0);
        prop_assert!((after - before).length() / scale < 1e-9,
            "momentum drifted: {:?} -> {:?}", before, after);
    }

    /// The live integrator's energy drift stays bounded on circular orbits
    /// (symplectic schemes oscillate, they do not decay).
    #[test]
    fn prop_live_energy_bounded(
        distance in 500.0f64..3000.0,
    ) {
        let settings = SimulationSettings::default();
        let mut bodies = fixtures::circular_pair(&settings, distance);
        let gm = settings.gravitational_constant * bodies[0].mass;

        let initial = assertions::orbital_energy(bodies[1].pos, bodies[1].vel, gm);
        tick_n(&mut bodies, 1.0, 500, &settings);
        let final_energy = assertions::orbital_energy(bodies[1].pos, bodies[1].vel, gm);

        assertions::assert_energy_conserved(initial, final_energy, 0.01);
    }

    /// Prediction is a pure function of the snapshot: repeated calls agree
    /// exactly, and the derived step sizing stays within its clamps.
    #[test]
    fn prop_prediction_deterministic_and_clamped(
        distance in 200.0f64..3000.0,
        speed_factor in 0.8f64..1.2,
    ) {
        let settings = SimulationSettings::default();
        let bodies = fixtures::scaled_speed_pair(&settings, distance, speed_factor);
        let snapshot = SystemSnapshot::capture(&bodies);

        let first = predict_orbit(&snapshot, 1, &settings).unwrap();
        let second = predict_orbit(&snapshot, 1, &settings).unwrap();

        prop_assert_eq!(&first.points, &second.points);
        prop_assert!(first.steps >= settings.min_steps && first.steps <= settings.max_steps);
        prop_assert!(first.dt >= settings.min_dt && first.dt <= settings.max_dt);
        prop_assert!(first.stable);
        prop_assert_eq!(first.points.len(), first.steps + 1);
        prop_assert!(first.points.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
    }
}
