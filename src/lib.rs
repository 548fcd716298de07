//! Solarsim - Real-Time N-Body Gravity with Orbit Prediction
//!
//! A library crate simulating Newtonian gravitational dynamics among a
//! small roster of point-mass bodies, with a non-destructive velocity
//! Verlet orbit predictor for trajectory preview and diagnostics.

pub mod physics;
pub mod prediction;
pub mod scenarios;
pub mod types;
