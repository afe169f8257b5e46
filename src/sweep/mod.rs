// src/sweep/mod.rs

//! Top-level sweep driver.
//!
//! The controller walks scenarios and their parameter points strictly in
//! order. Within a point: provision (if needed), clear the checkpoint write
//! location, run, and for fault scenarios kill + restore. A failing point
//! never stops the sweep.

pub mod controller;

pub use controller::{PlannedCommands, PlannedRun, SweepController};
