//! Attendance Engine for biometric time clocks
//!
//! This crate resolves raw punch timestamps from fingerprint or face
//! devices into per-employee, per-day attendance records: it removes
//! near-duplicate punches, assigns the survivors to Clock-In/Clock-Out/
//! In/Out slots, remaps slots for night and afternoon shifts, computes
//! lateness, work time and overtime, and moves holiday overtime to its
//! own bucket.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
