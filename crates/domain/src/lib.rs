//! # panelhub-domain
//!
//! Pure domain model for the panelhub light-panel scheduler.
//!
//! ## Responsibilities
//! - Foundational types: error conventions, local wall-clock helpers
//! - Define **Devices** (light panels with an operation mode and schedules)
//! - Define **Schedules**, **Programs** and **Triggers** (when an effect runs)
//! - Resolve the trigger that is active at a given time of day
//! - Define **Effects** (native vs. custom effect names, colours)
//! - Define **User settings** (all devices, location, sunrise/sunset times)
//! - Contain all invariant enforcement and domain logic
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod time;

pub mod device;
pub mod effect;
pub mod schedule;
pub mod settings;
