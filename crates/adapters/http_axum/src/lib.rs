//! # panelhub-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a **JSON control API** (`/api/devices`, `/api/sun-times`,
//!   `/api/timer`, …) for editing settings and driving the schedule timer
//! - Map HTTP requests into application service calls (driving adapter)
//! - Re-evaluate schedules right after every successful mutation
//!
//! ## Dependency rule
//! Depends on `panelhub-app` (for port traits and services) and `panelhub-domain`
//! (for domain types used in request/response mapping). Never leaks axum types
//! into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
