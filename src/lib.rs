//! Core library for the enrollment portal service.
//!
//! The interesting logic lives under [`workflows::enrollment`]: the gender-balanced
//! sequential allocator, the capacity synchronizer that re-derives per-section
//! capacities from the global enrollment limit, the section lifecycle manager, and
//! the single-applicant status transition. Everything else here is the ambient
//! service plumbing (configuration, telemetry, HTTP error mapping).

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
