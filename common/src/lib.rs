//! # Shared building blocks
//!
//! Types and helpers used by every other crate of the workspace:
//!
//! * **[`config`]**: runtime settings and their defaults.
//! * **[`models`]**: the per-domain [`models::ResolutionResult`] and [`models::Latency`].
//! * **[`domains`]**: the line-oriented domain list reader.
//! * **[`error`]**: the error taxonomy surfaced to callers.

pub mod config;
pub mod domains;
pub mod error;
pub mod models;
