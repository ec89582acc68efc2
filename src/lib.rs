//! Spyglass - resume view tracking service
//!
//! This library provides the core functionality for the Spyglass service:
//! serving the tracking pixel embedded in distributed resumes, resolving
//! viewer IPs to geographic/company metadata, persisting an append-only
//! event log and aggregating it into dashboard statistics.
//!
//! # Architecture
//! - `tracking`: beacon pixel, fire-and-forget event recording
//! - `services`: GeoIP resolution and stats aggregation
//! - `storage`: SeaORM storage backend and data access
//! - `api`: HTTP services (pixel, stats, resume registration, health)
//! - `config`: Configuration management
//! - `runtime`: Application lifecycle (startup, server, shutdown)
//! - `system`: Logging initialization

pub mod api;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod tracking;
pub mod utils;
