//! # smartnoded
//!
//! Wiring for the smartnode daemon, shared by the binary and its
//! end-to-end tests.
//!
//! ## Responsibilities
//! - Parse configuration (CLI flags, env vars, config file)
//! - Map the selected profile to its resource, device and platform info
//! - Bind hardware or the hub, falling back to simulation
//! - Register the resource on the HTTP transport and start its engine
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

pub mod cli;
pub mod config;
pub mod node;
pub mod profile;
