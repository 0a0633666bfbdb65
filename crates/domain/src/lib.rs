//! # smartnode-domain
//!
//! Pure domain model for smartnode observable device resources.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error taxonomy, timestamps
//! - Define **Resources** (one addressable unit of device state: motion
//!   sensor, temperature sensor, dimmable light)
//! - Define the **payload codec** for each resource kind (state ⇄ JSON)
//! - Define **temperature units**, their valid ranges and the thermistor
//!   conversion used by analog sensors
//! - Define **descriptors** and device/platform metadata used at registration
//! - Contain all validation and change-detection rules
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod command;
pub mod descriptor;
pub mod platform;
pub mod resource;
pub mod state;
pub mod thermistor;
pub mod unit;
