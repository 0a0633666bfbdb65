//! # smartnode-app
//!
//! Application layer: the **observable resource engine** and **port
//! definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement:
//!   - `Transport` / `RegisteredResource`: register a resource, push
//!     notifications, unregister
//!   - `DigitalInput` / `AnalogInput`: raw hardware reads
//!   - `HubClient`: forward actuator commands to a lighting hub
//! - Track observers and run the **notify loop** (first round after 200 ms,
//!   then every 2000 ms while anyone is still subscribed)
//! - Serve read, write and unit-translation requests through a cloneable
//!   `ResourceHandle`
//! - Own the resource **lifecycle**: register on start, unregister and wait
//!   for the grace delay on shutdown
//!
//! ## Concurrency
//! Each resource is driven by a single actor task. Requests and timer ticks
//! are processed one at a time, so handlers never overlap.
//!
//! ## Dependency rule
//! Depends on `smartnode-domain` only (plus `tokio` for channels and timers).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod engine;
pub mod handle;
pub mod lifecycle;
pub mod notify_timer;
pub mod observer;
pub mod ports;
pub mod sensor;
