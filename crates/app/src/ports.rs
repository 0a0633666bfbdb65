//! Port definitions: traits that adapters implement.
//!
//! Ports are the boundaries between the resource engine and the outside
//! world. They are defined here (in `app`) so that both the engine and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod hardware;
pub mod hub;
pub mod transport;

pub use hardware::{AnalogInput, DigitalInput};
pub use hub::HubClient;
pub use transport::{RegisteredResource, Transport};
