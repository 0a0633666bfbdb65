//! # smartnode-adapter-http-axum
//!
//! HTTP transport built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Implement the `Transport` port: registered resources are served at
//!   their own path
//! - `GET <path>` retrieves, `GET <path>?units=F` translates,
//!   `PUT`/`POST <path>` updates with a JSON body
//! - `GET <path>?observe=0` opens a **Server-Sent Events** stream; engine
//!   notifications are fanned out to every open stream and closing the
//!   stream unsubscribes
//! - Serve OCF discovery: `/oic/res`, `/oic/d`, `/oic/p`
//! - Map domain errors into HTTP status codes and error payloads
//!
//! ## Dependency rule
//! Depends on `smartnode-app` (for port traits and the resource handle) and
//! `smartnode-domain` (for descriptors, metadata and errors). Never leaks
//! axum types into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
pub mod transport;

pub use transport::{HttpResource, HttpTransport};
