//! Common error types used across the workspace.
//!
//! Every recoverable condition has a typed variant here. Each layer converts
//! its own errors into [`SmartNodeError`] via `#[from]` or an explicit
//! `into_domain()` so that ports only ever speak one error type.

use serde::Serialize;

use crate::unit::TemperatureUnit;

/// Boxed error used for backend failures that the domain does not inspect.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Top-level error for every smartnode operation.
#[derive(Debug, thiserror::Error)]
pub enum SmartNodeError {
    /// A write payload failed presence, type or range validation.
    #[error("invalid input")]
    InvalidInput(#[from] ValidationError),

    /// A request named a temperature unit outside `{C, F, K}`.
    #[error("invalid unit")]
    InvalidUnit(#[from] UnitError),

    /// The resource does not accept writes.
    #[error("resource is read-only")]
    ReadOnly,

    /// Unit translation was requested on a resource without units.
    #[error("unit translation is not supported by this resource")]
    TranslateUnsupported,

    /// A push notification reached no observer.
    #[error("notification delivery failed")]
    Delivery(#[from] DeliveryError),

    /// The resource engine has stopped or was never started.
    #[error("resource is not running")]
    NotRunning,

    /// A hardware backend could not be bound or read.
    #[error("hardware adapter unavailable")]
    AdapterUnavailable(#[source] BoxError),

    /// The transport failed to register, unregister or deliver.
    #[error("transport error")]
    Transport(#[source] BoxError),

    /// The lighting hub could not be reached.
    #[error("hub error")]
    Hub(#[source] BoxError),
}

/// Reasons a write payload is rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("missing value for `{field}`")]
    MissingValue { field: &'static str },

    #[error("`{field}` must be {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("{value} is outside the valid range {min},{max} for unit {unit}")]
    OutOfRange {
        value: f64,
        min: f64,
        max: f64,
        unit: TemperatureUnit,
    },

    #[error("payload must be a JSON object or array")]
    MalformedPayload,

    #[error("resource path must start with '/'")]
    InvalidPath,

    #[error("at least one resource type is required")]
    NoResourceTypes,

    #[error("at least one interface is required")]
    NoInterfaces,
}

/// An unknown temperature unit, echoed back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{unit} is an invalid temperature unit.")]
pub struct UnitError {
    pub unit: String,
}

/// The delivery layer reported how many observers are left after a failed push.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("notification failed with {observers} observer(s) remaining")]
pub struct DeliveryError {
    pub observers: usize,
}

impl DeliveryError {
    /// Whether every subscriber is gone.
    #[must_use]
    pub fn lost_all_observers(&self) -> bool {
        self.observers == 0
    }
}

/// JSON body returned to a client whose request was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorPayload {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
    pub error: String,
}

impl SmartNodeError {
    /// Build the error payload for a rejected request on resource `id`.
    ///
    /// Unit errors echo the offending unit; input errors carry the
    /// validation detail.
    #[must_use]
    pub fn payload(&self, id: &str) -> ErrorPayload {
        let (units, error) = match self {
            Self::InvalidUnit(err) => (Some(err.unit.clone()), err.to_string()),
            Self::InvalidInput(err) => (None, format!("Invalid input: {err}")),
            other => (None, other.to_string()),
        };
        ErrorPayload {
            id: id.to_string(),
            units,
            error,
        }
    }

    /// Whether the error was caused by the request rather than the backend.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput(_) | Self::InvalidUnit(_) | Self::ReadOnly | Self::TranslateUnsupported
        )
    }
}
