//! Handlers for registered resources: retrieve, observe, translate and
//! update.

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::Value;

use smartnode_app::handle::{Observe, ResourceHandle};
use smartnode_domain::error::{SmartNodeError, ValidationError};

use crate::api::observe;
use crate::error::ApiError;
use crate::state::{AppState, Slot};

/// Observe flag values, as in CoAP: `0` registers, `1` deregisters.
const OBSERVE_REGISTER: u8 = 0;

/// Query string accepted on a resource `GET`.
#[derive(Debug, Default, Deserialize)]
pub struct ResourceQuery {
    /// Render the payload in this temperature unit.
    pub units: Option<String>,
    pub observe: Option<u8>,
}

fn lookup(state: &AppState, path: &str) -> Result<(Arc<Slot>, ResourceHandle), ApiError> {
    let path = format!("/{path}");
    let slot = state
        .registry
        .find(&path)
        .ok_or_else(|| ApiError::NotFound { path: path.clone() })?;
    let handle = slot
        .handle()
        .cloned()
        .ok_or_else(|| ApiError::resource(path, SmartNodeError::NotRunning))?;
    Ok((slot, handle))
}

/// `GET /{path}`
///
/// Plain retrieve by default; `?units=` translates, `?observe=0` opens an
/// SSE observation stream and `?observe=1` retrieves while deregistering.
pub async fn retrieve(
    State(state): State<AppState>,
    Path(path): Path<String>,
    Query(query): Query<ResourceQuery>,
) -> Result<Response, ApiError> {
    let (slot, handle) = lookup(&state, &path)?;
    let on_error = |err: SmartNodeError| ApiError::resource(handle.id(), err);

    match (query.observe, query.units) {
        (Some(OBSERVE_REGISTER), _) if slot.descriptor.observable => {
            let sse = observe::stream(Arc::clone(&slot), handle.clone()).await?;
            Ok(sse.into_response())
        }
        (Some(OBSERVE_REGISTER), _) | (None, None) => {
            let payload = handle.retrieve(None).await.map_err(on_error)?;
            Ok(Json(payload).into_response())
        }
        (Some(_), _) => {
            let payload = handle
                .retrieve(Some(Observe::Unsubscribe))
                .await
                .map_err(on_error)?;
            Ok(Json(payload).into_response())
        }
        (None, Some(units)) => {
            let payload = handle.translate(Some(units)).await.map_err(on_error)?;
            Ok(Json(payload).into_response())
        }
    }
}

/// `PUT /{path}` and `POST /{path}`
pub async fn update(
    State(state): State<AppState>,
    Path(path): Path<String>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let (_, handle) = lookup(&state, &path)?;
    let payload: Value = serde_json::from_slice(&body)
        .map_err(|_| ApiError::resource(handle.id(), ValidationError::MalformedPayload))?;
    let updated = handle
        .update(payload)
        .await
        .map_err(|err| ApiError::resource(handle.id(), err))?;
    Ok(Json(updated))
}
