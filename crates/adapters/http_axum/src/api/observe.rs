//! Server-Sent Events (SSE) stream for resource observation.
//!
//! Opening a stream subscribes the caller: the first event carries the
//! current payload, every later event is a notification pushed by the
//! engine. Dropping the stream unsubscribes.

use std::convert::Infallible;
use std::sync::Arc;

use axum::response::sse::{Event, KeepAlive, Sse};
use serde_json::Value;
use smartnode_app::handle::{Observe, ResourceHandle};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::{Stream, StreamExt};

use crate::error::ApiError;
use crate::state::Slot;

/// Sends the unsubscribe when the client goes away.
struct ObservationGuard {
    handle: ResourceHandle,
}

impl Drop for ObservationGuard {
    fn drop(&mut self) {
        let handle = self.handle.clone();
        if let Ok(runtime) = tokio::runtime::Handle::try_current() {
            runtime.spawn(async move {
                if let Err(err) = handle.retrieve(Some(Observe::Unsubscribe)).await {
                    tracing::debug!(resource = handle.id(), error = %err, "unsubscribe dropped");
                }
            });
        }
    }
}

/// Subscribe to `slot` and stream its payloads.
///
/// # Errors
///
/// Returns [`ApiError`] when the engine refuses the initial retrieve.
pub async fn stream(
    slot: Arc<Slot>,
    handle: ResourceHandle,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    // listen before subscribing so the first push cannot be missed
    let updates = BroadcastStream::new(slot.subscribe());
    let initial = handle
        .retrieve(Some(Observe::Subscribe))
        .await
        .map_err(|err| ApiError::resource(handle.id(), err))?;
    tracing::debug!(resource = handle.id(), "observer attached");

    let path = slot.descriptor.path.clone();
    let updates = updates.filter_map(move |result| match result {
        Ok(payload) => Some(payload),
        Err(BroadcastStreamRecvError::Lagged(skipped)) => {
            tracing::warn!(path = %path, skipped, "observer lagged, notifications dropped");
            None
        }
    });

    let guard = ObservationGuard { handle };
    let events = tokio_stream::once(initial)
        .chain(updates)
        .map(move |payload: Value| {
            let _attached = &guard;
            Ok(Event::default().data(payload.to_string()))
        });

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}
