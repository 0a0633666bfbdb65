//! Resource and discovery handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod discovery;
pub mod observe;
#[allow(clippy::missing_errors_doc)]
pub mod resources;

use axum::Router;
use axum::routing::get;

use crate::state::AppState;

/// Build the discovery routes and the catch-all resource route.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/oic/res", get(discovery::resources))
        .route("/oic/d", get(discovery::device))
        .route("/oic/p", get(discovery::platform))
        .route(
            "/{*path}",
            get(resources::retrieve)
                .put(resources::update)
                .post(resources::update),
        )
}
