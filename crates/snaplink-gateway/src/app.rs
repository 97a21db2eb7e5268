use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    delete_link_handler, get_link_handler, health_handler, redirect_handler, save_link_handler,
};
use crate::state::AppState;

pub struct App {}

impl App {
    pub fn router(state: AppState) -> Router {
        Router::new()
            .nest(
                "/v1",
                Router::new().route("/health", get(health_handler)).route(
                    "/links/{record_id}",
                    get(get_link_handler)
                        .put(save_link_handler)
                        .delete(delete_link_handler),
                ),
            )
            // Codes never contain '/', so nothing under /v1 can shadow one.
            .route("/{short_code}", get(redirect_handler))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }
}
