use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    create_url_handler, delete_url_handler, get_url_handler, health_handler, home_handler,
    list_urls_handler, redirect_handler, shorten_form_handler, stats_handler, update_url_handler,
};
use crate::state::AppState;

pub struct App {}

impl App {
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/", get(home_handler))
            .route("/shorten", post(shorten_form_handler))
            .route("/{short_code}", get(redirect_handler))
            .route(
                "/api/v1/shorten",
                post(create_url_handler).get(list_urls_handler),
            )
            .route(
                "/api/v1/shorten/{short_code}",
                get(get_url_handler)
                    .put(update_url_handler)
                    .delete(delete_url_handler),
            )
            .route("/api/v1/shorten/{short_code}/stats", get(stats_handler))
            .route("/api/v1/health", get(health_handler))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }
}
