use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

mod health;
mod items;

pub use health::health;

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    let items_router = Router::new()
        .route("/", get(items::list).post(items::create))
        .route("/new", get(items::new))
        .route(
            "/{item_id}",
            get(items::show)
                .put(items::update)
                .delete(items::destroy),
        )
        .route("/{item_id}/edit", get(items::edit));

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .nest("/items", items_router)
        .layer(TraceLayer::new_for_http())
}

async fn root() -> &'static str {
    "Items demo: feature-gated CRUD"
}
