//! Demo items service whose handlers are switched by remotely evaluated
//! feature flags.

pub mod config;
pub mod error;
pub mod flags;
pub mod items;
pub mod render;
pub mod routes;
pub mod state;

use axum::Router;

use crate::state::AppState;

/// Build the HTTP router over the given state.
pub fn build_router(state: AppState) -> Router {
    routes::routes().with_state(state)
}
