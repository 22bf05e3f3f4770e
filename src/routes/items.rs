use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::error::AppError;
use crate::items::{ItemForm, ItemsController, PageParams};
use crate::render::{redirect, Representation, Responder, View};
use crate::state::AppState;

// An id that does not parse cannot resolve to an item either
fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound)
}

/// GET /items
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Response, AppError> {
    let controller = ItemsController::new(state.store.as_ref(), &state.flags);
    let page = controller.list(params).await?;

    Ok(View::new("items/index.plush.html", page).into_response())
}

/// GET /items/{item_id}
pub async fn show(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
) -> Result<Response, AppError> {
    let controller = ItemsController::new(state.store.as_ref(), &state.flags);
    let page = controller.show(parse_id(&item_id)?).await?;

    Ok(View::new("items/show.plush.html", page).into_response())
}

/// GET /items/new
pub async fn new(State(state): State<AppState>) -> Result<Response, AppError> {
    let controller = ItemsController::new(state.store.as_ref(), &state.flags);
    let page = controller.new_item().await?;

    Ok(View::new("items/new.plush.html", page).into_response())
}

/// POST /items
pub async fn create(
    State(state): State<AppState>,
    Json(form): Json<ItemForm>,
) -> Result<Response, AppError> {
    let controller = ItemsController::new(state.store.as_ref(), &state.flags);

    match controller.create(form).await {
        Ok(item) => {
            tracing::info!(item_id = %item.id, "item created");
            Ok(redirect(&format!("/items/{}", item.id)))
        }
        Err(AppError::ValidationFailed {
            item,
            errors,
            creation_enabled,
        }) => Ok(View::with_status(
            StatusCode::UNPROCESSABLE_ENTITY,
            "items/new.plush.html",
            json!({ "item": item, "errors": errors, "creationEnabled": creation_enabled }),
        )
        .into_response()),
        Err(e) => Err(e),
    }
}

/// GET /items/{item_id}/edit
pub async fn edit(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
) -> Result<Response, AppError> {
    let controller = ItemsController::new(state.store.as_ref(), &state.flags);
    let page = controller.edit(parse_id(&item_id)?).await?;

    Ok(View::new("items/edit.plush.html", page).into_response())
}

/// PUT /items/{item_id}
pub async fn update(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
    headers: HeaderMap,
    Json(form): Json<ItemForm>,
) -> Result<Response, AppError> {
    let controller = ItemsController::new(state.store.as_ref(), &state.flags);

    let page = match controller.update(parse_id(&item_id)?, form).await {
        Ok(page) => page,
        Err(AppError::ValidationFailed {
            item,
            errors,
            creation_enabled,
        }) => {
            let data = json!({
                "item": item,
                "errors": errors,
                "creationEnabled": creation_enabled,
            });
            let script = data.clone();
            let response = Responder::new()
                .wants(Representation::JavaScript, move || {
                    View::with_status(
                        StatusCode::UNPROCESSABLE_ENTITY,
                        "items/edit.plush.js",
                        script,
                    )
                    .into_response()
                })
                .wants(Representation::Html, move || {
                    View::with_status(
                        StatusCode::UNPROCESSABLE_ENTITY,
                        "items/edit.plush.html",
                        data,
                    )
                    .into_response()
                })
                .respond(&headers);
            return Ok(response);
        }
        Err(e) => return Err(e),
    };

    tracing::info!(item_id = %page.item.id, "item updated");
    let location = format!("/items/{}", page.item.id);

    Ok(Responder::new()
        .wants(Representation::JavaScript, move || {
            View::new("items/edit.plush.js", page).into_response()
        })
        .wants(Representation::Html, move || redirect(&location))
        .respond(&headers))
}

/// DELETE /items/{item_id}
pub async fn destroy(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let controller = ItemsController::new(state.store.as_ref(), &state.flags);
    let page = controller.destroy(parse_id(&item_id)?).await?;

    tracing::info!(item_id = %page.item.id, "item destroyed");

    Ok(Responder::new()
        .wants(Representation::JavaScript, move || {
            View::new("items/destroy.plush.js", page).into_response()
        })
        .wants(Representation::Html, || redirect("/items"))
        .respond(&headers))
}
