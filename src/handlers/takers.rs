use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;

use super::{check_auth, JsonBody};
use crate::db::queries;
use crate::errors::AppError;
use crate::models::Taker;
use crate::services::takers;
use crate::state::AppState;

// GET /api/takers
pub async fn list_takers(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Taker>>, AppError> {
    let takers = {
        let db = state.db.conn();
        queries::list_takers(&db)?
    };
    Ok(Json(takers))
}

// POST /api/takers
#[derive(Deserialize)]
pub struct CreateTakerRequest {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

pub async fn create_taker(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    JsonBody(body): JsonBody<CreateTakerRequest>,
) -> Result<(StatusCode, Json<Taker>), AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let taker = {
        let db = state.db.conn();
        takers::add_taker(&db, &state.events, body.name.as_deref(), body.kind.as_deref())?
    };

    Ok((StatusCode::CREATED, Json(taker)))
}

// PATCH /api/takers/:id
#[derive(Deserialize)]
pub struct UpdateTakerRequest {
    pub status: Option<String>,
}

pub async fn update_taker_status(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<UpdateTakerRequest>,
) -> Result<Json<Taker>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let status = takers::parse_status(body.status.as_deref())?;
    let taker = {
        let db = state.db.conn();
        takers::set_taker_status(&db, &state.events, &id, status)?
    };

    Ok(Json(taker))
}
