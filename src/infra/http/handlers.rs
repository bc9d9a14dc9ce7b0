//! Request handlers for the tip and draft APIs.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;
use uuid::Uuid;

use crate::application::repos::{CreateTipParams, UpdateTipParams, UpsertDraftParams};

use super::ApiState;
use super::error::{ApiError, draft_error_to_api, tip_error_to_api};

#[derive(Debug, Deserialize)]
pub struct TipCreateRequest {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct TipUpdateRequest {
    pub id: i64,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct DraftUpsertRequest {
    pub id: Option<i64>,
    pub message: String,
    pub session_id: Uuid,
}

pub async fn get_random_tip(
    State(state): State<ApiState>,
) -> Result<impl IntoResponse, ApiError> {
    let tip = state
        .tips
        .find_random_tip()
        .await
        .map_err(|err| tip_error_to_api("infra::http::get_random_tip", err))?;

    Ok(Json(tip))
}

pub async fn list_tips(State(state): State<ApiState>) -> Result<impl IntoResponse, ApiError> {
    let tips = state
        .tips
        .get_all_tips()
        .await
        .map_err(|err| tip_error_to_api("infra::http::list_tips", err))?;

    Ok(Json(tips))
}

pub async fn get_tip_by_id(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let tip = state
        .tips
        .find_by_id(id)
        .await
        .map_err(|err| tip_error_to_api("infra::http::get_tip_by_id", err))?;

    Ok(Json(tip))
}

pub async fn create_tip(
    State(state): State<ApiState>,
    Json(payload): Json<TipCreateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let tip = state
        .tips
        .insert(CreateTipParams {
            message: payload.message,
        })
        .await
        .map_err(|err| tip_error_to_api("infra::http::create_tip", err))?;

    Ok(Json(tip))
}

pub async fn update_tip(
    State(state): State<ApiState>,
    Json(payload): Json<TipUpdateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let tip = state
        .tips
        .update(UpdateTipParams {
            id: payload.id,
            message: payload.message,
        })
        .await
        .map_err(|err| tip_error_to_api("infra::http::update_tip", err))?;

    Ok(Json(tip))
}

pub async fn delete_tip(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .tips
        .delete(id)
        .await
        .map_err(|err| tip_error_to_api("infra::http::delete_tip", err))?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn upsert_draft(
    State(state): State<ApiState>,
    Json(payload): Json<DraftUpsertRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let draft = state
        .drafts
        .upsert(UpsertDraftParams {
            id: payload.id,
            message: payload.message,
            session_id: payload.session_id,
        })
        .await
        .map_err(|err| draft_error_to_api("infra::http::upsert_draft", err))?;

    Ok(Json(draft))
}

pub async fn list_drafts(
    State(state): State<ApiState>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let drafts = state
        .drafts
        .get_all(session_id)
        .await
        .map_err(|err| draft_error_to_api("infra::http::list_drafts", err))?;

    Ok(Json(drafts))
}

pub async fn health(State(state): State<ApiState>) -> Result<impl IntoResponse, ApiError> {
    state
        .db
        .health_check()
        .await
        .map_err(|err| ApiError::store_unavailable("infra::http::health", err.to_string()))?;

    Ok(StatusCode::NO_CONTENT)
}
