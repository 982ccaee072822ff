use std::collections::BTreeMap;

use crate::error::Result;
use crate::model::{CreateUrlRequest, UpdateUrlRequest};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tinylink_core::{ShortCode, SlimRecord, UrlRecord};

pub async fn create_url_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateUrlRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SlimRecord>)> {
    let Json(request) = payload?;
    let record = state.shortener().shorten(request.into()).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn list_urls_handler(
    State(state): State<AppState>,
) -> Result<Json<BTreeMap<ShortCode, SlimRecord>>> {
    Ok(Json(state.shortener().list_all().await?))
}

pub async fn get_url_handler(
    Path(short_code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<SlimRecord>> {
    Ok(Json(state.shortener().resolve(&short_code).await?))
}

pub async fn update_url_handler(
    Path(short_code): Path<String>,
    State(state): State<AppState>,
    payload: std::result::Result<Json<UpdateUrlRequest>, JsonRejection>,
) -> Result<Json<SlimRecord>> {
    let Json(request) = payload?;
    let url = request.url.unwrap_or_default();
    Ok(Json(state.shortener().update(&short_code, &url).await?))
}

pub async fn delete_url_handler(
    Path(short_code): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode> {
    state.shortener().remove(&short_code).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn stats_handler(
    Path(short_code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<UrlRecord>> {
    Ok(Json(state.shortener().stats(&short_code).await?))
}
