use crate::error::{AppError, Result};
use crate::model::ShortenForm;
use crate::pages::{record_page, HOME_PAGE};
use crate::state::AppState;
use axum::extract::rejection::FormRejection;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse};
use axum::Form;
use tinylink_core::ShortCode;

pub async fn home_handler() -> Html<&'static str> {
    Html(HOME_PAGE)
}

pub async fn shorten_form_handler(
    State(state): State<AppState>,
    form: std::result::Result<Form<ShortenForm>, FormRejection>,
) -> Result<Html<String>> {
    let Form(form) = form?;
    let record = state.shortener().shorten(form.into()).await?;
    Ok(Html(record_page(&record)))
}

/// Resolves a short code and redirects the browser to its target.
pub async fn redirect_handler(
    Path(short_code): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse> {
    let code = ShortCode::new(short_code).map_err(|e| AppError::BadRequest(e.to_string()))?;
    let record = state.shortener().resolve(code.as_str()).await?;
    Ok((StatusCode::FOUND, [(header::LOCATION, record.url.to_string())]))
}
