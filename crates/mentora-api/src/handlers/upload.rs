//! Upload endpoint: accepts a file or description, assembles the context,
//! starts the avatar conversation, and either redirects the browser to
//! `/live` or returns the result as JSON.

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use mentora_core::AppError;
use mentora_processing::{FileUpload, UploadInput};
use serde::Serialize;

use crate::error::HttpAppError;
use crate::handlers::SESSION_COOKIE;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub context: String,
    pub conversation_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Parsed `/upload` multipart form.
#[derive(Default)]
struct UploadForm {
    name: Option<String>,
    input: UploadInput,
}

pub async fn upload(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    jar: CookieJar,
    mut multipart: Multipart,
) -> Result<Response, HttpAppError> {
    let user = state
        .identity
        .resolve(&headers)
        .await?
        .ok_or_else(|| AppError::Unauthenticated("no identity presented".to_string()))?;

    let form = parse_upload_form(&mut multipart, state.config.max_upload_size_bytes).await?;
    let name = form
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .ok_or_else(|| AppError::InvalidInput("name field is required".to_string()))?;

    tracing::info!(
        user_id = %user,
        has_file = form.input.file.is_some(),
        has_description = form.input.description.is_some(),
        "Processing upload"
    );

    let started = state
        .conversation_service
        .start_from_upload(&user, &name, form.input)
        .await?;

    if wants_json(&headers) {
        return Ok(Json(UploadResponse {
            context: started.context,
            conversation_url: started.conversation_url,
            warning: started.warning,
        })
        .into_response());
    }

    let cookie = Cookie::build((SESSION_COOKIE, started.conversation_url))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .build();

    Ok((jar.add(cookie), Redirect::to("/live")).into_response())
}

async fn parse_upload_form(
    multipart: &mut Multipart,
    max_file_size: usize,
) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("invalid multipart payload: {}", e)))?
    {
        match field.name() {
            Some("name") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::InvalidInput(format!("invalid name field: {}", e)))?;
                form.name = Some(value);
            }
            Some("description") => {
                let value = field.text().await.map_err(|e| {
                    AppError::InvalidInput(format!("invalid description field: {}", e))
                })?;
                form.input.description = Some(value);
            }
            Some("file") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().unwrap_or_default().to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::InvalidInput(format!("invalid file field: {}", e)))?;

                // Browsers submit an empty file part when nothing is chosen.
                if filename.is_empty() && data.is_empty() {
                    continue;
                }
                if data.len() > max_file_size {
                    return Err(AppError::PayloadTooLarge(format!(
                        "{} bytes exceeds max {} bytes",
                        data.len(),
                        max_file_size
                    )));
                }

                form.input.file = Some(FileUpload {
                    filename,
                    content_type,
                    data: data.to_vec(),
                });
            }
            _ => {}
        }
    }

    Ok(form)
}

fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(|accept| accept.contains("application/json"))
        .unwrap_or(false)
}
