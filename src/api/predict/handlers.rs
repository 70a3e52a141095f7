use crate::api::models::*;
use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use tracing::info;

const FILE_FIELD: &str = "file";
const DEFAULT_FILE_NAME: &str = "upload.csv";

pub async fn predict_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<PredictResponse>, AppError> {
    // Take the first `file` part; anything else in the form is ignored
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("Invalid multipart body", e))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field
            .file_name()
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_FILE_NAME)
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| multipart_error("Failed to read upload", e))?;
        upload = Some((file_name, bytes));
        break;
    }

    let (file_name, bytes) =
        upload.ok_or_else(|| AppError::BadRequest(format!("Missing `{}` field", FILE_FIELD)))?;

    info!(file_name = %file_name, size = bytes.len(), "Processing prediction request");

    let predictions = state.predictions.predict(&bytes, &file_name).await?;

    Ok(Json(PredictResponse { predictions }))
}

fn multipart_error(context: &str, err: MultipartError) -> AppError {
    let message = format!("{}: {}", context, err.body_text());
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(message)
    } else {
        AppError::BadRequest(message)
    }
}
