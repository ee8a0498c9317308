use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;

use super::{ApiError, AppState};
use crate::models::Prediction;
use crate::services::resolve_guidance;

/// Multipart field carrying the uploaded image.
const UPLOAD_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct ClassifyResponse {
    pub success: bool,
    pub detected_object: String,
    pub confidence: String,
    pub waste_category: String,
    pub dustbin: DustbinPayload,
    pub examples: String,
    pub ai_guidance: String,
    pub all_predictions: Vec<PredictionPayload>,
}

#[derive(Debug, Serialize)]
pub struct DustbinPayload {
    pub color: String,
    #[serde(rename = "type")]
    pub bin_type: String,
    pub hindi_name: String,
}

#[derive(Debug, Serialize)]
pub struct PredictionPayload {
    pub label: String,
    pub score: String,
}

/// POST /classify: decode the uploaded image, classify it into one of the
/// four waste categories, attach disposal guidance.
pub async fn classify_waste(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<ClassifyResponse>, ApiError> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Upload(e.to_string()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        if !content_type.starts_with("image/") {
            return Err(ApiError::NotAnImage(content_type));
        }

        let filename = field.file_name().unwrap_or("upload").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::Upload(e.to_string()))?;
        upload = Some((filename, data));
        break;
    }
    let (filename, data) = upload.ok_or(ApiError::MissingImage)?;

    let classifier = state.classifier.clone().ok_or(ApiError::ModelUnavailable)?;

    log::info!("📷 Processing image: {} ({} bytes)", filename, data.len());

    let image = image::load_from_memory(&data)?;

    // CPU-bound inference, kept off the async worker threads.
    let predictions = tokio::task::spawn_blocking(move || classifier.classify(&image))
        .await
        .map_err(|e| ApiError::Classification(format!("classifier task failed: {e}")))?
        .map_err(|e| ApiError::Classification(format!("{e:#}")))?;

    let top = predictions
        .first()
        .copied()
        .ok_or_else(|| ApiError::Classification("classifier returned no predictions".into()))?;

    log::info!(
        "🤖 {} waste detected ({:.1}%), fetching guidance...",
        top.category.code(),
        top.score * 100.0
    );

    let guidance = resolve_guidance(state.guidance.as_ref(), top.category).await;

    Ok(Json(build_response(top, &predictions, guidance)))
}

fn build_response(
    top: Prediction,
    predictions: &[Prediction],
    ai_guidance: String,
) -> ClassifyResponse {
    let category = top.category;
    let dustbin = category.dustbin();

    ClassifyResponse {
        success: true,
        detected_object: format!("{} waste detected", category.code().to_uppercase()),
        confidence: format!("{:.1}%", top.score * 100.0),
        waste_category: category.code().to_uppercase(),
        dustbin: DustbinPayload {
            color: dustbin.color.to_string(),
            bin_type: dustbin.bin.to_string(),
            hindi_name: dustbin.hindi.to_string(),
        },
        examples: dustbin.examples.to_string(),
        ai_guidance,
        all_predictions: predictions
            .iter()
            .map(|p| PredictionPayload {
                label: format!("{} WASTE", p.category.code().to_uppercase()),
                score: format!("{:.1}%", p.score * 100.0),
            })
            .collect(),
    }
}
