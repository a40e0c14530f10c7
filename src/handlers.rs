// src/handlers.rs
use crate::services::{ColorAnalyzer, ImageProcessor, ScoringEngine, knowledge_base};
use crate::{AppState, errors::PickerError, models::*};
use actix_multipart::{Field, Multipart};
use actix_web::{HttpResponse, web};
use bytes::{Bytes, BytesMut};
use futures_util::TryStreamExt;
use log::{debug, info, warn};
use std::sync::Arc;
use uuid::Uuid;

const IMAGE_FIELD: &str = "image";
const MAX_TEXT_FIELD_BYTES: usize = 1024;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/analyze", web::post().to(analyze_watermelon))
            .route("/tips", web::get().to(get_tips))
            .route("/knowledge", web::get().to(get_knowledge)),
    );
}

pub async fn analyze_watermelon(
    mut payload: Multipart,
    data: web::Data<AppState>,
) -> Result<HttpResponse, PickerError> {
    let request_id = Uuid::new_v4();
    let mut inputs = UserInputs::default();
    let mut image_data: Option<Bytes> = None;

    while let Some(mut field) = payload.try_next().await? {
        let content_disposition = field.content_disposition();
        let name = content_disposition.get_name().unwrap_or_default().to_string();
        let filename = content_disposition
            .get_filename()
            .unwrap_or_default()
            .to_string();

        if name == IMAGE_FIELD {
            // Browsers submit an empty part when no file was chosen.
            if filename.is_empty() {
                while field.try_next().await?.is_some() {}
                continue;
            }

            let content_type = field.content_type().map(|ct| ct.to_string());
            data.image_processor
                .validate_content_type(content_type.as_deref())?;

            let mut buffer = BytesMut::new();
            while let Some(chunk) = field.try_next().await? {
                buffer.extend_from_slice(&chunk);
                data.image_processor.validate_size(buffer.len())?;
            }

            // An empty file still counts as a photo; it fails to decode later.
            image_data = Some(buffer.freeze());
            continue;
        }

        let value = read_text_field(&mut field, &name).await?;
        let value = value.trim();
        if value.is_empty() {
            continue;
        }

        match name.as_str() {
            "size" => inputs.size = Some(Size::from(value)),
            "shape" => inputs.shape = Some(Shape::from(value)),
            "stripes" => inputs.stripes = Some(StripePattern::from(value)),
            "fieldSpot" => inputs.field_spot = Some(FieldSpot::from(value)),
            "stem" => inputs.stem = Some(Stem::from(value)),
            other => debug!("Ignoring unknown form field '{}'", other),
        }
    }

    inputs.has_image = image_data.is_some();

    let (image_analysis, image_metadata) = match image_data {
        Some(bytes) => {
            process_image(
                request_id,
                data.image_processor.clone(),
                data.color_analyzer.clone(),
                bytes,
            )
            .await
        }
        None => (None, None),
    };

    let recommendation = data
        .scoring_engine
        .score(&inputs, image_analysis.as_ref());

    info!(
        "Analysis {}: {} ({}/{}, {}%)",
        request_id,
        recommendation.quality,
        recommendation.score,
        recommendation.max_score,
        recommendation.percentage
    );

    Ok(HttpResponse::Ok().json(AnalysisResponse {
        success: true,
        request_id,
        analysis: AnalysisRequest {
            inputs,
            image_analysis,
            image_metadata,
        },
        recommendation,
        timestamp: chrono::Utc::now(),
    }))
}

/// Decodes and analyzes an upload off the async executor. Any failure
/// degrades to a missing summary rather than failing the request.
async fn process_image(
    request_id: Uuid,
    processor: Arc<ImageProcessor>,
    analyzer: Arc<ColorAnalyzer>,
    bytes: Bytes,
) -> (Option<ImageSummary>, Option<ImageMetadata>) {
    let result = tokio::task::spawn_blocking(move || {
        let img = processor.decode(&bytes)?;
        let metadata = processor.metadata(&bytes, &img);
        let raw = processor.to_raw(&img)?;
        Ok::<_, PickerError>((analyzer.analyze(&raw), metadata))
    })
    .await;

    match result {
        Ok(Ok((summary, metadata))) => {
            if summary.is_none() {
                warn!("Analysis {}: color analysis produced no summary", request_id);
            }
            (summary, Some(metadata))
        }
        Ok(Err(e)) => {
            warn!("Analysis {}: {}", request_id, e);
            (None, None)
        }
        Err(e) => {
            warn!("Analysis {}: image task failed: {}", request_id, e);
            (None, None)
        }
    }
}

async fn read_text_field(field: &mut Field, name: &str) -> Result<String, PickerError> {
    let mut buffer = BytesMut::new();
    while let Some(chunk) = field.try_next().await? {
        buffer.extend_from_slice(&chunk);
        if buffer.len() > MAX_TEXT_FIELD_BYTES {
            return Err(PickerError::Validation(format!(
                "Field '{}' exceeds {} bytes",
                name, MAX_TEXT_FIELD_BYTES
            )));
        }
    }

    String::from_utf8(buffer.to_vec())
        .map_err(|_| PickerError::Validation(format!("Field '{}' is not valid UTF-8", name)))
}

pub async fn get_tips() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "tips": ScoringEngine::tips()
    }))
}

pub async fn get_knowledge() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "knowledge": knowledge_base::knowledge_base()
    }))
}

pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "error": "Route not found"
    }))
}
