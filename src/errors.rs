// src/errors.rs
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PickerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Image processing error: {0}")]
    ImageProcessing(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Upload error: {0}")]
    Upload(String),
}

impl ResponseError for PickerError {
    fn error_response(&self) -> HttpResponse {
        match self {
            PickerError::Config(_) => HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Server configuration error",
                "message": self.to_string()
            })),
            PickerError::ImageProcessing(_) => {
                HttpResponse::BadRequest().json(serde_json::json!({
                    "error": "Image processing error",
                    "message": self.to_string()
                }))
            }
            PickerError::Validation(_) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": "Validation error",
                "message": self.to_string()
            })),
            PickerError::Upload(_) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": "Upload error",
                "message": self.to_string()
            })),
        }
    }
}

impl From<actix_multipart::MultipartError> for PickerError {
    fn from(err: actix_multipart::MultipartError) -> Self {
        PickerError::Upload(err.to_string())
    }
}
