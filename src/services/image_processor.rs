// src/services/image_processor.rs
use crate::errors::PickerError;
use crate::models::{ImageMetadata, RawImage};
use image::{DynamicImage, GenericImageView};

pub struct ImageProcessor {
    max_upload_bytes: usize,
}

impl ImageProcessor {
    pub fn new(max_upload_bytes: usize) -> Self {
        Self { max_upload_bytes }
    }

    pub fn validate_content_type(&self, content_type: Option<&str>) -> Result<(), PickerError> {
        match content_type {
            Some(ct) if ct.starts_with("image/") => Ok(()),
            _ => Err(PickerError::Validation(
                "Only image files are allowed".to_string(),
            )),
        }
    }

    pub fn validate_size(&self, size: usize) -> Result<(), PickerError> {
        if size > self.max_upload_bytes {
            return Err(PickerError::Validation(format!(
                "Image exceeds the {} byte upload limit",
                self.max_upload_bytes
            )));
        }
        Ok(())
    }

    pub fn decode(&self, data: &[u8]) -> Result<DynamicImage, PickerError> {
        image::load_from_memory(data)
            .map_err(|e| PickerError::ImageProcessing(format!("Invalid image format: {}", e)))
    }

    pub fn metadata(&self, data: &[u8], img: &DynamicImage) -> ImageMetadata {
        let (width, height) = img.dimensions();
        let format = image::guess_format(data)
            .ok()
            .map(|f| format!("{:?}", f).to_lowercase());

        ImageMetadata {
            width,
            height,
            format,
            size: data.len(),
            has_alpha: img.color().has_alpha(),
        }
    }

    /// Flattens a decoded image into an interleaved RGB or RGBA raster.
    pub fn to_raw(&self, img: &DynamicImage) -> Result<RawImage, PickerError> {
        let (width, height) = img.dimensions();
        let (channels, pixels) = if img.color().has_alpha() {
            (4, img.to_rgba8().into_raw())
        } else {
            (3, img.to_rgb8().into_raw())
        };

        RawImage::new(width, height, channels, pixels).ok_or_else(|| {
            PickerError::ImageProcessing(format!(
                "Decoded buffer does not match {}x{} image",
                width, height
            ))
        })
    }
}
