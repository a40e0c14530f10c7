// src/services/color_analyzer.rs
use crate::models::*;
use image::{DynamicImage, GenericImageView, ImageBuffer, imageops::FilterType};
use log::debug;
use std::borrow::Cow;

pub const DEFAULT_MAX_DIMENSION: u32 = 400;

// Every 4th pixel of the flat buffer is sampled.
const PIXEL_SAMPLE_STRIDE: usize = 4;

const STRIPE_SAMPLE_ROWS: u32 = 10;
const STRIPE_COLUMN_STRIDE: usize = 10;
const STRIPE_BRIGHTNESS_DELTA: f64 = 30.0;
const STRIPE_CHANGES_PER_ROW: u32 = 3;

const DOMINANT_GREEN: f64 = 0.30;
const DOMINANT_YELLOW: f64 = 0.10;
const DOMINANT_WHITE: f64 = 0.10;
const DOMINANT_DARK: f64 = 0.20;

const SPOT_CREAMY_YELLOW: f64 = 0.15;
const SPOT_PALE_YELLOW: f64 = 0.08;
const SPOT_WHITE: f64 = 0.15;
const SPOT_GREEN: f64 = 0.60;

/// Running counts over the sampled pixels.
#[derive(Debug, Default)]
struct PixelTally {
    sampled: u64,
    sum_r: u64,
    sum_g: u64,
    sum_b: u64,
    green: u64,
    yellow: u64,
    white: u64,
    dark: u64,
}

impl PixelTally {
    fn add(&mut self, r: u8, g: u8, b: u8) {
        self.sampled += 1;
        self.sum_r += r as u64;
        self.sum_g += g as u64;
        self.sum_b += b as u64;

        if brightness(r, g, b) < 100.0 {
            self.dark += 1;
        }
        if g > r && g > b && g > 100 {
            self.green += 1;
        }
        if r > 200 && g > 200 && b < 150 {
            self.yellow += 1;
        }
        if r > 220 && g > 220 && b > 220 {
            self.white += 1;
        }
    }

    fn ratio(&self, count: u64) -> f64 {
        if self.sampled == 0 {
            return 0.0;
        }
        count as f64 / self.sampled as f64
    }

    fn average(&self, sum: u64) -> u8 {
        if self.sampled == 0 {
            return 0;
        }
        (sum as f64 / self.sampled as f64).round() as u8
    }
}

fn brightness(r: u8, g: u8, b: u8) -> f64 {
    (r as f64 + g as f64 + b as f64) / 3.0
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub struct ColorAnalyzer {
    max_dimension: u32,
}

impl ColorAnalyzer {
    pub fn new() -> Self {
        Self::with_max_dimension(DEFAULT_MAX_DIMENSION)
    }

    pub fn with_max_dimension(max_dimension: u32) -> Self {
        Self {
            max_dimension: max_dimension.max(1),
        }
    }

    /// Summarizes the colors and stripe pattern of a decoded image.
    ///
    /// Returns `None` when the buffer does not describe a valid RGB/RGBA
    /// raster or cannot be resampled.
    pub fn analyze(&self, image: &RawImage) -> Option<ImageSummary> {
        let expected = image.width as usize * image.height as usize * image.channels as usize;
        if !matches!(image.channels, 3 | 4) || image.pixels.len() != expected {
            debug!(
                "Rejecting raster {}x{}x{} with {} samples",
                image.width,
                image.height,
                image.channels,
                image.pixels.len()
            );
            return None;
        }

        let raster = self.downscale(image)?;
        let summary = self.summarize(&raster);
        debug!("Image summary: {:?}", summary);
        Some(summary)
    }

    fn downscale<'a>(&self, image: &'a RawImage) -> Option<Cow<'a, RawImage>> {
        if image.width <= self.max_dimension && image.height <= self.max_dimension {
            return Some(Cow::Borrowed(image));
        }

        let (width, height) = (image.width, image.height);
        let dynamic = match image.channels {
            3 => DynamicImage::ImageRgb8(ImageBuffer::from_raw(
                width,
                height,
                image.pixels.clone(),
            )?),
            4 => DynamicImage::ImageRgba8(ImageBuffer::from_raw(
                width,
                height,
                image.pixels.clone(),
            )?),
            _ => return None,
        };

        let resized = dynamic.resize(self.max_dimension, self.max_dimension, FilterType::Lanczos3);
        let (new_width, new_height) = resized.dimensions();
        let pixels = if image.channels == 4 {
            resized.to_rgba8().into_raw()
        } else {
            resized.to_rgb8().into_raw()
        };

        debug!(
            "Downscaled {}x{} to {}x{} for analysis",
            width, height, new_width, new_height
        );

        RawImage::new(new_width, new_height, image.channels, pixels).map(Cow::Owned)
    }

    fn summarize(&self, image: &RawImage) -> ImageSummary {
        let channels = image.channels as usize;
        let mut tally = PixelTally::default();

        for px in image
            .pixels
            .chunks_exact(channels)
            .step_by(PIXEL_SAMPLE_STRIDE)
        {
            tally.add(px[0], px[1], px[2]);
        }

        let green = tally.ratio(tally.green);
        let yellow = tally.ratio(tally.yellow);
        let white = tally.ratio(tally.white);
        let dark = tally.ratio(tally.dark);

        let mut dominant_colors = Vec::new();
        if green > DOMINANT_GREEN {
            dominant_colors.push(ColorTag::Green);
        }
        if yellow > DOMINANT_YELLOW {
            dominant_colors.push(ColorTag::Yellow);
        }
        if white > DOMINANT_WHITE {
            dominant_colors.push(ColorTag::White);
        }
        if dark > DOMINANT_DARK {
            dominant_colors.push(ColorTag::Dark);
        }

        let field_spot_estimate = if yellow > SPOT_CREAMY_YELLOW {
            FieldSpotEstimate::CreamyYellow
        } else if yellow > SPOT_PALE_YELLOW {
            FieldSpotEstimate::PaleYellow
        } else if white > SPOT_WHITE {
            FieldSpotEstimate::White
        } else if green > SPOT_GREEN {
            FieldSpotEstimate::Green
        } else {
            FieldSpotEstimate::Unknown
        };

        ImageSummary {
            dominant_colors,
            field_spot_estimate,
            has_stripes: self.detect_stripes(image),
            avg_color: AvgColor {
                r: tally.average(tally.sum_r),
                g: tally.average(tally.sum_g),
                b: tally.average(tally.sum_b),
            },
            color_ratios: ColorRatios {
                green: round2(green),
                yellow: round2(yellow),
                white: round2(white),
                dark: round2(dark),
            },
            image_info: ImageInfo {
                width: image.width,
                height: image.height,
                channels: image.channels,
            },
        }
    }

    /// Counts brightness jumps along evenly spaced rows. The running
    /// brightness starts at zero on each row, so the first sample of a
    /// non-dark row always registers as a change.
    fn detect_stripes(&self, image: &RawImage) -> bool {
        let sample_rows = image.height.min(STRIPE_SAMPLE_ROWS);
        let width = image.width as usize;
        let channels = image.channels as usize;
        let mut variations = 0u32;

        for row in 0..sample_rows {
            let y = (row as u64 * image.height as u64 / sample_rows as u64) as usize;
            let mut last_brightness = 0.0;

            for x in (0..width).step_by(STRIPE_COLUMN_STRIDE) {
                let i = (y * width + x) * channels;
                let px = &image.pixels[i..i + 3];
                let current = brightness(px[0], px[1], px[2]);

                if (current - last_brightness).abs() > STRIPE_BRIGHTNESS_DELTA {
                    variations += 1;
                }
                last_brightness = current;
            }
        }

        variations > sample_rows * STRIPE_CHANGES_PER_ROW
    }
}

impl Default for ColorAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
