// src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use uuid::Uuid;

/// Decoded raster handed to the color analyzer. Samples are row-major and
/// interleaved as R,G,B[,A].
#[derive(Debug, Clone)]
pub struct RawImage {
    pub width: u32,
    pub height: u32,
    pub channels: u8,
    pub pixels: Vec<u8>,
}

impl RawImage {
    pub fn new(width: u32, height: u32, channels: u8, pixels: Vec<u8>) -> Option<Self> {
        let expected = width as usize * height as usize * channels as usize;
        if !matches!(channels, 3 | 4) || pixels.len() != expected {
            return None;
        }
        Some(Self {
            width,
            height,
            channels,
            pixels,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTag {
    Green,
    Yellow,
    White,
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldSpotEstimate {
    CreamyYellow,
    PaleYellow,
    White,
    Green,
    Unknown,
}

impl FieldSpotEstimate {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldSpotEstimate::CreamyYellow => "creamy-yellow",
            FieldSpotEstimate::PaleYellow => "pale-yellow",
            FieldSpotEstimate::White => "white",
            FieldSpotEstimate::Green => "green",
            FieldSpotEstimate::Unknown => "unknown",
        }
    }

    /// The user-facing field spot this estimate corresponds to.
    pub fn as_field_spot(&self) -> Option<FieldSpot> {
        match self {
            FieldSpotEstimate::CreamyYellow => Some(FieldSpot::CreamyYellow),
            FieldSpotEstimate::PaleYellow => Some(FieldSpot::PaleYellow),
            FieldSpotEstimate::White => Some(FieldSpot::White),
            FieldSpotEstimate::Green => Some(FieldSpot::Green),
            FieldSpotEstimate::Unknown => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvgColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct ColorRatios {
    pub green: f64,
    pub yellow: f64,
    pub white: f64,
    pub dark: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub channels: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSummary {
    pub dominant_colors: Vec<ColorTag>,
    pub field_spot_estimate: FieldSpotEstimate,
    pub has_stripes: bool,
    pub avg_color: AvgColor,
    pub color_ratios: ColorRatios,
    pub image_info: ImageInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageMetadata {
    pub width: u32,
    pub height: u32,
    pub format: Option<String>,
    pub size: usize,
    pub has_alpha: bool,
}

// User attributes arrive as free-form strings; anything outside the known
// vocabulary is kept verbatim in `Other`.
macro_rules! attribute_enum {
    ($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub enum $name {
            $($variant,)+
            Other(String),
        }

        impl $name {
            pub fn as_str(&self) -> &str {
                match self {
                    $($name::$variant => $text,)+
                    $name::Other(value) => value.as_str(),
                }
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                match value {
                    $($text => $name::$variant,)+
                    other => $name::Other(other.to_string()),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }
    };
}

attribute_enum!(Size {
    Small => "small",
    Medium => "medium",
    Large => "large",
    ExtraLarge => "extra-large",
});

attribute_enum!(Shape {
    Round => "round",
    Oblong => "oblong",
});

attribute_enum!(StripePattern {
    DarkLight => "dark-light",
    SolidDark => "solid-dark",
    LightDark => "light-dark",
    Mottled => "mottled",
});

attribute_enum!(FieldSpot {
    CreamyYellow => "creamy-yellow",
    PaleYellow => "pale-yellow",
    White => "white",
    Green => "green",
});

attribute_enum!(Stem {
    DryBrown => "dry-brown",
    Missing => "missing",
    Green => "green",
});

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInputs {
    pub size: Option<Size>,
    pub shape: Option<Shape>,
    pub stripes: Option<StripePattern>,
    pub field_spot: Option<FieldSpot>,
    pub stem: Option<Stem>,
    pub has_image: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBreakdown {
    pub score: f64,
    pub feedback: String,
}

impl ScoreBreakdown {
    pub fn new(score: f64, feedback: &str) -> Self {
        Self {
            score,
            feedback: feedback.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl QualityTier {
    pub fn from_percentage(percentage: u32) -> Self {
        if percentage >= 80 {
            QualityTier::Excellent
        } else if percentage >= 65 {
            QualityTier::Good
        } else if percentage >= 45 {
            QualityTier::Fair
        } else {
            QualityTier::Poor
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            QualityTier::Excellent => "Excellent Choice!",
            QualityTier::Good => "Good Choice",
            QualityTier::Fair => "Fair Choice",
            QualityTier::Poor => "Poor Choice",
        }
    }

    pub fn recommendation(&self) -> &'static str {
        match self {
            QualityTier::Excellent => {
                "This watermelon shows all the signs of being perfectly ripe and delicious. Go for it!"
            }
            QualityTier::Good => "This watermelon looks promising. It should be sweet and juicy.",
            QualityTier::Fair => {
                "This watermelon might be okay, but there are some concerns about ripeness."
            }
            QualityTier::Poor => {
                "I'd recommend looking for a different watermelon with better ripeness indicators."
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub quality: &'static str,
    pub quality_class: QualityTier,
    pub recommendation: &'static str,
    pub percentage: u32,
    pub feedback: Vec<String>,
    pub tips: Vec<&'static str>,
    pub score: f64,
    pub max_score: u32,
}

/// Echo of what was submitted, returned alongside the recommendation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    #[serde(flatten)]
    pub inputs: UserInputs,
    pub image_analysis: Option<ImageSummary>,
    pub image_metadata: Option<ImageMetadata>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    pub success: bool,
    pub request_id: Uuid,
    pub analysis: AnalysisRequest,
    pub recommendation: Recommendation,
    pub timestamp: DateTime<Utc>,
}
