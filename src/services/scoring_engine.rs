// src/services/scoring_engine.rs
use crate::models::*;

const FIELD_SPOT_WEIGHT: u32 = 30;
const STEM_WEIGHT: u32 = 25;
const SIZE_SHAPE_WEIGHT: u32 = 20;
const STRIPES_WEIGHT: u32 = 15;
const IMAGE_WEIGHT: u32 = 20;

const IMAGE_BASE_SCORE: f64 = 10.0;
// Share of the field spot table applied to an estimate from the photo.
const IMAGE_FIELD_SPOT_FACTOR: f64 = 0.3;
const IMAGE_FIELD_SPOT_CAP: f64 = 10.0;
const IMAGE_STRIPE_BONUS: f64 = 5.0;

pub const GENERAL_TIPS: [&str; 8] = [
    "Look for a creamy yellow field spot where the watermelon sat on the ground",
    "The stem should be dry and brown, not green",
    "A ripe watermelon should sound hollow when tapped",
    "The watermelon should feel heavy for its size",
    "Look for a dull, matte skin rather than shiny",
    "Avoid watermelons with soft spots, bruises, or cuts",
    "The best watermelons have prominent stripes and uniform shape",
    "A good watermelon should have a sweet aroma at the blossom end",
];

/// Accumulates score, attainable maximum and feedback across categories.
#[derive(Debug, Default)]
struct Tally {
    score: f64,
    max_score: u32,
    feedback: Vec<String>,
}

impl Tally {
    fn add<I>(&mut self, weight: u32, score: f64, feedback: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.max_score += weight;
        self.score += score;
        self.feedback
            .extend(feedback.into_iter().filter(|line| !line.is_empty()));
    }

    fn percentage(&self) -> u32 {
        if self.max_score == 0 {
            return 0;
        }
        ((self.score / self.max_score as f64) * 100.0).round() as u32
    }
}

/// Image category result; unlike the attribute categories it can carry
/// several feedback lines.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageScore {
    pub score: f64,
    pub feedback: Vec<String>,
}

pub struct ScoringEngine;

impl ScoringEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn score(&self, inputs: &UserInputs, summary: Option<&ImageSummary>) -> Recommendation {
        let mut tally = Tally::default();

        if let Some(field_spot) = &inputs.field_spot {
            let breakdown = self.field_spot(field_spot);
            tally.add(FIELD_SPOT_WEIGHT, breakdown.score, [breakdown.feedback]);
        }

        if let Some(stem) = &inputs.stem {
            let breakdown = self.stem(stem);
            tally.add(STEM_WEIGHT, breakdown.score, [breakdown.feedback]);
        }

        if let (Some(size), Some(shape)) = (&inputs.size, &inputs.shape) {
            let breakdown = self.size_shape(size, shape);
            tally.add(SIZE_SHAPE_WEIGHT, breakdown.score, [breakdown.feedback]);
        }

        if let Some(stripes) = &inputs.stripes {
            let breakdown = self.stripes(stripes);
            tally.add(STRIPES_WEIGHT, breakdown.score, [breakdown.feedback]);
        }

        if inputs.has_image {
            let image = self.image(inputs, summary);
            tally.add(IMAGE_WEIGHT, image.score, image.feedback);
        }

        let percentage = tally.percentage();
        let tier = QualityTier::from_percentage(percentage);

        Recommendation {
            quality: tier.label(),
            quality_class: tier,
            recommendation: tier.recommendation(),
            percentage,
            feedback: tally.feedback,
            tips: Self::tips(),
            score: tally.score,
            max_score: tally.max_score,
        }
    }

    pub fn tips() -> Vec<&'static str> {
        GENERAL_TIPS.to_vec()
    }

    pub fn field_spot(&self, field_spot: &FieldSpot) -> ScoreBreakdown {
        match field_spot {
            FieldSpot::CreamyYellow => ScoreBreakdown::new(
                30.0,
                "✅ Excellent field spot! The creamy yellow indicates perfect ripeness.",
            ),
            FieldSpot::PaleYellow => {
                ScoreBreakdown::new(25.0, "✅ Good field spot color, should be ripe.")
            }
            FieldSpot::White => ScoreBreakdown::new(
                15.0,
                "⚠️ White field spot suggests it might be underripe.",
            ),
            FieldSpot::Green => ScoreBreakdown::new(
                5.0,
                "❌ Green or missing field spot is a red flag - likely underripe.",
            ),
            FieldSpot::Other(_) => ScoreBreakdown::new(0.0, ""),
        }
    }

    pub fn stem(&self, stem: &Stem) -> ScoreBreakdown {
        match stem {
            Stem::DryBrown => ScoreBreakdown::new(
                25.0,
                "✅ Perfect! Dry brown stem means it ripened naturally on the vine.",
            ),
            Stem::Missing => ScoreBreakdown::new(
                15.0,
                "⚠️ Missing stem is okay, but harder to judge ripeness.",
            ),
            Stem::Green => {
                ScoreBreakdown::new(5.0, "❌ Green stem suggests it was picked too early.")
            }
            Stem::Other(_) => ScoreBreakdown::new(0.0, ""),
        }
    }

    pub fn size_shape(&self, size: &Size, shape: &Shape) -> ScoreBreakdown {
        let optimal = matches!(
            (size, shape),
            (Size::Medium, Shape::Round)
                | (Size::Large, Shape::Round)
                | (Size::Large, Shape::Oblong)
                | (Size::ExtraLarge, Shape::Oblong)
        );

        if optimal {
            ScoreBreakdown::new(
                20.0,
                "✅ Great size and shape combination for optimal sweetness.",
            )
        } else if *size == Size::Small {
            ScoreBreakdown::new(
                10.0,
                "⚠️ Small watermelons can be sweet but have less flesh.",
            )
        } else {
            ScoreBreakdown::new(15.0, "✅ Decent size and shape.")
        }
    }

    /// Unrecognized patterns still earn the mottled score.
    pub fn stripes(&self, stripes: &StripePattern) -> ScoreBreakdown {
        match stripes {
            StripePattern::DarkLight => {
                ScoreBreakdown::new(15.0, "✅ Classic stripe pattern looks good!")
            }
            StripePattern::SolidDark => {
                ScoreBreakdown::new(12.0, "✅ Solid dark pattern is acceptable.")
            }
            StripePattern::LightDark => {
                ScoreBreakdown::new(13.0, "✅ Light with dark stripes looks good.")
            }
            StripePattern::Mottled => {
                ScoreBreakdown::new(10.0, "⚠️ Mottled pattern is less ideal but okay.")
            }
            StripePattern::Other(_) => {
                ScoreBreakdown::new(10.0, "✅ Stripe pattern is acceptable.")
            }
        }
    }

    pub fn image(&self, inputs: &UserInputs, summary: Option<&ImageSummary>) -> ImageScore {
        let Some(summary) = summary else {
            return ImageScore {
                score: IMAGE_BASE_SCORE,
                feedback: vec!["✅ Great job providing a photo for visual analysis!".to_string()],
            };
        };

        let mut score = IMAGE_BASE_SCORE;
        let mut feedback = Vec::new();

        if inputs.field_spot.is_none() {
            if let Some(estimate) = summary.field_spot_estimate.as_field_spot() {
                let breakdown = self.field_spot(&estimate);
                score += (breakdown.score * IMAGE_FIELD_SPOT_FACTOR).min(IMAGE_FIELD_SPOT_CAP);
                feedback.push(format!(
                    "🤖 AI detected {} field spot in image",
                    summary.field_spot_estimate.as_str().replacen('-', " ", 1)
                ));
            }
        }

        if inputs.stripes.is_none() && summary.has_stripes {
            score += IMAGE_STRIPE_BONUS;
            feedback.push(
                "🤖 AI detected stripe patterns in the image - good visual indicator!".to_string(),
            );
        }

        if !summary.dominant_colors.is_empty() {
            let tones: Vec<&str> = summary
                .dominant_colors
                .iter()
                .map(|tag| match tag {
                    ColorTag::Green => "green",
                    ColorTag::Yellow => "yellow",
                    ColorTag::White => "white",
                    ColorTag::Dark => "dark",
                })
                .collect();
            feedback.push(format!(
                "🤖 AI analysis: Detected {} tones",
                tones.join(", ")
            ));
        }

        feedback.push("✅ Image analysis provided additional insights!".to_string());

        ImageScore {
            score: score.min(IMAGE_WEIGHT as f64),
            feedback,
        }
    }
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(estimate: FieldSpotEstimate, has_stripes: bool, tags: Vec<ColorTag>) -> ImageSummary {
        ImageSummary {
            dominant_colors: tags,
            field_spot_estimate: estimate,
            has_stripes,
            avg_color: AvgColor { r: 90, g: 140, b: 60 },
            color_ratios: ColorRatios::default(),
            image_info: ImageInfo {
                width: 400,
                height: 300,
                channels: 3,
            },
        }
    }

    fn inputs(
        field_spot: Option<&str>,
        stem: Option<&str>,
        size: Option<&str>,
        shape: Option<&str>,
        stripes: Option<&str>,
        has_image: bool,
    ) -> UserInputs {
        UserInputs {
            size: size.map(Size::from),
            shape: shape.map(Shape::from),
            stripes: stripes.map(StripePattern::from),
            field_spot: field_spot.map(FieldSpot::from),
            stem: stem.map(Stem::from),
            has_image,
        }
    }

    #[test]
    fn ideal_melon_scores_full_marks() {
        let engine = ScoringEngine::new();
        let rec = engine.score(
            &inputs(
                Some("creamy-yellow"),
                Some("dry-brown"),
                Some("large"),
                Some("round"),
                Some("dark-light"),
                false,
            ),
            None,
        );

        assert_eq!(rec.score, 90.0);
        assert_eq!(rec.max_score, 90);
        assert_eq!(rec.percentage, 100);
        assert_eq!(rec.quality_class, QualityTier::Excellent);
        assert_eq!(rec.quality, "Excellent Choice!");
        assert_eq!(rec.feedback.len(), 4);
        assert_eq!(rec.tips.len(), 8);
    }

    #[test]
    fn underripe_melon_is_poor() {
        let engine = ScoringEngine::new();
        let rec = engine.score(
            &inputs(
                Some("green"),
                Some("green"),
                Some("small"),
                Some("oblong"),
                Some("mottled"),
                false,
            ),
            None,
        );

        assert_eq!(rec.score, 30.0);
        assert_eq!(rec.max_score, 90);
        assert_eq!(rec.percentage, 33);
        assert_eq!(rec.quality_class, QualityTier::Poor);
        assert_eq!(
            rec.feedback,
            vec![
                "❌ Green or missing field spot is a red flag - likely underripe.",
                "❌ Green stem suggests it was picked too early.",
                "⚠️ Small watermelons can be sweet but have less flesh.",
                "⚠️ Mottled pattern is less ideal but okay.",
            ]
        );
    }

    #[test]
    fn photo_without_summary_earns_base_score() {
        let engine = ScoringEngine::new();
        let rec = engine.score(&inputs(None, None, None, None, None, true), None);

        assert_eq!(rec.score, 10.0);
        assert_eq!(rec.max_score, 20);
        assert_eq!(rec.percentage, 50);
        assert_eq!(rec.quality_class, QualityTier::Fair);
        assert_eq!(
            rec.feedback,
            vec!["✅ Great job providing a photo for visual analysis!"]
        );
    }

    #[test]
    fn no_inputs_gives_zero_percentage() {
        let rec = ScoringEngine::new().score(&UserInputs::default(), None);
        assert_eq!(rec.score, 0.0);
        assert_eq!(rec.max_score, 0);
        assert_eq!(rec.percentage, 0);
        assert_eq!(rec.quality_class, QualityTier::Poor);
        assert!(rec.feedback.is_empty());
    }

    #[test]
    fn estimated_field_spot_adds_weighted_bonus() {
        let engine = ScoringEngine::new();
        let image = summary(FieldSpotEstimate::CreamyYellow, false, vec![]);
        let result = engine.image(&inputs(None, None, None, None, None, true), Some(&image));

        assert_eq!(result.score, 19.0);
        assert_eq!(
            result.feedback,
            vec![
                "🤖 AI detected creamy yellow field spot in image",
                "✅ Image analysis provided additional insights!",
            ]
        );

        let pale = summary(FieldSpotEstimate::PaleYellow, false, vec![]);
        let result = engine.image(&inputs(None, None, None, None, None, true), Some(&pale));
        assert_eq!(result.score, 17.5);
    }

    #[test]
    fn user_field_spot_suppresses_estimate() {
        let engine = ScoringEngine::new();
        let image = summary(FieldSpotEstimate::CreamyYellow, false, vec![]);
        let result = engine.image(
            &inputs(Some("white"), None, None, None, None, true),
            Some(&image),
        );

        assert_eq!(result.score, 10.0);
        assert_eq!(
            result.feedback,
            vec!["✅ Image analysis provided additional insights!"]
        );
    }

    #[test]
    fn image_score_is_capped() {
        let engine = ScoringEngine::new();
        let image = summary(
            FieldSpotEstimate::CreamyYellow,
            true,
            vec![ColorTag::Green, ColorTag::Dark],
        );
        let result = engine.image(&inputs(None, None, None, None, None, true), Some(&image));

        assert_eq!(result.score, 20.0);
        assert_eq!(
            result.feedback,
            vec![
                "🤖 AI detected creamy yellow field spot in image",
                "🤖 AI detected stripe patterns in the image - good visual indicator!",
                "🤖 AI analysis: Detected green, dark tones",
                "✅ Image analysis provided additional insights!",
            ]
        );
    }

    #[test]
    fn stripe_bonus_requires_missing_user_stripes() {
        let engine = ScoringEngine::new();
        let image = summary(FieldSpotEstimate::Unknown, true, vec![]);

        let result = engine.image(&inputs(None, None, None, None, None, true), Some(&image));
        assert_eq!(result.score, 15.0);

        let result = engine.image(
            &inputs(None, None, None, None, Some("dark-light"), true),
            Some(&image),
        );
        assert_eq!(result.score, 10.0);
    }

    #[test]
    fn unrecognized_values_score_zero_except_stripes() {
        let engine = ScoringEngine::new();
        let rec = engine.score(
            &inputs(Some("purple"), Some("twig"), None, None, Some("zigzag"), false),
            None,
        );

        assert_eq!(rec.score, 10.0);
        assert_eq!(rec.max_score, 70);
        assert_eq!(rec.feedback, vec!["✅ Stripe pattern is acceptable."]);
    }

    #[test]
    fn size_shape_needs_both_attributes() {
        let engine = ScoringEngine::new();
        let rec = engine.score(&inputs(None, None, Some("large"), None, None, false), None);
        assert_eq!(rec.max_score, 0);

        assert_eq!(
            engine.size_shape(&Size::ExtraLarge, &Shape::Round).score,
            15.0
        );
        assert_eq!(engine.size_shape(&Size::Small, &Shape::Round).score, 10.0);
        assert_eq!(engine.size_shape(&Size::Medium, &Shape::Round).score, 20.0);
        assert_eq!(
            engine
                .size_shape(&Size::Other("huge".to_string()), &Shape::Oblong)
                .score,
            15.0
        );
    }

    #[test]
    fn score_stays_within_bounds_for_all_inputs() {
        let engine = ScoringEngine::new();
        let field_spots = [None, Some("creamy-yellow"), Some("pale-yellow"), Some("white"), Some("green"), Some("?")];
        let stems = [None, Some("dry-brown"), Some("missing"), Some("green"), Some("?")];
        let sizes = [None, Some("small"), Some("medium"), Some("large"), Some("extra-large")];
        let shapes = [None, Some("round"), Some("oblong")];
        let stripes = [None, Some("dark-light"), Some("solid-dark"), Some("light-dark"), Some("mottled"), Some("?")];
        let images = [
            None,
            Some(summary(FieldSpotEstimate::CreamyYellow, true, vec![ColorTag::Yellow])),
            Some(summary(FieldSpotEstimate::Unknown, false, vec![])),
        ];

        for fs in field_spots {
            for st in stems {
                for sz in sizes {
                    for sh in shapes {
                        for sp in stripes {
                            for image in &images {
                                for has_image in [false, true] {
                                    let rec = engine.score(
                                        &inputs(fs, st, sz, sh, sp, has_image),
                                        image.as_ref(),
                                    );
                                    assert!(rec.score >= 0.0);
                                    assert!(rec.score <= rec.max_score as f64);
                                    assert!(rec.percentage <= 100);
                                    assert!(rec.feedback.iter().all(|line| !line.is_empty()));
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn riper_field_spot_never_lowers_score() {
        let engine = ScoringEngine::new();
        for stem in [None, Some("dry-brown"), Some("green")] {
            for has_image in [false, true] {
                let green = engine.score(
                    &inputs(Some("green"), stem, Some("medium"), Some("round"), None, has_image),
                    None,
                );
                let creamy = engine.score(
                    &inputs(Some("creamy-yellow"), stem, Some("medium"), Some("round"), None, has_image),
                    None,
                );
                assert!(creamy.score >= green.score);
            }
        }
    }

    #[test]
    fn scoring_is_deterministic() {
        let engine = ScoringEngine::new();
        let melon = inputs(Some("pale-yellow"), Some("missing"), Some("large"), Some("round"), None, true);
        let image = summary(FieldSpotEstimate::White, true, vec![ColorTag::Green, ColorTag::White]);

        let first = serde_json::to_value(engine.score(&melon, Some(&image))).unwrap();
        let second = serde_json::to_value(engine.score(&melon, Some(&image))).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn recommendation_serializes_for_clients() {
        let rec = ScoringEngine::new().score(
            &inputs(Some("pale-yellow"), Some("missing"), None, None, None, false),
            None,
        );
        let json = serde_json::to_value(&rec).unwrap();

        assert_eq!(json["qualityClass"], "good");
        assert_eq!(json["quality"], "Good Choice");
        assert_eq!(json["maxScore"], 55);
        assert_eq!(json["percentage"], 73);
        assert_eq!(json["tips"].as_array().unwrap().len(), 8);
    }
}
