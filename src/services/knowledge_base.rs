// src/services/knowledge_base.rs
#[derive(Debug, Clone, Copy)]
pub struct Indicator {
    pub name: &'static str,
    pub score: u8,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct Variety {
    pub name: &'static str,
    pub size: &'static str,
    pub shape: &'static str,
    pub sweetness: u8,
}

pub const FIELD_SPOT_INDICATORS: [Indicator; 4] = [
    Indicator { name: "creamy_yellow", score: 10, description: "Perfect ripeness" },
    Indicator { name: "pale_yellow", score: 8, description: "Good ripeness" },
    Indicator { name: "white", score: 5, description: "Possibly underripe" },
    Indicator { name: "green", score: 2, description: "Likely underripe" },
];

pub const STEM_INDICATORS: [Indicator; 3] = [
    Indicator { name: "dry_brown", score: 10, description: "Naturally ripened" },
    Indicator { name: "missing", score: 6, description: "Cannot determine" },
    Indicator { name: "green", score: 2, description: "Picked too early" },
];

pub const VARIETIES: [Variety; 3] = [
    Variety { name: "sugar_baby", size: "small", shape: "round", sweetness: 9 },
    Variety { name: "crimson_sweet", size: "large", shape: "oblong", sweetness: 8 },
    Variety { name: "charleston_gray", size: "large", shape: "oblong", sweetness: 7 },
];

/// Renders the static knowledge base as a keyed JSON document.
pub fn knowledge_base() -> serde_json::Value {
    let indicators = |entries: &[Indicator]| {
        entries
            .iter()
            .map(|i| {
                (
                    i.name.to_string(),
                    serde_json::json!({ "score": i.score, "description": i.description }),
                )
            })
            .collect::<serde_json::Map<_, _>>()
    };

    let varieties = VARIETIES
        .iter()
        .map(|v| {
            (
                v.name.to_string(),
                serde_json::json!({ "size": v.size, "shape": v.shape, "sweetness": v.sweetness }),
            )
        })
        .collect::<serde_json::Map<_, _>>();

    serde_json::json!({
        "ripeness_indicators": {
            "field_spot": indicators(&FIELD_SPOT_INDICATORS[..]),
            "stem": indicators(&STEM_INDICATORS[..]),
        },
        "varieties": varieties,
    })
}
