//! Validation and repair of generative-text responses.
//!
//! The model's reply is an untrusted payload. It is reduced to a single JSON
//! object, parsed into a loose `serde_json::Value`, and only the expected
//! section keys are read back out. Score, tier and tier description are
//! always taken from the deterministic engine.

use regex::Regex;
use serde_json::{Map, Value};
use starpair_core::{
    product_recommendations, CompatibilityTier, NarrativeBundle, Person, ProductRecommendation,
    PRODUCT_IMAGE,
};
use thiserror::Error;

/// Replies shorter than this (in characters, after trimming) are rejected.
pub const MIN_RESPONSE_CHARS: usize = 50;

const REFUSAL_PREFIXES: [&str; 8] = [
    "i'm sorry",
    "i am sorry",
    "sorry,",
    "i apologize",
    "i cannot",
    "i can't",
    "i'm unable",
    "as an ai",
];

const TEXT_SECTIONS: [&str; 8] = [
    "zodiac_summary",
    "personality_analysis",
    "differences",
    "strengths",
    "life_benefits",
    "work_benefits",
    "love_benefits",
    "advice",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResponseError {
    #[error("response too short ({0} characters)")]
    TooShort(usize),

    #[error("response is a refusal")]
    Refusal,

    #[error("no JSON object found in response")]
    NoJsonObject,

    #[error("malformed JSON: {0}")]
    Malformed(String),

    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
}

/// Turn a raw model reply into a complete bundle, or say why it can't be used.
pub fn parse_narrative_response(
    raw: &str,
    person1: &Person,
    person2: &Person,
    score: u8,
    tier: CompatibilityTier,
) -> Result<NarrativeBundle, ResponseError> {
    let text = raw.trim();

    let chars = text.chars().count();
    if chars < MIN_RESPONSE_CHARS {
        return Err(ResponseError::TooShort(chars));
    }
    if is_refusal(text) {
        return Err(ResponseError::Refusal);
    }

    let object = extract_json_object(strip_code_fences(text)).ok_or(ResponseError::NoJsonObject)?;
    let value = parse_with_repair(object)?;
    let fields = match value {
        Value::Object(fields) => fields,
        _ => return Err(ResponseError::NoJsonObject),
    };

    let section = |key: &str| text_field(&fields, key);

    let mut products = products_field(&fields);
    if products.is_empty() {
        products = product_recommendations(person1.zodiac_sign, person2.zodiac_sign);
    }

    let bundle = NarrativeBundle {
        compatibility_score: score,
        compatibility_tier: tier,
        tier_description: tier.description().to_string(),
        zodiac_summary: section(TEXT_SECTIONS[0]),
        personality_analysis: section(TEXT_SECTIONS[1]),
        differences: if tier.is_top() {
            String::new()
        } else {
            section(TEXT_SECTIONS[2])
        },
        strengths: section(TEXT_SECTIONS[3]),
        life_benefits: section(TEXT_SECTIONS[4]),
        work_benefits: section(TEXT_SECTIONS[5]),
        love_benefits: section(TEXT_SECTIONS[6]),
        advice: section(TEXT_SECTIONS[7]),
        product_recommendations: products,
    };

    let missing = bundle.missing_fields();
    if !missing.is_empty() {
        return Err(ResponseError::MissingFields(missing));
    }
    Ok(bundle)
}

fn is_refusal(text: &str) -> bool {
    let lowered = text.to_lowercase();
    REFUSAL_PREFIXES
        .iter()
        .any(|prefix| lowered.starts_with(prefix))
}

/// Remove a leading ```` ``` ```` / ```` ```json ```` fence and its closing fence.
pub(crate) fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the info string ("json", "JSON", ...) up to the first newline.
    let rest = match rest.find('\n') {
        Some(newline) if !rest[..newline].contains('{') => &rest[newline + 1..],
        _ => rest.trim_start_matches(|c: char| c.is_ascii_alphabetic()),
    };
    let rest = rest.trim_end();
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Slice from the first `{` to the last `}`.
pub(crate) fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

fn parse_with_repair(object: &str) -> Result<Value, ResponseError> {
    match serde_json::from_str(object) {
        Ok(value) => Ok(value),
        Err(first) => {
            let repaired = remove_trailing_commas(object)?;
            serde_json::from_str(&repaired)
                .map_err(|_| ResponseError::Malformed(first.to_string()))
        }
    }
}

fn remove_trailing_commas(object: &str) -> Result<String, ResponseError> {
    let trailing_comma =
        Regex::new(r",\s*([}\]])").map_err(|e| ResponseError::Malformed(e.to_string()))?;
    Ok(trailing_comma.replace_all(object, "$1").into_owned())
}

fn text_field(fields: &Map<String, Value>, key: &str) -> String {
    fields
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or_default()
        .to_string()
}

/// Products with at least a name; anything else in the array is dropped.
fn products_field(fields: &Map<String, Value>) -> Vec<ProductRecommendation> {
    let Some(items) = fields.get("product_recommendations").and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(Value::as_object)
        .filter_map(|item| {
            let name = text_field(item, "name");
            if name.is_empty() {
                return None;
            }
            let or = |key: &str, default: &str| {
                let value = text_field(item, key);
                if value.is_empty() {
                    default.to_string()
                } else {
                    value
                }
            };
            Some(ProductRecommendation {
                name,
                description: text_field(item, "description"),
                image_url: or("image_url", PRODUCT_IMAGE),
                price: text_field(item, "price"),
                shop_url: or("shop_url", "#"),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use starpair_core::{narrate, Sign};

    fn pair() -> (Person, Person) {
        let person = |name: &str, sign| Person {
            name: name.to_string(),
            gender: String::new(),
            birth: String::new(),
            zodiac_sign: sign,
        };
        (person("Mai", Sign::Taurus), person("Tuan", Sign::Leo))
    }

    fn full_payload() -> Value {
        json!({
            "zodiac_summary": "Taurus and Leo share a love of comfort and loyalty.",
            "personality_analysis": "Mai is steady. Tuan is bright.",
            "differences": "Mai plans ahead while Tuan improvises.",
            "strengths": "They are both loyal.",
            "life_benefits": "A warm home.",
            "work_benefits": "Solid execution with flair.",
            "love_benefits": "Devoted partners.",
            "advice": "Take turns leading.",
            "product_recommendations": [
                {"name": "Rose quartz", "description": "For harmony", "price": "150.000 VND"}
            ]
        })
    }

    fn parse(raw: &str) -> Result<NarrativeBundle, ResponseError> {
        let (p1, p2) = pair();
        parse_narrative_response(raw, &p1, &p2, 55, CompatibilityTier::NeedsEffort)
    }

    #[test]
    fn fences_are_stripped() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```json{\"a\":1}```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("{\"a\":1}"), "{\"a\":1}");
    }

    #[test]
    fn object_is_cut_out_of_surrounding_prose() {
        assert_eq!(
            extract_json_object("Here you go: {\"a\": {\"b\": 2}} Enjoy!"),
            Some("{\"a\": {\"b\": 2}}")
        );
        assert_eq!(extract_json_object("no braces here"), None);
        assert_eq!(extract_json_object("} backwards {"), None);
    }

    #[test]
    fn valid_payload_keeps_deterministic_score() {
        let mut payload = full_payload();
        payload["compatibility_score"] = json!(12);
        payload["compatibility_tier"] = json!("destined match");

        let bundle = parse(&payload.to_string()).unwrap();
        assert_eq!(bundle.compatibility_score, 55);
        assert_eq!(bundle.compatibility_tier, CompatibilityTier::NeedsEffort);
        assert_eq!(
            bundle.tier_description,
            CompatibilityTier::NeedsEffort.description()
        );
        assert_eq!(bundle.advice, "Take turns leading.");
        assert_eq!(bundle.product_recommendations.len(), 1);
        assert_eq!(bundle.product_recommendations[0].image_url, PRODUCT_IMAGE);
        assert_eq!(bundle.product_recommendations[0].shop_url, "#");
    }

    #[test]
    fn trailing_commas_are_repaired_once() {
        let raw = r#"{
            "zodiac_summary": "Taurus and Leo share a love of comfort.",
            "personality_analysis": "Mai is steady. Tuan is bright.",
            "differences": "Pace.",
            "strengths": "Loyalty.",
            "life_benefits": "Home.",
            "work_benefits": "Execution.",
            "love_benefits": "Devotion.",
            "advice": "Take turns.",
            "product_recommendations": [],
        }"#;
        let bundle = parse(raw).unwrap();
        assert_eq!(bundle.strengths, "Loyalty.");
    }

    #[test]
    fn missing_products_are_filled_from_canned_list() {
        let mut payload = full_payload();
        payload
            .as_object_mut()
            .unwrap()
            .remove("product_recommendations");
        let bundle = parse(&payload.to_string()).unwrap();
        assert_eq!(
            bundle.product_recommendations,
            product_recommendations(Sign::Taurus, Sign::Leo)
        );
    }

    #[test]
    fn blank_section_is_reported() {
        let mut payload = full_payload();
        payload["strengths"] = json!("   ");
        payload["advice"] = json!(42);
        assert_eq!(
            parse(&payload.to_string()),
            Err(ResponseError::MissingFields(vec!["strengths", "advice"]))
        );
    }

    #[test]
    fn differences_optional_for_top_tier() {
        let (p1, p2) = pair();
        let mut payload = full_payload();
        payload["differences"] = json!("");
        let bundle = parse_narrative_response(
            &payload.to_string(),
            &p1,
            &p2,
            90,
            CompatibilityTier::DestinedMatch,
        )
        .unwrap();
        assert!(bundle.differences.is_empty());
        assert!(parse(&payload.to_string()).is_err());
    }

    #[test]
    fn top_tier_drops_model_differences() {
        let (p1, p2) = pair();
        let payload = full_payload();
        let bundle = parse_narrative_response(
            &payload.to_string(),
            &p1,
            &p2,
            98,
            CompatibilityTier::DestinedMatch,
        )
        .unwrap();
        assert_eq!(bundle.differences, "");
        let fallback = narrate(&p1, &p2, 98, CompatibilityTier::DestinedMatch);
        assert_eq!(bundle.differences, fallback.differences);
    }

    #[test]
    fn short_and_refusing_replies_are_rejected() {
        assert_eq!(parse("{}"), Err(ResponseError::TooShort(2)));
        assert_eq!(
            parse("I'm sorry, but I can't help with astrology readings for real people."),
            Err(ResponseError::Refusal)
        );
        assert_eq!(
            parse("As an AI language model I do not believe in horoscopes, but here is {}"),
            Err(ResponseError::Refusal)
        );
    }

    #[test]
    fn prose_without_json_is_rejected() {
        assert_eq!(
            parse("Taurus and Leo are a lovely match and will be very happy together forever."),
            Err(ResponseError::NoJsonObject)
        );
    }

    #[test]
    fn unrepairable_json_is_malformed() {
        let raw = "{\"zodiac_summary\": \"unterminated, \"strengths\": oops }  padding padding";
        assert!(matches!(parse(raw), Err(ResponseError::Malformed(_))));
    }
}
