use chrono::NaiveDate;
use starpair_core::{
    fallback_bundle, horoscope, score, CompatibilityTier, PersonInput, Sign,
};

fn input(name: &str, birth: &str) -> PersonInput {
    PersonInput {
        name: Some(name.to_string()),
        gender: Some("female".to_string()),
        birth: Some(birth.to_string()),
        zodiac_sign: None,
    }
}

#[test]
fn birth_dates_flow_through_to_a_complete_bundle() {
    let p1 = input("Mai", "1990-04-05").resolve();
    let p2 = input("Tuan", "02/06/1991").resolve();
    assert_eq!(p1.zodiac_sign, Sign::Aries);
    assert_eq!(p2.zodiac_sign, Sign::Gemini);

    let bundle = fallback_bundle(&p1, &p2);
    assert_eq!(bundle.compatibility_score, 98);
    assert_eq!(bundle.compatibility_tier, CompatibilityTier::DestinedMatch);
    assert!(bundle.is_complete());
    assert!(bundle.personality_analysis.contains("Mai"));
    assert!(bundle.personality_analysis.contains("Tuan"));
}

#[test]
fn bundle_is_reproducible_and_order_insensitive_in_score() {
    let p1 = input("A", "1988-11-30").resolve();
    let p2 = input("B", "1992-02-20").resolve();
    assert_eq!(fallback_bundle(&p1, &p2), fallback_bundle(&p1, &p2));
    assert_eq!(
        fallback_bundle(&p1, &p2).compatibility_score,
        fallback_bundle(&p2, &p1).compatibility_score
    );
    assert_eq!(score(p1.zodiac_sign, p2.zodiac_sign), score(p2.zodiac_sign, p1.zodiac_sign));
}

#[test]
fn bundle_serializes_with_tier_label() {
    let p1 = input("A", "1990-07-01").resolve();
    let p2 = input("B", "1990-07-02").resolve();
    let json = serde_json::to_value(fallback_bundle(&p1, &p2)).unwrap();
    assert_eq!(json["compatibility_tier"], "promising, needs time");
    assert_eq!(json["product_recommendations"].as_array().unwrap().len(), 5);
}

#[test]
fn horoscope_is_stable_for_a_given_day() {
    let day = NaiveDate::from_ymd_opt(2025, 10, 17).unwrap();
    let first = horoscope(Sign::Pisces, day);
    let second = horoscope(Sign::Pisces, day);
    assert_eq!(first, second);
    assert_eq!(first.sign, Sign::Pisces);
}
