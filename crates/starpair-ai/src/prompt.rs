//! Prompt construction for the compatibility reading.

use starpair_core::{CompatibilityTier, DailyHoroscope, Person};

pub const COMPATIBILITY_INSTRUCTIONS: &str = include_str!("prompts/compatibility_instructions.md");

/// Everything the model is told about one person.
fn describe_person(label: &str, person: &Person, horoscope: &DailyHoroscope) -> String {
    let mut lines = vec![
        format!("{label}:"),
        format!("- Name: {}", or_unknown(&person.name)),
        format!("- Sign: {}", person.zodiac_sign.title()),
    ];
    if !person.gender.trim().is_empty() {
        lines.push(format!("- Gender: {}", person.gender.trim()));
    }
    if !person.birth.trim().is_empty() {
        lines.push(format!("- Born: {}", person.birth.trim()));
    }
    lines.push(format!("- Today's horoscope: {}", horoscope.description));
    lines.join("\n")
}

fn or_unknown(text: &str) -> &str {
    let text = text.trim();
    if text.is_empty() {
        "(not given)"
    } else {
        text
    }
}

/// Build the prompt for a pair whose score and tier are already fixed.
pub fn build_compatibility_prompt(
    person1: &Person,
    person2: &Person,
    horoscope1: &DailyHoroscope,
    horoscope2: &DailyHoroscope,
    score: u8,
    tier: CompatibilityTier,
) -> String {
    format!(
        "You are an astrologer writing a zodiac compatibility reading for two people.\n\n\
         {}\n\n{}\n\n\
         Compatibility score: {score}/100\n\
         Tier: {}\n\
         Tier meaning: {}\n\n\
         {}",
        describe_person("Person 1", person1, horoscope1),
        describe_person("Person 2", person2, horoscope2),
        tier.label(),
        tier.description(),
        COMPATIBILITY_INSTRUCTIONS.trim_end(),
    )
}
