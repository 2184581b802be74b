//! Deterministic pair scoring and tier classification.

use crate::{Element, Modality, Sign};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Base score for an unordered element pairing. Rules are checked in order.
const ELEMENT_RULES: [(Element, Element, i32); 2] = [
    (Element::Fire, Element::Air, 90),
    (Element::Earth, Element::Water, 88),
];

const ELEMENT_CLASH_RULES: [(Element, Element, i32); 2] = [
    (Element::Fire, Element::Water, 35),
    (Element::Earth, Element::Air, 45),
];

const SAME_ELEMENT_SCORE: i32 = 82;
const DEFAULT_ELEMENT_SCORE: i32 = 55;

/// Adjustment for an unordered modality pairing.
const MODALITY_RULES: [(Modality, Modality, i32); 6] = [
    (Modality::Cardinal, Modality::Mutable, 8),
    (Modality::Fixed, Modality::Mutable, 5),
    (Modality::Mutable, Modality::Mutable, 3),
    (Modality::Cardinal, Modality::Cardinal, -2),
    (Modality::Fixed, Modality::Fixed, -5),
    (Modality::Cardinal, Modality::Fixed, 0),
];

pub const MIN_SCORE: u8 = 0;
pub const MAX_SCORE: u8 = 100;

fn unordered_eq<T: PartialEq>(pair: (T, T), a: &T, b: &T) -> bool {
    (pair.0 == *a && pair.1 == *b) || (pair.0 == *b && pair.1 == *a)
}

pub fn element_base(a: Element, b: Element) -> i32 {
    if a == b {
        return SAME_ELEMENT_SCORE;
    }
    ELEMENT_RULES
        .iter()
        .chain(ELEMENT_CLASH_RULES.iter())
        .find(|(x, y, _)| unordered_eq((*x, *y), &a, &b))
        .map(|(_, _, score)| *score)
        .unwrap_or(DEFAULT_ELEMENT_SCORE)
}

pub fn modality_adjustment(a: Modality, b: Modality) -> i32 {
    MODALITY_RULES
        .iter()
        .find(|(x, y, _)| unordered_eq((*x, *y), &a, &b))
        .map(|(_, _, adjustment)| *adjustment)
        .unwrap_or(0)
}

/// Compatibility score in `0..=100`. Symmetric in its arguments.
pub fn score(a: Sign, b: Sign) -> u8 {
    let raw = element_base(a.element(), b.element())
        + modality_adjustment(a.modality(), b.modality());
    raw.clamp(MIN_SCORE as i32, MAX_SCORE as i32) as u8
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompatibilityTier {
    #[serde(rename = "destined match")]
    DestinedMatch,
    #[serde(rename = "promising, needs time")]
    Promising,
    #[serde(rename = "compatible but needs effort")]
    NeedsEffort,
    #[serde(rename = "different, needs understanding")]
    NeedsUnderstanding,
}

impl CompatibilityTier {
    /// Tiers in descending order of their lower bound.
    pub const ALL: [CompatibilityTier; 4] = [
        CompatibilityTier::DestinedMatch,
        CompatibilityTier::Promising,
        CompatibilityTier::NeedsEffort,
        CompatibilityTier::NeedsUnderstanding,
    ];

    pub fn from_score(score: u8) -> Self {
        match score {
            85.. => CompatibilityTier::DestinedMatch,
            70..=84 => CompatibilityTier::Promising,
            40..=69 => CompatibilityTier::NeedsEffort,
            _ => CompatibilityTier::NeedsUnderstanding,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CompatibilityTier::DestinedMatch => "destined match",
            CompatibilityTier::Promising => "promising, needs time",
            CompatibilityTier::NeedsEffort => "compatible but needs effort",
            CompatibilityTier::NeedsUnderstanding => "different, needs understanding",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            CompatibilityTier::DestinedMatch => {
                "You two were made for each other, whether in daily life, in love or at work."
            }
            CompatibilityTier::Promising => "You two have real potential for a lasting bond.",
            CompatibilityTier::NeedsEffort => {
                "This person will teach you to accept and respect the ways other people differ from you."
            }
            CompatibilityTier::NeedsUnderstanding => {
                "This person will help you see yourself more clearly, and what you need to adjust to keep a relationship in balance."
            }
        }
    }

    /// Advice paragraph template. Placeholders: `{name1}`, `{name2}`, `{sign1}`, `{sign2}`.
    pub fn advice_template(&self) -> &'static str {
        match self {
            CompatibilityTier::DestinedMatch => ADVICE_DESTINED,
            CompatibilityTier::Promising => ADVICE_PROMISING,
            CompatibilityTier::NeedsEffort => ADVICE_EFFORT,
            CompatibilityTier::NeedsUnderstanding => ADVICE_UNDERSTANDING,
        }
    }

    pub fn is_top(&self) -> bool {
        matches!(self, CompatibilityTier::DestinedMatch)
    }
}

impl fmt::Display for CompatibilityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub fn tier(score: u8) -> CompatibilityTier {
    CompatibilityTier::from_score(score)
}

const ADVICE_DESTINED: &str = "{name1} and {name2} share a great many values, enough to get to know each other for the long run. The harmony between {sign1} and {sign2} makes for a relationship full of promise. Why not open the door to the opportunity: meet up, go out together? Bringing a small gift to the very first date is sure to leave a lasting impression. Something like the gifts below is never so expensive that it feels awkward to accept, yet still says that you care.";

const ADVICE_PROMISING: &str = "{name1} and {name2} share a great many values, enough to get to know each other for the long run. The bond between {sign1} and {sign2} has room to grow into something lasting, given a little time. Why not open the door to the opportunity: meet up, go out together, and let the small differences smooth themselves out? Bringing a small gift to the very first date is sure to leave a lasting impression. Something like the gifts below is never so expensive that it feels awkward to accept, yet still says that you care.";

const ADVICE_EFFORT: &str = "Everyone grows up in a different environment, so differences are a natural part of life. {name1} and {name2} will not be the only pair to notice them: {sign1} and {sign2} simply show them more openly. What matters most is learning to accept and respect those differences so that you both grow and fit together better over time. Do not give up on a chance because of a few contrasts; give yourselves the opportunity to understand each other and yourselves a little better. If you want to discover more about the other person, or about yourself, reach out to them now. A few of the gifts below will help you leave a good impression without feeling like too much.";

const ADVICE_UNDERSTANDING: &str = "Remember that astrology is only a tool for understanding yourself, never a rulebook for your relationships. Above all, mutual understanding and emotional maturity are what keep a relationship going; even pairs rated as perfect matches fall apart without them. So do not let a rough reading of {sign1} and {sign2} make {name1} and {name2} miss out on each other. Everyone who comes into our lives brings something of value and helps us understand ourselves and grow emotionally. Give yourselves the chance to connect. If you want to discover more about the other person, or about yourself, reach out to them now. A few of the gifts below will help you leave a good impression without feeling like too much.";
