//! Pre-authored personality trait pools, one per sign.
//!
//! Pools are indexed positionally: 0 = primary trait, 1 = secondary trait,
//! 2 = communication style, last = emotional tendency.

use crate::Sign;
use once_cell::sync::Lazy;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraitSlot {
    Primary,
    Secondary,
    Communication,
    Emotional,
}

impl TraitSlot {
    /// Phrase used when a pool is too short to fill this slot.
    pub fn generic(&self) -> &'static str {
        match self {
            TraitSlot::Primary => "One of a kind",
            TraitSlot::Secondary => "With an outlook all their own",
            TraitSlot::Communication => "Sincere and open",
            TraitSlot::Emotional => "A habit of showing feelings directly",
        }
    }
}

static TRAIT_POOLS: Lazy<HashMap<Sign, Vec<&'static str>>> = Lazy::new(|| {
    HashMap::from([
        (
            Sign::Aries,
            vec![
                "Energetic and full of enthusiasm",
                "Bold and unafraid of a challenge",
                "A natural-born leader",
                "Sometimes a little hot-headed",
            ],
        ),
        (
            Sign::Taurus,
            vec![
                "Steady and dependable",
                "Fond of comfort and security",
                "Patient and persistent",
                "Can be rather stubborn",
            ],
        ),
        (
            Sign::Gemini,
            vec![
                "Clever and adaptable",
                "Sociable and a good talker",
                "Always curious to learn",
                "Quick to change their mind",
            ],
        ),
        (
            Sign::Cancer,
            vec![
                "Deeply caring toward others",
                "Intuitive and sensitive",
                "Devoted to family and protective of loved ones",
                "Sometimes overly sensitive",
            ],
        ),
        (
            Sign::Leo,
            vec![
                "Confident and magnetic",
                "Generous and warm",
                "Creative and inspiring",
                "Enjoys attention and admiration",
            ],
        ),
        (
            Sign::Virgo,
            vec![
                "Meticulous and a perfectionist",
                "Practical and logical",
                "Always eager to help others",
                "Can be too hard on themselves",
            ],
        ),
        (
            Sign::Libra,
            vec![
                "Balanced and harmonious",
                "Blessed with good taste",
                "Fair and objective",
                "Occasionally indecisive",
            ],
        ),
        (
            Sign::Scorpio,
            vec![
                "Deep and mysterious",
                "Strong-willed",
                "Loyal and faithful",
                "Prone to jealousy",
            ],
        ),
        (
            Sign::Sagittarius,
            vec![
                "Freedom-loving and adventurous",
                "Optimistic and upbeat",
                "Keen on exploring and travel",
                "Sometimes impatient",
            ],
        ),
        (
            Sign::Capricorn,
            vec![
                "Responsible and practical",
                "Ambitious and determined",
                "Persistent in chasing goals",
                "Can be overly serious",
            ],
        ),
        (
            Sign::Aquarius,
            vec![
                "Independent and inventive",
                "Concerned with social causes",
                "A progressive thinker",
                "Sometimes emotionally distant",
            ],
        ),
        (
            Sign::Pisces,
            vec![
                "Sensitive and emotional",
                "Strongly intuitive and creative",
                "Empathetic and understanding",
                "Can be a daydreamer",
            ],
        ),
    ])
});

pub fn trait_pool(sign: Sign) -> &'static [&'static str] {
    TRAIT_POOLS.get(&sign).map(Vec::as_slice).unwrap_or(&[])
}

/// Look up a slot in `pool`, degrading to the slot's generic phrase when the
/// pool is too short.
pub fn trait_in(pool: &[&'static str], slot: TraitSlot) -> &'static str {
    let found = match slot {
        TraitSlot::Primary => pool.first(),
        TraitSlot::Secondary => pool.get(1),
        TraitSlot::Communication => pool.get(2),
        TraitSlot::Emotional if pool.len() > 3 => pool.last(),
        TraitSlot::Emotional => None,
    };
    found.copied().unwrap_or_else(|| slot.generic())
}

pub fn sign_trait(sign: Sign, slot: TraitSlot) -> &'static str {
    trait_in(trait_pool(sign), slot)
}
