//! Narrative bundle and the deterministic fallback generator.

use crate::profiles::{sign_trait, TraitSlot};
use crate::{score, CompatibilityTier, Person, Sign};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecommendation {
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub price: String,
    #[serde(default = "default_shop_url")]
    pub shop_url: String,
}

fn default_shop_url() -> String {
    "#".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrativeBundle {
    pub compatibility_score: u8,
    pub compatibility_tier: CompatibilityTier,
    pub tier_description: String,
    pub zodiac_summary: String,
    pub personality_analysis: String,
    pub differences: String,
    pub strengths: String,
    pub life_benefits: String,
    pub work_benefits: String,
    pub love_benefits: String,
    pub advice: String,
    pub product_recommendations: Vec<ProductRecommendation>,
}

impl NarrativeBundle {
    /// Names of required sections that are blank. `differences` is only
    /// required below the top tier.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut sections = vec![
            ("tier_description", &self.tier_description),
            ("zodiac_summary", &self.zodiac_summary),
            ("personality_analysis", &self.personality_analysis),
            ("strengths", &self.strengths),
            ("life_benefits", &self.life_benefits),
            ("work_benefits", &self.work_benefits),
            ("love_benefits", &self.love_benefits),
            ("advice", &self.advice),
        ];
        if !self.compatibility_tier.is_top() {
            sections.push(("differences", &self.differences));
        }
        let mut missing: Vec<&'static str> = sections
            .into_iter()
            .filter(|(_, text)| text.trim().is_empty())
            .map(|(name, _)| name)
            .collect();
        if self.product_recommendations.is_empty() {
            missing.push("product_recommendations");
        }
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

/// Values substituted into narrative templates.
#[derive(Debug, Clone, Copy)]
pub struct Substitutions<'a> {
    pub name1: &'a str,
    pub name2: &'a str,
    pub sign1: Sign,
    pub sign2: Sign,
}

impl<'a> Substitutions<'a> {
    pub fn new(person1: &'a Person, person2: &'a Person) -> Self {
        Self {
            name1: &person1.name,
            name2: &person2.name,
            sign1: person1.zodiac_sign,
            sign2: person2.zodiac_sign,
        }
    }

    pub fn render(&self, template: &str) -> String {
        self.render_with(template, |_| None)
    }

    /// Fill `{key}` placeholders in one left-to-right pass. Keys not known
    /// here are looked up in `extra`; unknown keys are left as written.
    /// Inserted text is never scanned again.
    pub fn render_with<F>(&self, template: &str, extra: F) -> String
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;
        while let Some(start) = rest.find('{') {
            out.push_str(&rest[..start]);
            let tail = &rest[start..];
            let filled = tail[1..].find('}').and_then(|end| {
                let key = &tail[1..1 + end];
                self.value(key)
                    .or_else(|| extra(key))
                    .map(|value| (value, end + 2))
            });
            match filled {
                Some((value, consumed)) => {
                    out.push_str(&value);
                    rest = &tail[consumed..];
                }
                None => {
                    out.push('{');
                    rest = &tail[1..];
                }
            }
        }
        out.push_str(rest);
        out
    }

    fn value(&self, key: &str) -> Option<String> {
        match key {
            "name1" => Some(self.name1.to_string()),
            "name2" => Some(self.name2.to_string()),
            "sign1" => Some(self.sign1.title().to_string()),
            "sign2" => Some(self.sign2.title().to_string()),
            _ => None,
        }
    }
}

const SUMMARY: &str = "{sign1} and {sign2} stand for two different ways of living and thinking. {sign1} is usually {trait1}, while {sign2} is {trait2}. Together they paint a varied and colourful picture.";

const PERSONALITY: &str = "{name1} was born under {sign1}: {p1_primary}, {p1_secondary}. In conversation {name1} tends to come across as {p1_comm}. Emotionally, {sign1} natives share one familiar tendency: {p1_emotional}.\n\n{name2}, born under {sign2}, is {p2_primary}, {p2_secondary}. {name2} is often {p2_comm}, with a familiar tendency of their own: {p2_emotional}. Together these two personalities make for rich experiences in which each can discover new sides of themselves through the other's eyes.";

const DIFFERENCES: &str = "The main differences between {name1} and {name2} lie in how they approach life and express their feelings. One may prefer stability and detailed plans while the other enjoys flexibility and spontaneity. That can lead to lively discussions about planning time, choosing how to relax, or making important decisions. These differences are not barriers but chances for both to widen their outlook and learn to adapt. Faced with a problem, one may think it through carefully before acting while the other would rather experiment and learn from experience.";

const STRENGTHS: &str = "The greatest strength of this relationship is how well {name1} and {name2} complement and support each other. When one is strong at analysis and planning, the other brings creativity and flexibility. In hard moments this combination helps them find the best solution by looking at the problem from several angles. Together they can build a supportive space where each feels valued and understood, and that mutual trust and respect are a solid foundation for a relationship that lasts.";

const LIFE_BENEFITS: &str = "In everyday life {name1} and {name2} can settle into a balanced and interesting rhythm. They can share household tasks according to what each enjoys and does best: one may handle planning and finances while the other makes their home warm and creative. When going out or travelling they can mix carefully planned activities with spontaneous adventures, which keeps life for {sign1} and {sign2} varied and never dull.";

const WORK_BENEFITS: &str = "At work this pairing can be remarkably effective. One can take on detailed planning and tracking progress while the other contributes creative ideas and flexible solutions. On a difficult project they cover for each other: one safeguards quality and deadlines, the other looks for fresh approaches and breakthroughs. The moral support each gives the other also helps {name1} and {name2} meet professional challenges with a positive attitude.";

const LOVE_BENEFITS: &str = "In love this relationship has the potential to grow deep and lasting. {name1} and {name2} can learn to love in different ways: one shows affection through concrete, thoughtful actions while the other expresses it in sweet words and natural gestures. That contrast teaches both that love takes many forms. They can build beautiful memories by pairing carefully prepared romantic plans with sweet, unexpected moments.";

/// Image shown for products that do not bring their own.
pub const PRODUCT_IMAGE: &str = "https://i.pinimg.com/736x/ea/87/51/ea8751f3816013dfcca04c796e09e6de.jpg";

/// Canned product list: `(name, description template, price)`.
const PRODUCTS: [(&str, &str, &str); 5] = [
    (
        "Premium silver zodiac couple rings",
        "Matching rings designed for the {sign1} - {sign2} pair, crafted from 925 silver with finely detailed zodiac symbols",
        "1,500,000 - 3,200,000 VND",
    ),
    (
        "Feng shui gemstone couple bracelets",
        "Matching bracelets set with stones suited to {sign1} and {sign2}, bringing positive energy and happiness",
        "800,000 - 1,800,000 VND",
    ),
    (
        "Custom zodiac canvas print",
        "Art print designed around {sign1} and {sign2}, printed on premium canvas for a bedroom or living room",
        "450,000 - 900,000 VND",
    ),
    (
        "Smart couple watches",
        "Couple smartwatches with health tracking and connectivity so {sign1} and {sign2} can always look out for each other",
        "2,800,000 - 5,500,000 VND",
    ),
    (
        "Zodiac symbol couple necklaces",
        "Matching necklaces with {sign1} and {sign2} symbol pendants in 14K gold, a meaningful gift of love",
        "2,200,000 - 4,500,000 VND",
    ),
];

pub fn product_recommendations(sign1: Sign, sign2: Sign) -> Vec<ProductRecommendation> {
    let subs = Substitutions {
        name1: "",
        name2: "",
        sign1,
        sign2,
    };
    PRODUCTS
        .iter()
        .map(|(name, description, price)| ProductRecommendation {
            name: (*name).to_string(),
            description: subs.render(description),
            image_url: PRODUCT_IMAGE.to_string(),
            price: (*price).to_string(),
            shop_url: default_shop_url(),
        })
        .collect()
}

fn lower(text: &str) -> String {
    text.to_lowercase()
}

/// Build the complete fallback bundle for a pair, scoring it along the way.
pub fn fallback_bundle(person1: &Person, person2: &Person) -> NarrativeBundle {
    let score = score(person1.zodiac_sign, person2.zodiac_sign);
    narrate(person1, person2, score, CompatibilityTier::from_score(score))
}

/// Assemble the fallback narrative for an already-scored pair.
pub fn narrate(
    person1: &Person,
    person2: &Person,
    score: u8,
    tier: CompatibilityTier,
) -> NarrativeBundle {
    narrate_with_traits(person1, person2, score, tier, sign_trait)
}

pub(crate) fn narrate_with_traits<T>(
    person1: &Person,
    person2: &Person,
    score: u8,
    tier: CompatibilityTier,
    traits: T,
) -> NarrativeBundle
where
    T: Fn(Sign, TraitSlot) -> &'static str,
{
    let subs = Substitutions::new(person1, person2);
    let (s1, s2) = (subs.sign1, subs.sign2);

    let trait_for = |key: &str| {
        let (sign, slot) = match key {
            "trait1" | "p1_primary" => (s1, TraitSlot::Primary),
            "trait2" | "p2_primary" => (s2, TraitSlot::Primary),
            "p1_secondary" => (s1, TraitSlot::Secondary),
            "p2_secondary" => (s2, TraitSlot::Secondary),
            "p1_comm" => (s1, TraitSlot::Communication),
            "p2_comm" => (s2, TraitSlot::Communication),
            "p1_emotional" => (s1, TraitSlot::Emotional),
            "p2_emotional" => (s2, TraitSlot::Emotional),
            _ => return None,
        };
        Some(lower(traits(sign, slot)))
    };

    let differences = if tier.is_top() {
        String::new()
    } else {
        subs.render(DIFFERENCES)
    };

    NarrativeBundle {
        compatibility_score: score,
        compatibility_tier: tier,
        tier_description: tier.description().to_string(),
        zodiac_summary: subs.render_with(SUMMARY, trait_for),
        personality_analysis: subs.render_with(PERSONALITY, trait_for),
        differences,
        strengths: subs.render(STRENGTHS),
        life_benefits: subs.render(LIFE_BENEFITS),
        work_benefits: subs.render(WORK_BENEFITS),
        love_benefits: subs.render(LOVE_BENEFITS),
        advice: subs.render(tier.advice_template()),
        product_recommendations: product_recommendations(s1, s2),
    }
}
