use crate::classifier::classify_text;
use crate::Sign;
use serde::{Deserialize, Serialize};

/// Person data as received from a caller. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default, alias = "birthdate")]
    pub birth: Option<String>,
    #[serde(default, rename = "zodiacSign")]
    pub zodiac_sign: Option<String>,
}

fn blank(field: &Option<String>) -> bool {
    field.as_deref().map_or(true, |v| v.trim().is_empty())
}

impl PersonInput {
    pub fn is_empty(&self) -> bool {
        blank(&self.name) && blank(&self.gender) && blank(&self.birth) && blank(&self.zodiac_sign)
    }

    /// Resolve the sign: a recognised `zodiacSign` wins, otherwise the birth
    /// text is classified.
    pub fn resolve(&self) -> Person {
        let zodiac_sign = self
            .zodiac_sign
            .as_deref()
            .and_then(|s| s.parse::<Sign>().ok())
            .unwrap_or_else(|| classify_text(self.birth.as_deref().unwrap_or_default()));

        Person {
            name: self.name.clone().unwrap_or_default().trim().to_string(),
            gender: self.gender.clone().unwrap_or_default(),
            birth: self.birth.clone().unwrap_or_default(),
            zodiac_sign,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub name: String,
    pub gender: String,
    pub birth: String,
    #[serde(rename = "zodiacSign")]
    pub zodiac_sign: Sign,
}
