//! Daily horoscope generator.
//!
//! Output is a pure function of `(sign, date)`: the pair is hashed with
//! SHA-256 and the first four bytes drive every selection.

use crate::Sign;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyHoroscope {
    pub sign: Sign,
    pub description: String,
    pub compatibility: String,
    pub mood: String,
    pub color: String,
    pub lucky_number: String,
    pub lucky_time: String,
    pub current_date: String,
}

/// Option pools for one sign.
#[derive(Debug)]
struct SignPools {
    descriptions: &'static [&'static str],
    colors: &'static [&'static str],
    moods: &'static [&'static str],
}

/// Indices chosen for a given seed. Exposed so pool bounds can be checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoroscopeSelection {
    pub seed: u32,
    pub description: usize,
    pub color: usize,
    pub mood: usize,
    pub lucky_element: usize,
}

const LUCKY_ELEMENTS: [&str; 10] = [
    "an important meeting",
    "good news",
    "a new opportunity",
    "support from friends",
    "success at work",
    "a lovely romance",
    "good health",
    "financial luck",
    "learning something new",
    "an unexpected joy",
];

/// Indexed by `Sign as usize`, i.e. in [`Sign::ALL`] order.
static POOLS: [SignPools; 12] = [
    SignPools {
        descriptions: &[
            "Today Aries is brimming with energy and ready to take on any challenge. Your courage will be well rewarded.",
            "Your leadership shines through clearly today, Aries. It is a great moment to launch new projects.",
            "Aries feels confident and decisive. Trust your instincts and follow your heart.",
            "Positive energy surrounds Aries. You will find strong motivation to pursue the goals that matter.",
        ],
        colors: &["Bright red", "Blazing orange", "Crimson"],
        moods: &["Dynamic and decisive", "Passionate and brave", "Confident and strong"],
    },
    SignPools {
        descriptions: &[
            "Taurus enjoys stability and peace today. It is a good time to focus on practical matters.",
            "Your patience pays off, Taurus. Long-term efforts are finally starting to show results.",
            "Taurus feels deeply connected to nature and beauty. Take time to savour the simple things.",
            "Your practical streak helps you make wise decisions about work and money, Taurus.",
        ],
        colors: &["Green", "Earth brown", "Soft pink"],
        moods: &["Steady and practical", "Calm and patient", "Dependable"],
    },
    SignPools {
        descriptions: &[
            "Gemini's wit and curiosity are fully switched on. You will learn plenty of interesting things today.",
            "Your gift for conversation shines, Gemini. A wonderful day to connect and share ideas.",
            "Gemini feels flexible and adapts well to every situation. People admire your many talents.",
            "Gemini's quick mind finds creative answers to complicated problems.",
        ],
        colors: &["Yellow", "Silver", "Light blue"],
        moods: &["Curious and flexible", "Smart and talkative", "Creative"],
    },
    SignPools {
        descriptions: &[
            "Cancer feels the warmth of family and loved ones. Sincere affection will be returned.",
            "Your strong intuition leads you to the right decisions, Cancer. Trust your feelings.",
            "Cancer cares for and protects the people who matter. Your kindness is deeply appreciated.",
            "Cancer's empathy helps you understand others deeply and build lasting bonds.",
        ],
        colors: &["Silver", "Pearl white", "Sea blue"],
        moods: &["Warm and protective", "Sensitive and intuitive", "Loving"],
    },
    SignPools {
        descriptions: &[
            "Leo radiates irresistible confidence and charm. All eyes are on you.",
            "Your leadership is on full display, Leo. Your ability to inspire will lift many people.",
            "Leo feels recognised and appreciated. It is time to show off your talent and creativity.",
            "Leo's generosity comes to the fore. You are ready to help and protect those who need it.",
        ],
        colors: &["Gold", "Orange", "Red"],
        moods: &["Confident and radiant", "Excited and shining", "Commanding"],
    },
    SignPools {
        descriptions: &[
            "Virgo focuses on refining and improving everything around. Your attention to detail is valued.",
            "Your analytical skill shows you the heart of the matter, Virgo. You will find an effective fix.",
            "Virgo finds satisfaction in helping others. Your care and dedication make a real difference.",
            "Virgo's drive to improve pushes you to keep learning and growing.",
        ],
        colors: &["Navy blue", "Brown", "Beige"],
        moods: &["Meticulous and careful", "Perfectionist and analytical", "Thoughtful"],
    },
    SignPools {
        descriptions: &[
            "Libra seeks balance and harmony in every part of life. You are a wonderful peacemaker.",
            "Your eye for beauty stands out today, Libra. You can create elegance wherever you go.",
            "Libra shows fairness and objectivity. Your careful weighing leads to wise decisions.",
            "Libra's grace draws people in. You can build positive relationships today.",
        ],
        colors: &["Pink", "Pastel blue", "White"],
        moods: &["Harmonious and fair", "Elegant and balanced", "Peaceful"],
    },
    SignPools {
        descriptions: &[
            "Scorpio digs into the essence of every issue. Your strong intuition never lets you down.",
            "Your inner strength is switched on, Scorpio. You can overcome any difficulty.",
            "Scorpio shows determination and endurance. Nothing can stop you reaching your goal.",
            "Scorpio's power of renewal turns challenges into chances to grow.",
        ],
        colors: &["Deep red", "Black", "Purple"],
        moods: &["Powerful and mysterious", "Determined and deep", "Intuitive"],
    },
    SignPools {
        descriptions: &[
            "Sagittarius longs for freedom and new horizons. Your adventurous spirit leads to success.",
            "Your positive philosophy spreads to everyone around you, Sagittarius. You inspire many.",
            "Sagittarius broadens both vision and knowledge. New experiences enrich your inner world.",
            "Sagittarius' optimism carries you past every obstacle. You always find light in the dark.",
        ],
        colors: &["Purple", "Blue", "Red"],
        moods: &["Free and adventurous", "Optimistic and philosophical", "Exploring"],
    },
    SignPools {
        descriptions: &[
            "Capricorn stays firmly on the path to the goal. Hard work and discipline will be rewarded.",
            "Your practicality builds a solid foundation for the future, Capricorn. People rely on you.",
            "Capricorn shows responsibility and commitment. Your leadership earns respect.",
            "Capricorn's patience finally pays off. Long-term efforts are starting to show results.",
        ],
        colors: &["Brown", "Dark green", "Black"],
        moods: &["Disciplined and goal-driven", "Responsible and steadfast", "Realistic"],
    },
    SignPools {
        descriptions: &[
            "Aquarius is full of creative ideas and original views. You can bring about positive change.",
            "Your humanitarian side shows clearly, Aquarius. You want to give back to your community.",
            "Aquarius shows independence and freedom. Thinking differently uncovers new solutions.",
            "Aquarius' vision of the future helps you anticipate and prepare for what is coming.",
        ],
        colors: &["Blue", "Silver", "Purple"],
        moods: &["Creative and independent", "Humanitarian and forward-looking", "Original"],
    },
    SignPools {
        descriptions: &[
            "Pisces connects deeply with intuition and feeling. Your empathy touches other hearts.",
            "Your sensitivity lets you notice the subtle things, Pisces. You understand how people feel.",
            "Pisces shows compassion and forgiveness. Your unconditional love heals old wounds.",
            "Pisces' rich imagination produces wonderful ideas and endless inspiration.",
        ],
        colors: &["Azure", "Sea green", "Lavender"],
        moods: &["Sensitive and intuitive", "Compassionate and artistic", "Imaginative"],
    },
];

fn pools(sign: Sign) -> &'static SignPools {
    &POOLS[sign as usize]
}

/// Seed for `(sign, date)`: the first four bytes of SHA-256 over
/// `"{sign}_{YYYY-MM-DD}"`, big-endian.
pub fn horoscope_seed(sign: Sign, date: NaiveDate) -> u32 {
    let key = format!("{}_{}", sign, date.format("%Y-%m-%d"));
    let digest = Sha256::digest(key.as_bytes());
    u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
}

pub fn select(sign: Sign, date: NaiveDate) -> HoroscopeSelection {
    let seed = horoscope_seed(sign, date);
    let p = pools(sign);
    HoroscopeSelection {
        seed,
        description: seed as usize % p.descriptions.len(),
        color: (seed >> 8) as usize % p.colors.len(),
        mood: (seed >> 16) as usize % p.moods.len(),
        lucky_element: (seed >> 24) as usize % LUCKY_ELEMENTS.len(),
    }
}

pub fn horoscope(sign: Sign, date: NaiveDate) -> DailyHoroscope {
    let pick = select(sign, date);
    let p = pools(sign);
    let seed = pick.seed;

    DailyHoroscope {
        sign,
        description: p.descriptions[pick.description].to_string(),
        compatibility: format!(
            "{} is well placed for connection today, especially when it comes to {}.",
            sign.title(),
            LUCKY_ELEMENTS[pick.lucky_element]
        ),
        mood: p.moods[pick.mood].to_string(),
        color: p.colors[pick.color].to_string(),
        lucky_number: ((seed % 9) + 1).to_string(),
        lucky_time: format!(
            "{}:00 AM - {}:00 PM",
            10 + seed % 6,
            2 + (seed >> 4) % 4
        ),
        current_date: date.format("%B %d, %Y").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn same_sign_same_day_is_identical() {
        let today = day(2025, 6, 1);
        for sign in Sign::ALL {
            assert_eq!(horoscope(sign, today), horoscope(sign, today));
        }
    }

    #[test]
    fn selections_stay_within_pool_bounds() {
        let mut date = day(2024, 1, 1);
        for _ in 0..400 {
            for sign in Sign::ALL {
                let pick = select(sign, date);
                let p = pools(sign);
                assert!(pick.description < p.descriptions.len());
                assert!(pick.color < p.colors.len());
                assert!(pick.mood < p.moods.len());
                assert!(pick.lucky_element < LUCKY_ELEMENTS.len());
            }
            date = date.succ_opt().unwrap();
        }
    }

    #[test]
    fn lucky_values_are_in_range() {
        let h = horoscope(Sign::Libra, day(2025, 3, 14));
        let n: u32 = h.lucky_number.parse().unwrap();
        assert!((1..=9).contains(&n));
        assert!(h.lucky_time.ends_with(":00 PM"));
        let start: u32 = h.lucky_time.split(':').next().unwrap().parse().unwrap();
        assert!((10..=15).contains(&start));
        assert_eq!(h.current_date, "March 14, 2025");
    }

    #[test]
    fn output_varies_across_days() {
        let start = day(2025, 1, 1);
        let text = |h: DailyHoroscope| (h.description, h.color, h.mood, h.lucky_number);
        let first = text(horoscope(Sign::Aries, start));
        let differs = (1..30)
            .map(|offset| start + chrono::Days::new(offset))
            .any(|d| text(horoscope(Sign::Aries, d)) != first);
        assert!(differs);
    }

    #[test]
    fn pools_are_laid_out_in_sign_order() {
        for sign in Sign::ALL {
            for text in pools(sign).descriptions {
                assert!(text.contains(sign.title()), "{sign}: {text}");
            }
        }
    }

    #[test]
    fn seed_depends_on_sign() {
        let d = day(2025, 1, 1);
        assert_ne!(horoscope_seed(Sign::Aries, d), horoscope_seed(Sign::Taurus, d));
    }
}
