//! Birth date → sign classification.
//!
//! Classification is total: unparseable or empty input resolves to [`Sign::DEFAULT`].

use crate::Sign;
use chrono::{Datelike, NaiveDate};
use tracing::debug;

/// Accepted textual date formats, tried in order. First success wins.
pub const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y"];

/// A `(month, day)` pair.
type MonthDay = (u32, u32);

/// Each sign owns `start..=month-end` of one month and `1..=end` of the next.
const SIGN_RANGES: [(Sign, MonthDay, MonthDay); 12] = [
    (Sign::Aries, (3, 21), (4, 19)),
    (Sign::Taurus, (4, 20), (5, 20)),
    (Sign::Gemini, (5, 21), (6, 20)),
    (Sign::Cancer, (6, 21), (7, 22)),
    (Sign::Leo, (7, 23), (8, 22)),
    (Sign::Virgo, (8, 23), (9, 22)),
    (Sign::Libra, (9, 23), (10, 22)),
    (Sign::Scorpio, (10, 23), (11, 21)),
    (Sign::Sagittarius, (11, 22), (12, 21)),
    (Sign::Capricorn, (12, 22), (1, 19)),
    (Sign::Aquarius, (1, 20), (2, 18)),
    (Sign::Pisces, (2, 19), (3, 20)),
];

/// Birth information as supplied by a caller.
#[derive(Debug, Clone, Copy)]
pub enum BirthInput<'a> {
    Sign(Sign),
    Date(NaiveDate),
    Text(&'a str),
}

pub fn classify(input: Option<BirthInput<'_>>) -> Sign {
    match input {
        Some(BirthInput::Sign(sign)) => sign,
        Some(BirthInput::Date(date)) => sign_for_date(date),
        Some(BirthInput::Text(text)) => classify_text(text),
        None => Sign::DEFAULT,
    }
}

/// Classify free text: a sign identifier passes through, otherwise the text
/// is parsed as a date.
pub fn classify_text(text: &str) -> Sign {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Sign::DEFAULT;
    }
    if let Ok(sign) = trimmed.parse::<Sign>() {
        return sign;
    }
    match parse_birth_date(trimmed) {
        Some(date) => sign_for_date(date),
        None => {
            debug!(input = trimmed, "unparseable birth date, using default sign");
            Sign::DEFAULT
        }
    }
}

pub fn parse_birth_date(text: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text.trim(), fmt).ok())
}

pub fn sign_for_date(date: NaiveDate) -> Sign {
    sign_for_month_day(date.month(), date.day())
}

pub fn sign_for_month_day(month: u32, day: u32) -> Sign {
    SIGN_RANGES
        .iter()
        .find(|(_, start, end)| {
            (month == start.0 && day >= start.1) || (month == end.0 && day <= end.1)
        })
        .map(|(sign, _, _)| *sign)
        .unwrap_or(Sign::DEFAULT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn april_fifth_is_aries() {
        assert_eq!(classify_text("1990-04-05"), Sign::Aries);
    }

    #[test]
    fn every_day_of_a_leap_year_matches_exactly_one_range() {
        let mut day = date(2024, 1, 1);
        while day.year() == 2024 {
            let matches = SIGN_RANGES
                .iter()
                .filter(|(_, start, end)| {
                    (day.month() == start.0 && day.day() >= start.1)
                        || (day.month() == end.0 && day.day() <= end.1)
                })
                .count();
            assert_eq!(matches, 1, "{day} matched {matches} ranges");
            day = day.succ_opt().unwrap();
        }
    }

    #[test]
    fn boundaries_are_assigned_to_the_right_side() {
        assert_eq!(sign_for_date(date(2000, 3, 20)), Sign::Pisces);
        assert_eq!(sign_for_date(date(2000, 3, 21)), Sign::Aries);
        assert_eq!(sign_for_date(date(2000, 12, 21)), Sign::Sagittarius);
        assert_eq!(sign_for_date(date(2000, 12, 22)), Sign::Capricorn);
        assert_eq!(sign_for_date(date(2001, 1, 19)), Sign::Capricorn);
        assert_eq!(sign_for_date(date(2001, 1, 20)), Sign::Aquarius);
        assert_eq!(sign_for_date(date(2024, 2, 29)), Sign::Pisces);
    }

    #[test]
    fn formats_are_tried_in_priority_order() {
        // day-first wins over month-first when both would parse
        assert_eq!(parse_birth_date("05/04/1990"), Some(date(1990, 4, 5)));
        assert_eq!(parse_birth_date("12/25/1990"), Some(date(1990, 12, 25)));
        assert_eq!(parse_birth_date("23-07-1985"), Some(date(1985, 7, 23)));
        assert_eq!(classify_text("23-07-1985"), Sign::Leo);
    }

    #[test]
    fn bad_input_falls_back_to_default() {
        assert_eq!(classify_text(""), Sign::DEFAULT);
        assert_eq!(classify_text("not a date"), Sign::DEFAULT);
        assert_eq!(classify_text("1990-13-45"), Sign::DEFAULT);
        assert_eq!(classify(None), Sign::DEFAULT);
        assert_eq!(sign_for_month_day(13, 1), Sign::DEFAULT);
    }

    #[test]
    fn sign_identifiers_pass_through() {
        assert_eq!(classify_text("Scorpio"), Sign::Scorpio);
        assert_eq!(classify(Some(BirthInput::Sign(Sign::Virgo))), Sign::Virgo);
        assert_eq!(
            classify(Some(BirthInput::Date(date(1999, 8, 30)))),
            Sign::Virgo
        );
    }
}
