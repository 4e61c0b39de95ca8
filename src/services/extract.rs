use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

/// Canonical day-name table, Monday=0 … Sunday=6. Matching walks the table
/// in order and tests plain substring containment, so full names sit before
/// their abbreviations.
const DAY_PATTERNS: &[(&str, u32)] = &[
    ("monday", 0),
    ("mon", 0),
    ("tuesday", 1),
    ("tue", 1),
    ("tues", 1),
    ("wednesday", 2),
    ("wed", 2),
    ("thursday", 3),
    ("thu", 3),
    ("thurs", 3),
    ("friday", 4),
    ("fri", 4),
    ("saturday", 5),
    ("sat", 5),
    ("sunday", 6),
    ("sun", 6),
];

const MONTH_NAMES: &[(&str, u32)] = &[
    ("january", 1),
    ("february", 2),
    ("march", 3),
    ("april", 4),
    ("may", 5),
    ("june", 6),
    ("july", 7),
    ("august", 8),
    ("september", 9),
    ("october", 10),
    ("november", 11),
    ("december", 12),
];

static STOP_WORDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(book|schedule|meeting|call|appointment|for|at|on)\b").unwrap());

static TIME_HOUR_MINUTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{1,2}):(\d{2})\s*(am|pm)?").unwrap());
static TIME_HOUR_MERIDIEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d{1,2})\s*(am|pm)").unwrap());
static TIME_BARE_HOUR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{1,2})$").unwrap());

static DATE_ISO: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d{4})-(\d{1,2})-(\d{1,2})").unwrap());
static DATE_SLASH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{1,2})/(\d{1,2})(?:/(\d{4}))?").unwrap());
static DATE_MONTH_DAY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z]+)\.?\s+(\d{1,2})(?:st|nd|rd|th)?\b").unwrap());
static DATE_DAY_MONTH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{1,2})(?:st|nd|rd|th)?\s+(?:of\s+)?([a-z]+)").unwrap());

static HOUR_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"between\s+(\d{1,2})(?::\d{2})?\s*(am|pm)?\s*-\s*(\d{1,2})(?::\d{2})?\s*(am|pm)?")
        .unwrap()
});

/// An explicit "between H-H" range found in an utterance, hours in 24h form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HourRange {
    pub start: u32,
    pub end: u32,
    /// The raw matched endpoint texts, kept for echoing back to the user.
    pub start_text: String,
    pub end_text: String,
}

/// Extract an optional calendar date and an optional "HH:MM" time label from
/// free text. Degrades to `None` on either field; never fails.
pub fn extract(text: &str, now: NaiveDateTime) -> (Option<NaiveDate>, Option<String>) {
    let text_lower = text.trim().to_lowercase();
    let today = now.date();

    let date = if text_lower.contains("tomorrow") {
        Some(today + Duration::days(1))
    } else if text_lower.contains("today") {
        Some(today)
    } else if text_lower.contains("next week") {
        // Next Monday, or a week out when today already is Monday.
        let days_until_monday = (7 - today.weekday().num_days_from_monday() as i64) % 7;
        if days_until_monday == 0 {
            Some(today + Duration::days(7))
        } else {
            Some(today + Duration::days(days_until_monday))
        }
    } else if text_lower.contains("this week") {
        Some(today + Duration::days(1))
    } else {
        day_of_week_date(&text_lower, today).or_else(|| fuzzy_date(&text_lower, today))
    };

    let mut time = match_time_patterns(&text_lower);

    // Named periods override any pattern-matched time.
    if text_lower.contains("morning") {
        time = Some("09:00".to_string());
    } else if text_lower.contains("afternoon") {
        time = Some("14:00".to_string());
    } else if text_lower.contains("evening") {
        time = Some("17:00".to_string());
    }

    (date, time)
}

/// True when the whole (trimmed, lower-cased) text is a 1-2 digit number.
pub fn is_bare_number(text: &str) -> bool {
    TIME_BARE_HOUR.is_match(text.trim())
}

fn day_of_week_date(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    for (day_name, day_num) in DAY_PATTERNS {
        if text.contains(day_name) {
            // "this <day>" and a bare "<day>" both mean the upcoming
            // occurrence; a day already past this week rolls forward.
            let mut days_ahead = *day_num as i64 - today.weekday().num_days_from_monday() as i64;
            if days_ahead <= 0 {
                days_ahead += 7;
            }
            if text.contains("next") {
                days_ahead += 7;
            }
            return Some(today + Duration::days(days_ahead));
        }
    }
    None
}

/// Last-ditch date parse after stripping calendar-booking stop-words.
/// Unresolved fields default to `today`.
fn fuzzy_date(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    let clean = STOP_WORDS.replace_all(text, "");

    if let Some(caps) = DATE_ISO.captures(&clean) {
        let year: i32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let day: u32 = caps[3].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    if let Some(caps) = DATE_SLASH.captures(&clean) {
        let month: u32 = caps[1].parse().ok()?;
        let day: u32 = caps[2].parse().ok()?;
        let year: i32 = caps
            .get(3)
            .and_then(|y| y.as_str().parse().ok())
            .unwrap_or_else(|| today.year());
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    if let Some(caps) = DATE_MONTH_DAY.captures(&clean) {
        if let Some(month) = month_number(&caps[1]) {
            let day: u32 = caps[2].parse().ok()?;
            return NaiveDate::from_ymd_opt(today.year(), month, day);
        }
    }

    if let Some(caps) = DATE_DAY_MONTH.captures(&clean) {
        if let Some(month) = month_number(&caps[2]) {
            let day: u32 = caps[1].parse().ok()?;
            return NaiveDate::from_ymd_opt(today.year(), month, day);
        }
    }

    None
}

fn month_number(word: &str) -> Option<u32> {
    MONTH_NAMES
        .iter()
        .find(|(name, _)| name.starts_with(word) && word.len() >= 3)
        .map(|(_, num)| *num)
}

fn match_time_patterns(text: &str) -> Option<String> {
    if let Some(caps) = TIME_HOUR_MINUTE.captures(text) {
        let mut hour: u32 = caps[1].parse().ok()?;
        let minute = &caps[2];
        match caps.get(3).map(|m| m.as_str()) {
            Some("pm") if hour != 12 => hour += 12,
            Some("am") if hour == 12 => hour = 0,
            _ => {}
        }
        return Some(format!("{hour:02}:{minute}"));
    }

    if let Some(caps) = TIME_HOUR_MERIDIEM.captures(text) {
        let mut hour: u32 = caps[1].parse().ok()?;
        match &caps[2] {
            "pm" if hour != 12 => hour += 12,
            "am" if hour == 12 => hour = 0,
            _ => {}
        }
        return Some(format!("{hour:02}:00"));
    }

    if let Some(caps) = TIME_BARE_HOUR.captures(text) {
        let mut hour: u32 = caps[1].parse().ok()?;
        // No meridiem given: very early hours read as PM, the rest taken
        // at face value.
        if hour < 6 {
            hour += 12;
        }
        return Some(format!("{hour:02}:00"));
    }

    None
}

/// Parse a loose time like "3pm", "3:30pm" or "15:30" down to its hour.
pub fn parse_time_to_hour(time_str: &str) -> Option<u32> {
    let time_str = time_str.trim().to_lowercase();

    if let Some(rest) = time_str.strip_suffix("pm") {
        let hour = hour_part(rest)?;
        return Some(if hour != 12 { hour + 12 } else { hour });
    }
    if let Some(rest) = time_str.strip_suffix("am") {
        let hour = hour_part(rest)?;
        return Some(if hour == 12 { 0 } else { hour });
    }
    hour_part(&time_str)
}

fn hour_part(s: &str) -> Option<u32> {
    let s = s.trim();
    match s.split_once(':') {
        Some((hour, _)) => hour.parse().ok(),
        None => s.parse().ok(),
    }
}

/// Find an explicit "between H-H" range. A bare start endpoint inherits the
/// end endpoint's am/pm marker, so "between 3-5 pm" reads as 15:00-17:00.
pub fn extract_hour_range(text: &str) -> Option<HourRange> {
    let text_lower = text.to_lowercase();
    let caps = HOUR_RANGE.captures(&text_lower)?;

    let start_raw: u32 = caps[1].parse().ok()?;
    let end_raw: u32 = caps[3].parse().ok()?;
    let start_meridiem = caps.get(2).map(|m| m.as_str());
    let end_meridiem = caps.get(4).map(|m| m.as_str());

    let start = to_24h(start_raw, start_meridiem.or(end_meridiem));
    let end = to_24h(end_raw, end_meridiem.or(start_meridiem));

    Some(HourRange {
        start,
        end,
        start_text: display_endpoint(&caps, 1, 2),
        end_text: display_endpoint(&caps, 3, 4),
    })
}

fn to_24h(hour: u32, meridiem: Option<&str>) -> u32 {
    match meridiem {
        Some("pm") if hour != 12 => hour + 12,
        Some("am") if hour == 12 => 0,
        _ => hour,
    }
}

fn display_endpoint(caps: &regex::Captures<'_>, hour_group: usize, meridiem_group: usize) -> String {
    match caps.get(meridiem_group) {
        Some(m) => format!("{} {}", &caps[hour_group], m.as_str()),
        None => caps[hour_group].to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Monday.
    fn monday_now() -> NaiveDateTime {
        "2025-06-16T10:00:00".parse().unwrap()
    }

    // Wednesday.
    fn wednesday_now() -> NaiveDateTime {
        "2025-06-18T10:00:00".parse().unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_tomorrow() {
        let (d, _) = extract("book a call for tomorrow", monday_now());
        assert_eq!(d, Some(date("2025-06-17")));
    }

    #[test]
    fn test_today() {
        let (d, _) = extract("any time today?", monday_now());
        assert_eq!(d, Some(date("2025-06-16")));
    }

    #[test]
    fn test_next_week_from_monday_is_next_monday() {
        let (d, _) = extract("next week", monday_now());
        assert_eq!(d, Some(date("2025-06-23")));
    }

    #[test]
    fn test_next_week_mid_week_is_coming_monday() {
        let (d, _) = extract("book something next week", wednesday_now());
        assert_eq!(d, Some(date("2025-06-23")));
    }

    #[test]
    fn test_this_week_defaults_to_tomorrow() {
        let (d, _) = extract("sometime this week", wednesday_now());
        assert_eq!(d, Some(date("2025-06-19")));
    }

    #[test]
    fn test_this_friday_from_monday() {
        let (d, _) = extract("do you have free time this friday", monday_now());
        let resolved = d.unwrap();
        assert_eq!(resolved, date("2025-06-20"));
        // Same week: at or after the anchor, within seven days.
        assert!(resolved >= date("2025-06-16"));
        assert!(resolved < date("2025-06-23"));
    }

    #[test]
    fn test_next_friday_is_a_week_later() {
        let (d, _) = extract("next friday", monday_now());
        assert_eq!(d, Some(date("2025-06-27")));
    }

    #[test]
    fn test_bare_day_name_rolls_forward_when_passed() {
        // Anchor is Wednesday; a bare "monday" means the coming Monday.
        let (d, _) = extract("monday", wednesday_now());
        assert_eq!(d, Some(date("2025-06-23")));
    }

    #[test]
    fn test_fuzzy_iso_date() {
        let (d, _) = extract("book me on 2025-07-04", monday_now());
        assert_eq!(d, Some(date("2025-07-04")));
    }

    #[test]
    fn test_fuzzy_month_day_defaults_year() {
        let (d, _) = extract("schedule a meeting june 20", monday_now());
        assert_eq!(d, Some(date("2025-06-20")));
    }

    #[test]
    fn test_no_date_no_time() {
        let (d, t) = extract("what can you do?", monday_now());
        assert_eq!(d, None);
        assert_eq!(t, None);
    }

    #[test]
    fn test_time_hour_minute_pm() {
        let (_, t) = extract("3:30pm works", monday_now());
        assert_eq!(t, Some("15:30".to_string()));
    }

    #[test]
    fn test_time_24h_clock_unchanged() {
        let (_, t) = extract("how about 14:30", monday_now());
        assert_eq!(t, Some("14:30".to_string()));
    }

    #[test]
    fn test_time_hour_pm() {
        let (_, t) = extract("this friday at 3pm", monday_now());
        assert_eq!(t, Some("15:00".to_string()));
    }

    #[test]
    fn test_noon_and_midnight() {
        let (_, noon) = extract("12pm", monday_now());
        assert_eq!(noon, Some("12:00".to_string()));
        let (_, midnight) = extract("12am", monday_now());
        assert_eq!(midnight, Some("00:00".to_string()));
    }

    #[test]
    fn test_bare_low_hour_reads_as_pm() {
        let (_, t) = extract("3", monday_now());
        assert_eq!(t, Some("15:00".to_string()));
    }

    #[test]
    fn test_bare_morning_hour_stays_am() {
        let (_, t) = extract("9", monday_now());
        assert_eq!(t, Some("09:00".to_string()));
    }

    #[test]
    fn test_bare_afternoon_hour_unchanged() {
        let (_, t) = extract("13", monday_now());
        assert_eq!(t, Some("13:00".to_string()));
    }

    #[test]
    fn test_named_period_overrides_pattern_time() {
        let (_, t) = extract("tomorrow morning at 3pm", monday_now());
        assert_eq!(t, Some("09:00".to_string()));
    }

    #[test]
    fn test_afternoon_and_evening_periods() {
        let (_, afternoon) = extract("tomorrow afternoon", monday_now());
        assert_eq!(afternoon, Some("14:00".to_string()));
        let (_, evening) = extract("friday evening", monday_now());
        assert_eq!(evening, Some("17:00".to_string()));
    }

    #[test]
    fn test_is_bare_number() {
        assert!(is_bare_number("9"));
        assert!(is_bare_number(" 13 "));
        assert!(!is_bare_number("130"));
        assert!(!is_bare_number("9am"));
        assert!(!is_bare_number(""));
    }

    #[test]
    fn test_parse_time_to_hour() {
        assert_eq!(parse_time_to_hour("3pm"), Some(15));
        assert_eq!(parse_time_to_hour("3:30pm"), Some(15));
        assert_eq!(parse_time_to_hour("12pm"), Some(12));
        assert_eq!(parse_time_to_hour("12am"), Some(0));
        assert_eq!(parse_time_to_hour("11 am"), Some(11));
        assert_eq!(parse_time_to_hour("15:30"), Some(15));
        assert_eq!(parse_time_to_hour("15"), Some(15));
        assert_eq!(parse_time_to_hour("nope"), None);
    }

    #[test]
    fn test_hour_range_inherits_trailing_meridiem() {
        let range = extract_hour_range("book a meeting between 3-5 PM next week").unwrap();
        assert_eq!(range.start, 15);
        assert_eq!(range.end, 17);
        assert_eq!(range.start_text, "3");
        assert_eq!(range.end_text, "5 pm");
    }

    #[test]
    fn test_hour_range_explicit_24h() {
        let range = extract_hour_range("between 10-12").unwrap();
        assert_eq!(range.start, 10);
        assert_eq!(range.end, 12);
        assert_eq!(range.start_text, "10");
        assert_eq!(range.end_text, "12");
    }

    #[test]
    fn test_no_range_without_between() {
        assert!(extract_hour_range("from 3 to 5").is_none());
    }
}
