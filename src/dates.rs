//! Date disambiguation for free-form sheet cells.
//!
//! Sheet exports mix DD/MM/YYYY and MM/DD/YYYY conventions across rows, so
//! three-part numeric dates are resolved with a future-rejection heuristic:
//! an interpretation that would place the lead in the future loses to one
//! that does not. The heuristic is lossy for fully ambiguous input; a fully ambiguous
//! past date resolves day-month-year and nothing beyond the stated rules is
//! guessed. `today` is passed explicitly so resolution is deterministic.

use chrono::NaiveDate;

/// Fallback formats tried when a cell is not a three-part numeric date.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d %b %Y",
    "%d %B %Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d-%b-%Y",
];

/// Resolves a raw date-like string into a calendar date, or `None` when it
/// cannot be parsed at all.
pub fn normalize_date(raw: &str, today: NaiveDate) -> Option<NaiveDate> {
    let clean = raw.trim();
    if clean.is_empty() {
        return None;
    }

    let parts: Vec<&str> = clean.split(['/', '-']).collect();
    if parts.len() == 3 {
        if let (Ok(p0), Ok(p1), Ok(p2)) = (
            parts[0].trim().parse::<u32>(),
            parts[1].trim().parse::<u32>(),
            parts[2].trim().parse::<i32>(),
        ) {
            return disambiguate(p0, p1, p2, today).or_else(|| parse_generic(clean));
        }
    }

    parse_generic(clean)
}

/// Formats a resolved date in the fixed form used throughout the system.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn disambiguate(p0: u32, p1: u32, p2: i32, today: NaiveDate) -> Option<NaiveDate> {
    let year = if p2 < 100 { p2 + 2000 } else { p2 };

    // Invalid calendar candidates are discarded, never rolled over.
    let dmy = NaiveDate::from_ymd_opt(year, p1, p0);
    let mdy = NaiveDate::from_ymd_opt(year, p0, p1);

    // Reject interpretations strictly after today (end-of-day), unless both
    // would be rejected.
    match (dmy, mdy) {
        (Some(d), Some(m)) => match (d > today, m > today) {
            (true, false) => return Some(m),
            (false, true) => return Some(d),
            _ => {}
        },
        (Some(d), None) if d <= today => return Some(d),
        (None, Some(m)) if m <= today => return Some(m),
        _ => {}
    }

    // First part cannot be a month: the second must be the month.
    if p0 > 12 && (1..=12).contains(&p1) {
        return dmy;
    }
    // Second part is a valid month and first a plausible day.
    if (1..=12).contains(&p1) && (1..=31).contains(&p0) {
        return dmy;
    }

    None
}

fn parse_generic(raw: &str) -> Option<NaiveDate> {
    use chrono::Datelike;

    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    for fmt in DATE_FORMATS {
        // The year guard keeps strings like "31/02/25" from parsing as
        // year 31; short years belong to the three-part path.
        if let Ok(date) = NaiveDate::parse_from_str(raw, fmt) {
            if date.year() >= 1000 {
                return Some(date);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, 5).expect("valid reference date")
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn first_part_over_twelve_forces_day_month_order() {
        assert_eq!(normalize_date("13/02/25", today()), Some(ymd(2025, 2, 13)));
        assert_eq!(normalize_date("25-12-2024", today()), Some(ymd(2024, 12, 25)));
    }

    #[test]
    fn future_interpretation_loses_to_past_one() {
        // Day-month reading (2 March) is in the future on 15 Feb; month-day
        // reading (3 February) is not.
        let reference = ymd(2025, 2, 15);
        assert_eq!(
            normalize_date("02/03/25", reference),
            Some(ymd(2025, 2, 3))
        );
    }

    #[test]
    fn fully_ambiguous_past_date_resolves_day_month() {
        assert_eq!(normalize_date("05/04/2025", today()), Some(ymd(2025, 4, 5)));
    }

    #[test]
    fn two_digit_year_expands_to_2000s() {
        assert_eq!(normalize_date("01/02/24", today()), Some(ymd(2024, 2, 1)));
    }

    #[test]
    fn both_future_falls_through_to_order_rules() {
        assert_eq!(normalize_date("01/02/99", today()), Some(ymd(2099, 2, 1)));
    }

    #[test]
    fn month_day_reading_accepted_when_day_month_invalid() {
        // 25 cannot be a month, so 12/25 must be December 25.
        assert_eq!(normalize_date("12/25/2024", today()), Some(ymd(2024, 12, 25)));
    }

    #[test]
    fn iso_and_textual_dates_parse_via_fallback() {
        assert_eq!(normalize_date("2025-04-15", today()), Some(ymd(2025, 4, 15)));
        assert_eq!(normalize_date("2025/04/15", today()), Some(ymd(2025, 4, 15)));
        assert_eq!(normalize_date("15 Apr 2025", today()), Some(ymd(2025, 4, 15)));
        assert_eq!(
            normalize_date("Apr 15, 2025", today()),
            Some(ymd(2025, 4, 15))
        );
        assert_eq!(
            normalize_date("2025-04-15T10:30:00Z", today()),
            Some(ymd(2025, 4, 15))
        );
    }

    #[test]
    fn garbage_reports_unparseable() {
        assert_eq!(normalize_date("", today()), None);
        assert_eq!(normalize_date("soon", today()), None);
        assert_eq!(normalize_date("99/99/99", today()), None);
    }

    #[test]
    fn resolution_is_deterministic_for_fixed_reference() {
        let first = normalize_date("05/04/2025", today());
        for _ in 0..10 {
            assert_eq!(normalize_date("05/04/2025", today()), first);
        }
    }

    #[test]
    fn formats_fixed_width_iso() {
        assert_eq!(format_date(ymd(2025, 2, 3)), "2025-02-03");
    }
}
