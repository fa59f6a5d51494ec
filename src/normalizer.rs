//! Turns tokenized sheet rows into normalized leads.

use crate::dates;
use crate::models::{Lead, SourceChannel};
use crate::schema::{CanonicalField, HeaderMap};
use crate::tokenizer;
use chrono::NaiveDate;

/// Offset for synthetic identifiers, keeping them clear of real sheet ids
/// under normal data volumes.
pub const SYNTHETIC_ID_BASE: i64 = 5000;

/// Full per-refresh pipeline: tokenize, resolve headers, normalize, sort.
///
/// The first tokenized row defines the schema; every following row yields
/// exactly one lead. Returns an empty vector when the payload has no data
/// rows.
pub fn parse_sheet(text: &str, today: NaiveDate) -> Vec<Lead> {
    let rows = tokenizer::tokenize(text);
    if rows.len() < 2 {
        return Vec::new();
    }

    let map = HeaderMap::resolve(&rows[0]);
    let mut leads: Vec<Lead> = rows[1..]
        .iter()
        .enumerate()
        .map(|(index, row)| normalize_row(&map, row, index, today))
        .collect();

    sort_chronological(&mut leads);
    leads
}

/// Normalizes one data row. Never fails: malformed cells degrade to
/// defaults so the row count invariant holds.
pub fn normalize_row(
    map: &HeaderMap,
    row: &[String],
    row_index: usize,
    today: NaiveDate,
) -> Lead {
    let raw_date = map.value(row, CanonicalField::Date);
    let date = match dates::normalize_date(raw_date, today) {
        Some(resolved) => dates::format_date(resolved),
        // Unparseable dates are preserved verbatim as a soft fallback.
        None => raw_date.to_string(),
    };

    let id = map
        .value(row, CanonicalField::Identifier)
        .parse::<i64>()
        .unwrap_or(row_index as i64 + SYNTHETIC_ID_BASE);

    let rating = map
        .value(row, CanonicalField::Rating)
        .parse::<i64>()
        .unwrap_or(0)
        .clamp(0, 5) as u8;

    Lead {
        id,
        date,
        name: map.value(row, CanonicalField::Name).to_string(),
        mobile: map.value(row, CanonicalField::Mobile).to_string(),
        occupation: map.value(row, CanonicalField::Occupation).to_string(),
        unit_type: map.value(row, CanonicalField::UnitType).to_string(),
        budget: map.value(row, CanonicalField::Budget).to_string(),
        source: SourceChannel::classify(map.value(row, CanonicalField::SourceChannel)),
        representative: map.value(row, CanonicalField::Representative).to_string(),
        discussion: map.value(row, CanonicalField::Discussion).to_string(),
        rating,
        visit_status: map.value(row, CanonicalField::VisitStatus).to_string(),
        deal_status: map.value(row, CanonicalField::DealStatus).to_string(),
    }
}

/// Orders leads newest-first by normalized date, ties broken by id
/// descending. The sort is stable, so equal (date, id) pairs keep their
/// relative order.
pub fn sort_chronological(leads: &mut [Lead]) {
    leads.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));
}
