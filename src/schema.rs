//! Canonical fields and header resolution.
//!
//! The sheet's header names drift across edits, so columns are identified
//! by a fixed alias table instead of exact names. The first header row of a
//! fetch defines the schema for every data row in that fetch.

/// The fixed set of semantic columns a raw header can resolve onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanonicalField {
    Identifier,
    Date,
    Name,
    Mobile,
    Occupation,
    UnitType,
    Budget,
    SourceChannel,
    Representative,
    Discussion,
    Rating,
    VisitStatus,
    DealStatus,
}

pub const FIELD_COUNT: usize = 13;

/// Lowercase alias tokens per field, in declaration order. A header cell
/// matches a field when it equals or contains any of that field's tokens.
const FIELD_ALIASES: [(CanonicalField, &[&str]); FIELD_COUNT] = [
    (CanonicalField::Identifier, &["sr no", "id", "s.no", "serial"]),
    (CanonicalField::Date, &["date", "entry", "created", "lead date"]),
    (CanonicalField::Name, &["name", "prospect", "client", "customer"]),
    (CanonicalField::Mobile, &["mobile", "phone", "contact"]),
    (CanonicalField::Occupation, &["occupation", "profession", "work"]),
    (CanonicalField::UnitType, &["flat", "bhk", "unit"]),
    (CanonicalField::Budget, &["budget", "value", "amount"]),
    (CanonicalField::SourceChannel, &["source", "channel", "medium"]),
    (
        CanonicalField::Representative,
        &["employee", "sales", "rep", "executive"],
    ),
    (
        CanonicalField::Discussion,
        &["discussion", "remarks", "notes", "feedback"],
    ),
    (CanonicalField::Rating, &["rating", "hot", "priority", "score"]),
    (CanonicalField::VisitStatus, &["site visit", "visit", "sv", "status"]),
    (CanonicalField::DealStatus, &["status", "booking", "stage"]),
];

/// Mapping from canonical field to column index for one fetch.
#[derive(Debug, Clone)]
pub struct HeaderMap {
    columns: [Option<usize>; FIELD_COUNT],
}

impl HeaderMap {
    /// Resolves a raw header row into a column mapping.
    ///
    /// Pure function: matching is case-insensitive equals-or-contains, and
    /// for each field the first matching column wins. Fields without a
    /// matching header stay absent. Two fields may legitimately resolve to
    /// the same column (e.g. a lone "Status" header serves both the visit
    /// and the deal field).
    pub fn resolve(raw_headers: &[String]) -> Self {
        let lowered: Vec<String> = raw_headers
            .iter()
            .map(|h| h.trim().to_lowercase())
            .collect();

        let mut columns = [None; FIELD_COUNT];
        for (field, aliases) in FIELD_ALIASES {
            columns[field as usize] = lowered
                .iter()
                .position(|h| aliases.iter().any(|a| h.as_str() == *a || h.contains(*a)));
        }

        Self { columns }
    }

    /// Column index a field resolved to, if any.
    pub fn column(&self, field: CanonicalField) -> Option<usize> {
        self.columns[field as usize]
    }

    /// Cell value for a field in one data row; absent column or short row
    /// yields the empty string.
    pub fn value<'a>(&self, row: &'a [String], field: CanonicalField) -> &'a str {
        self.column(field)
            .and_then(|idx| row.get(idx))
            .map(|cell| cell.trim())
            .unwrap_or("")
    }
}
