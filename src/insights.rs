//! Supplemental derivations over a snapshot: aging buckets, high-value
//! leakage alerts, the conversion funnel, discussion mood, and search.
//!
//! Everything here is a pure function of the lead slice plus a reference
//! date; nothing is stored between refreshes.

use crate::models::Lead;
use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

/// Leads retained per aging bucket.
const BUCKET_SIZE: usize = 10;
/// Alerts retained by the leakage detector.
const LEAKAGE_SIZE: usize = 4;
/// Budget floor (in lakhs) for a leakage alert.
const LEAKAGE_MIN_LAKHS: f64 = 60.0;
/// Minimum age in days for a leakage alert.
const LEAKAGE_MIN_AGE_DAYS: i64 = 5;

/// Age of a lead in days relative to `today`. Leads whose date did not
/// normalize age 0.
pub fn days_old(lead: &Lead, today: NaiveDate) -> i64 {
    match NaiveDate::parse_from_str(&lead.date, "%Y-%m-%d") {
        Ok(date) => (today - date).num_days().abs(),
        Err(_) => 0,
    }
}

/// A lead annotated with its age.
#[derive(Debug, Clone, Serialize)]
pub struct AgedLead {
    #[serde(flatten)]
    pub lead: Lead,
    pub days_old: i64,
}

/// Pipeline freshness buckets. Leads with a completed visit drop out of
/// the follow-up and urgent buckets.
#[derive(Debug, Clone, Serialize)]
pub struct AgingBuckets {
    /// 0-2 days old.
    pub fresh: Vec<AgedLead>,
    /// 3-7 days old, visit not done.
    pub follow_up: Vec<AgedLead>,
    /// Over 7 days old, visit not done.
    pub urgent: Vec<AgedLead>,
}

pub fn aging_buckets(leads: &[Lead], today: NaiveDate) -> AgingBuckets {
    let mut fresh = Vec::new();
    let mut follow_up = Vec::new();
    let mut urgent = Vec::new();

    for lead in leads {
        let age = days_old(lead, today);
        let aged = AgedLead {
            lead: lead.clone(),
            days_old: age,
        };
        if age < 3 {
            fresh.push(aged);
        } else if lead.visit_done() {
            // visited leads need no chasing
        } else if age <= 7 {
            follow_up.push(aged);
        } else {
            urgent.push(aged);
        }
    }

    for bucket in [&mut fresh, &mut follow_up, &mut urgent] {
        bucket.sort_by(|a, b| {
            b.lead
                .rating
                .cmp(&a.lead.rating)
                .then_with(|| b.days_old.cmp(&a.days_old))
        });
        bucket.truncate(BUCKET_SIZE);
    }

    AgingBuckets {
        fresh,
        follow_up,
        urgent,
    }
}

/// Parses a free-text budget into lakhs. Digits and dots are kept, a "cr"
/// suffix scales by 100; anything unparseable is 0.
pub fn budget_in_lakhs(budget: &str) -> f64 {
    let numeric: String = budget
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let value = numeric.parse::<f64>().unwrap_or(0.0);
    if budget.to_lowercase().contains("cr") {
        value * 100.0
    } else {
        value
    }
}

/// A high-value aging lead flagged for intervention.
#[derive(Debug, Clone, Serialize)]
pub struct LeakageAlert {
    #[serde(flatten)]
    pub lead: Lead,
    pub days_old: i64,
    pub budget_lakhs: f64,
}

/// High-value leads (>= 60 lakhs) older than 5 days that are not sold yet,
/// in snapshot order, capped at 4.
pub fn leakage_alerts(leads: &[Lead], today: NaiveDate) -> Vec<LeakageAlert> {
    leads
        .iter()
        .filter_map(|lead| {
            let budget_lakhs = budget_in_lakhs(&lead.budget);
            let age = days_old(lead, today);
            let sold = lead.deal_status.trim().eq_ignore_ascii_case("sold");
            if budget_lakhs >= LEAKAGE_MIN_LAKHS && age > LEAKAGE_MIN_AGE_DAYS && !sold {
                Some(LeakageAlert {
                    lead: lead.clone(),
                    days_old: age,
                    budget_lakhs,
                })
            } else {
                None
            }
        })
        .take(LEAKAGE_SIZE)
        .collect()
}

/// Stage counts for the conversion funnel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunnelStats {
    pub leads: u32,
    pub visits: u32,
    pub follow_up: u32,
    pub hot: u32,
    pub closed: u32,
}

fn follow_up_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)call|follow|visit|site").unwrap())
}

fn closed_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)sold|booked").unwrap())
}

pub fn conversion_funnel(leads: &[Lead]) -> FunnelStats {
    FunnelStats {
        leads: leads.len() as u32,
        visits: leads.iter().filter(|l| l.visit_done()).count() as u32,
        follow_up: leads
            .iter()
            .filter(|l| follow_up_pattern().is_match(&l.discussion))
            .count() as u32,
        hot: leads.iter().filter(|l| l.rating >= 4).count() as u32,
        closed: leads
            .iter()
            .filter(|l| closed_pattern().is_match(&l.deal_status))
            .count() as u32,
    }
}

/// Coarse mood classification of the discussion notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Mood {
    Cold,
    Warm,
    Sensitive,
    #[serde(rename = "Follow-up")]
    FollowUp,
    Active,
}

pub fn classify_mood(discussion: &str) -> Mood {
    let text = discussion.to_lowercase();
    if text.contains("not interested") {
        Mood::Cold
    } else if text.contains("visit") || text.contains("interested") {
        Mood::Warm
    } else if text.contains("negotiat") || text.contains("price") {
        Mood::Sensitive
    } else if text.contains("call") || text.contains("follow") {
        Mood::FollowUp
    } else {
        Mood::Active
    }
}

/// A search result with its classified mood.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    #[serde(flatten)]
    pub lead: Lead,
    pub mood: Mood,
}

/// Case-insensitive substring search across the textual lead fields. An
/// empty query matches nothing.
pub fn search_leads(leads: &[Lead], query: &str) -> Vec<SearchHit> {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return Vec::new();
    }

    leads
        .iter()
        .filter(|l| {
            [
                l.name.as_str(),
                l.mobile.as_str(),
                l.source.label(),
                l.representative.as_str(),
                l.discussion.as_str(),
                l.date.as_str(),
                l.budget.as_str(),
                l.unit_type.as_str(),
                l.visit_status.as_str(),
            ]
            .iter()
            .any(|field| field.to_lowercase().contains(&q))
        })
        .map(|l| SearchHit {
            lead: l.clone(),
            mood: classify_mood(&l.discussion),
        })
        .collect()
}
