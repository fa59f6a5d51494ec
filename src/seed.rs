//! Built-in fallback data, used only when the very first fetch fails so
//! consumers are never left with an empty dashboard.

use crate::dates::format_date;
use crate::models::{Lead, SourceChannel};
use chrono::{Duration, NaiveDate};

/// Six representative sample leads, dated relative to `today` so the
/// freshness-sensitive derivations stay meaningful.
pub fn seed_leads(today: NaiveDate) -> Vec<Lead> {
    let today_str = format_date(today);
    let yesterday = format_date(today - Duration::days(1));
    let stale = format_date(today - Duration::days(90));

    vec![
        Lead {
            id: 1,
            date: today_str.clone(),
            name: "Arjun Sharma".to_string(),
            mobile: "+91 9876543210".to_string(),
            occupation: "Business Owner".to_string(),
            unit_type: "3BHK".to_string(),
            budget: "1.5 Cr".to_string(),
            source: SourceChannel::SocialMedia,
            representative: "Rohan V.".to_string(),
            discussion: "Very interested, asked for a site visit this weekend. Budget is flexible."
                .to_string(),
            rating: 5,
            visit_status: String::new(),
            deal_status: String::new(),
        },
        Lead {
            id: 2,
            date: today_str.clone(),
            name: "Priya Patel".to_string(),
            mobile: "+91 8765432109".to_string(),
            occupation: "Software Engineer".to_string(),
            unit_type: "2BHK".to_string(),
            budget: "85L".to_string(),
            source: SourceChannel::WalkIn,
            representative: "Sanya M.".to_string(),
            discussion:
                "Looking for near-possession flats. Liked the 2BHK layout. Will discuss with family."
                    .to_string(),
            rating: 4,
            visit_status: String::new(),
            deal_status: String::new(),
        },
        Lead {
            id: 3,
            date: yesterday,
            name: "Vikram Singh".to_string(),
            mobile: "+91 7654321098".to_string(),
            occupation: "Doctor".to_string(),
            unit_type: "4BHK Penthouse".to_string(),
            budget: "3.2 Cr".to_string(),
            source: SourceChannel::Broker,
            representative: "Rohan V.".to_string(),
            discussion: "Negotiating on parking space. High intent but price concern mentioned."
                .to_string(),
            rating: 4,
            visit_status: String::new(),
            deal_status: String::new(),
        },
        Lead {
            id: 4,
            date: today_str.clone(),
            name: "Meera Iyer".to_string(),
            mobile: "+91 6543210987".to_string(),
            occupation: "Interior Designer".to_string(),
            unit_type: "3BHK".to_string(),
            budget: "1.2 Cr".to_string(),
            source: SourceChannel::Reference,
            representative: "Amit K.".to_string(),
            discussion: "Referred by current resident. Wants to book immediately if layout matches."
                .to_string(),
            rating: 5,
            visit_status: String::new(),
            deal_status: String::new(),
        },
        Lead {
            id: 5,
            date: stale,
            name: "Rahul Gupta".to_string(),
            mobile: "+91 5432109876".to_string(),
            occupation: "Corporate Manager".to_string(),
            unit_type: "2BHK".to_string(),
            budget: "70L".to_string(),
            source: SourceChannel::Leaflet,
            representative: "Sanya M.".to_string(),
            discussion: "Just checking prices. No immediate plan. Follow up in 6 months."
                .to_string(),
            rating: 2,
            visit_status: String::new(),
            deal_status: String::new(),
        },
        Lead {
            id: 6,
            date: today_str,
            name: "Suresh Reddy".to_string(),
            mobile: "+91 4321098765".to_string(),
            occupation: "Real Estate Investor".to_string(),
            unit_type: "Studio".to_string(),
            budget: "45L".to_string(),
            source: SourceChannel::WalkIn,
            representative: "Amit K.".to_string(),
            discussion: "Missed the call twice. Need to re-engage.".to_string(),
            rating: 0,
            visit_status: String::new(),
            deal_status: String::new(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_has_unique_ids_and_valid_dates() {
        let today = NaiveDate::from_ymd_opt(2025, 8, 5).expect("valid date");
        let leads = seed_leads(today);
        assert_eq!(leads.len(), 6);

        let mut ids: Vec<i64> = leads.iter().map(|l| l.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 6);

        for lead in &leads {
            assert!(NaiveDate::parse_from_str(&lead.date, "%Y-%m-%d").is_ok());
            assert!(lead.rating <= 5);
        }
    }
}
