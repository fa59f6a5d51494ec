//! Windowed KPI aggregation over a lead snapshot.

use crate::dates;
use crate::models::{DashboardMetrics, Lead, MetricsBundle, SourceChannel};
use chrono::{Datelike, Duration, NaiveDate};

/// The four standard reporting windows, all derived from `today`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    Today,
    Yesterday,
    MonthToDate,
    YearToDate,
}

/// Inclusive `[start, end]` range for a window.
pub fn window_range(window: Window, today: NaiveDate) -> (NaiveDate, NaiveDate) {
    match window {
        Window::Today => (today, today),
        Window::Yesterday => {
            let yesterday = today - Duration::days(1);
            (yesterday, yesterday)
        }
        Window::MonthToDate => (today.with_day(1).unwrap_or(today), today),
        Window::YearToDate => (
            NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today),
            today,
        ),
    }
}

/// Computes channel mix, visit count, and conversion ratio for an inclusive
/// date range.
///
/// A single-day range matches by exact date-string equality; otherwise the
/// comparison is lexicographic, which coincides with chronological order
/// because normalized dates are fixed-width `YYYY-MM-DD`. Leads whose date
/// stayed verbatim only match when the raw string happens to fall inside
/// the range.
pub fn compute_metrics(leads: &[Lead], start: NaiveDate, end: NaiveDate) -> DashboardMetrics {
    let start_str = dates::format_date(start);
    let end_str = dates::format_date(end);
    let single_day = start_str == end_str;

    let filtered: Vec<&Lead> = leads
        .iter()
        .filter(|l| {
            if single_day {
                l.date == start_str
            } else {
                l.date.as_str() >= start_str.as_str() && l.date.as_str() <= end_str.as_str()
            }
        })
        .collect();

    let total_leads = filtered.len() as u32;
    let site_visits = filtered.iter().filter(|l| l.visit_done()).count() as u32;
    let channel = |which: SourceChannel| -> u32 {
        filtered.iter().filter(|l| l.source == which).count() as u32
    };

    DashboardMetrics {
        social_media: channel(SourceChannel::SocialMedia),
        walkins: channel(SourceChannel::WalkIn),
        reference: channel(SourceChannel::Reference),
        broker: channel(SourceChannel::Broker),
        total_leads,
        site_visits,
        // Defined as 0 for an empty window
        ratio: if total_leads > 0 {
            f64::from(site_visits) / f64::from(total_leads) * 100.0
        } else {
            0.0
        },
        ..DashboardMetrics::empty()
    }
}

/// Computes all four standard windows against one snapshot.
pub fn compute_bundle(leads: &[Lead], today: NaiveDate) -> MetricsBundle {
    let for_window = |window: Window| {
        let (start, end) = window_range(window, today);
        compute_metrics(leads, start, end)
    };

    MetricsBundle {
        today: for_window(Window::Today),
        yesterday: for_window(Window::Yesterday),
        mtd: for_window(Window::MonthToDate),
        ytd: for_window(Window::YearToDate),
    }
}
