/// Unit tests for the ingestion pipeline and derivation engine
/// Exercises header resolution, normalization, windowed metrics, and the
/// rankings through the public library surface.
use chrono::NaiveDate;
use maple_lead_api::metrics::{compute_metrics, Window};
use maple_lead_api::models::{Lead, SourceChannel};
use maple_lead_api::normalizer::parse_sheet;
use maple_lead_api::rankings::leaderboard;

fn reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 8, 5).expect("valid reference date")
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn lead(id: i64, date: &str, visit: &str, source: SourceChannel, rep: &str) -> Lead {
    Lead {
        id,
        date: date.to_string(),
        name: format!("Lead {}", id),
        mobile: String::new(),
        occupation: String::new(),
        unit_type: String::new(),
        budget: String::new(),
        source,
        representative: rep.to_string(),
        discussion: String::new(),
        rating: 0,
        visit_status: visit.to_string(),
        deal_status: String::new(),
    }
}

mod pipeline_tests {
    use super::*;

    const SHEET: &str = "\
Sr No,Lead Date,Client Name,Phone,Source,Rep,Remarks,Score,Visit
1,13/02/25,Arjun Sharma,+91 9876543210,Instagram,Rohan V.,Keen on 3BHK,4,done
2,03/08/2025,Priya Patel,+91 8765432109,Walk-in,Sanya M.,Will revisit,,pending
,04/08/2025,Meera Iyer,+91 6543210987,Reference,Amit K.,\"Referred, hot lead\",7,Done
";

    #[test]
    fn drifted_headers_resolve_onto_canonical_fields() {
        let leads = parse_sheet(SHEET, reference_date());
        let arjun = leads.iter().find(|l| l.id == 1).expect("lead 1");

        // "Lead Date" -> date, "Client Name" -> name, "Phone" -> mobile
        assert_eq!(arjun.date, "2025-02-13");
        assert_eq!(arjun.name, "Arjun Sharma");
        assert_eq!(arjun.mobile, "+91 9876543210");
        assert_eq!(arjun.source, SourceChannel::SocialMedia);
        assert_eq!(arjun.representative, "Rohan V.");
        assert_eq!(arjun.discussion, "Keen on 3BHK");
        assert_eq!(arjun.rating, 4);
        assert!(arjun.visit_done());
    }

    #[test]
    fn ambiguous_first_part_over_twelve_resolves_day_month() {
        // 13 cannot be a month, so 13/02/25 is February 13, 2025
        let leads = parse_sheet(SHEET, reference_date());
        assert_eq!(leads.iter().find(|l| l.id == 1).expect("lead").date, "2025-02-13");
    }

    #[test]
    fn rating_defaults_empty_and_clamps_overflow() {
        let leads = parse_sheet(SHEET, reference_date());
        let priya = leads.iter().find(|l| l.id == 2).expect("lead 2");
        assert_eq!(priya.rating, 0);
        let meera = leads.iter().find(|l| l.name == "Meera Iyer").expect("lead");
        assert_eq!(meera.rating, 5);
    }

    #[test]
    fn quoted_discussion_cell_keeps_embedded_comma() {
        let leads = parse_sheet(SHEET, reference_date());
        let meera = leads.iter().find(|l| l.name == "Meera Iyer").expect("lead");
        assert_eq!(meera.discussion, "Referred, hot lead");
    }

    #[test]
    fn records_come_back_newest_first() {
        let leads = parse_sheet(SHEET, reference_date());
        let dates: Vec<&str> = leads.iter().map(|l| l.date.as_str()).collect();
        assert_eq!(dates, vec!["2025-08-04", "2025-08-03", "2025-02-13"]);
    }
}

mod metrics_tests {
    use super::*;

    #[test]
    fn single_day_window_counts_visits_and_ratio() {
        // 10 leads dated today, 4 with a completed visit in mixed case
        let today = ymd(2025, 8, 5);
        let leads: Vec<Lead> = (0..10)
            .map(|i| {
                let visit = match i {
                    0 => "Done",
                    1 => "done",
                    2 => "DONE",
                    3 => " done ",
                    _ => "pending",
                };
                lead(i, "2025-08-05", visit, SourceChannel::WalkIn, "A")
            })
            .collect();

        let m = compute_metrics(&leads, today, today);
        assert_eq!(m.total_leads, 10);
        assert_eq!(m.site_visits, 4);
        assert_eq!(m.ratio, 40.0);
    }

    #[test]
    fn ratio_is_zero_for_empty_window() {
        let leads = vec![lead(1, "2025-01-01", "done", SourceChannel::WalkIn, "A")];
        let m = compute_metrics(&leads, ymd(2025, 8, 5), ymd(2025, 8, 5));
        assert_eq!(m.total_leads, 0);
        assert_eq!(m.ratio, 0.0);
    }

    #[test]
    fn multi_day_window_filters_by_inclusive_range() {
        let leads = vec![
            lead(1, "2025-08-01", "", SourceChannel::WalkIn, "A"),
            lead(2, "2025-08-03", "", SourceChannel::WalkIn, "A"),
            lead(3, "2025-07-31", "", SourceChannel::WalkIn, "A"),
            lead(4, "2025-08-05", "", SourceChannel::WalkIn, "A"),
        ];
        let m = compute_metrics(&leads, ymd(2025, 8, 1), ymd(2025, 8, 5));
        assert_eq!(m.total_leads, 3);
    }

    #[test]
    fn channel_mix_counts_by_classified_source() {
        let today = ymd(2025, 8, 5);
        let leads = vec![
            lead(1, "2025-08-05", "", SourceChannel::SocialMedia, "A"),
            lead(2, "2025-08-05", "", SourceChannel::SocialMedia, "A"),
            lead(3, "2025-08-05", "", SourceChannel::WalkIn, "A"),
            lead(4, "2025-08-05", "", SourceChannel::Broker, "A"),
            lead(5, "2025-08-05", "", SourceChannel::Reference, "A"),
            lead(6, "2025-08-05", "", SourceChannel::Leaflet, "A"),
        ];
        let m = compute_metrics(&leads, today, today);
        assert_eq!(m.social_media, 2);
        assert_eq!(m.walkins, 1);
        assert_eq!(m.broker, 1);
        assert_eq!(m.reference, 1);
        // Leaflet is counted in the total but in no channel column
        assert_eq!(m.total_leads, 6);
    }

    #[test]
    fn unparseable_dates_fall_outside_every_window() {
        let today = ymd(2025, 8, 5);
        let leads = vec![
            lead(1, "someday", "done", SourceChannel::WalkIn, "A"),
            lead(2, "2025-08-05", "", SourceChannel::WalkIn, "A"),
        ];
        let m = compute_metrics(&leads, today, today);
        assert_eq!(m.total_leads, 1);
        assert_eq!(m.site_visits, 0);
    }

    #[test]
    fn placeholder_inventory_fields_stay_zeroed() {
        let m = compute_metrics(&[], ymd(2025, 8, 5), ymd(2025, 8, 5));
        assert_eq!(m.total_sold_number, 0);
        assert_eq!(m.total_sold_value, "0 Cr");
        assert_eq!(m.total_remaining_value, "0 Cr");
    }

    #[test]
    fn window_helper_matches_manual_ranges() {
        use maple_lead_api::metrics::window_range;
        let today = ymd(2025, 8, 5);
        assert_eq!(window_range(Window::MonthToDate, today).0, ymd(2025, 8, 1));
        assert_eq!(window_range(Window::YearToDate, today).0, ymd(2025, 1, 1));
    }
}

mod leaderboard_tests {
    use super::*;

    #[test]
    fn groups_representatives_and_orders_by_visits() {
        let leads = vec![
            lead(1, "2025-08-05", "done", SourceChannel::WalkIn, "A"),
            lead(2, "2025-08-05", "pending", SourceChannel::WalkIn, "A"),
            lead(3, "2025-08-05", "done", SourceChannel::WalkIn, "B"),
        ];
        let board = leaderboard(&leads);

        assert_eq!(board.len(), 2);
        assert_eq!(board[0].representative, "A");
        assert_eq!((board[0].visits, board[0].leads), (1, 2));
        assert_eq!(board[1].representative, "B");
        assert_eq!((board[1].visits, board[1].leads), (1, 1));
    }
}
