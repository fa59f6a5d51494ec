use serde::{Deserialize, Serialize};

// ============ Core Lead Model ============

/// One normalized prospect record from the lead sheet.
///
/// This is the central entity. Every raw data row maps to exactly one
/// `Lead`; malformed cells degrade to defaults instead of dropping the row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    /// Unique identifier within a snapshot. Taken from the sheet when the
    /// identifier column parses, otherwise synthetic (row index + 5000).
    pub id: i64,
    /// Calendar date as `YYYY-MM-DD` when the raw cell resolved, otherwise
    /// the raw cell preserved verbatim.
    pub date: String,
    /// Prospect name.
    pub name: String,
    /// Contact number, free text.
    pub mobile: String,
    /// Occupation / profession.
    pub occupation: String,
    /// Unit configuration the prospect asked about (e.g. "3BHK").
    pub unit_type: String,
    /// Free-text budget (e.g. "85L", "1.5 Cr").
    pub budget: String,
    /// Acquisition channel, classified from the raw source cell.
    pub source: SourceChannel,
    /// Sales representative handling the lead.
    pub representative: String,
    /// Latest discussion notes.
    pub discussion: String,
    /// Interest rating, always in 0..=5.
    pub rating: u8,
    /// Site-visit status, free text ("done" marks a completed visit).
    pub visit_status: String,
    /// Deal stage, free text ("Sold", "Booked", "Open", ...).
    pub deal_status: String,
}

impl Lead {
    /// Whether the site visit is completed. Comparison is trimmed and
    /// case-insensitive against "done".
    pub fn visit_done(&self) -> bool {
        self.visit_status.trim().eq_ignore_ascii_case("done")
    }
}

/// Closed set of acquisition channels.
///
/// Raw source cells are classified once during normalization; unrecognized
/// text falls back to `WalkIn`, keeping the type total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceChannel {
    #[serde(rename = "Walk-in")]
    WalkIn,
    #[serde(rename = "Social Media")]
    SocialMedia,
    #[serde(rename = "Broker")]
    Broker,
    #[serde(rename = "Reference")]
    Reference,
    #[serde(rename = "Leaflet")]
    Leaflet,
}

impl SourceChannel {
    /// Classifies a raw source cell.
    ///
    /// Matching is case-insensitive substring, first pattern group wins:
    /// social/fb/insta/whatsapp/meta, then walk, then ref, then
    /// broker/partner/cp, then leaflet. Anything else is a walk-in.
    pub fn classify(raw: &str) -> Self {
        let s = raw.trim().to_lowercase();
        if s.is_empty() {
            return SourceChannel::WalkIn;
        }
        const SOCIAL: &[&str] = &["social", "fb", "insta", "whatsapp", "meta"];
        const BROKER: &[&str] = &["broker", "partner", "cp"];
        if SOCIAL.iter().any(|p| s.contains(p)) {
            SourceChannel::SocialMedia
        } else if s.contains("walk") {
            SourceChannel::WalkIn
        } else if s.contains("ref") {
            SourceChannel::Reference
        } else if BROKER.iter().any(|p| s.contains(p)) {
            SourceChannel::Broker
        } else if s.contains("leaflet") {
            SourceChannel::Leaflet
        } else {
            SourceChannel::WalkIn
        }
    }

    /// Human-readable channel label, as rendered downstream.
    pub fn label(&self) -> &'static str {
        match self {
            SourceChannel::WalkIn => "Walk-in",
            SourceChannel::SocialMedia => "Social Media",
            SourceChannel::Broker => "Broker",
            SourceChannel::Reference => "Reference",
            SourceChannel::Leaflet => "Leaflet",
        }
    }
}

impl Default for SourceChannel {
    fn default() -> Self {
        SourceChannel::WalkIn
    }
}

// ============ Dashboard Metrics ============

/// Aggregated KPIs for one time window. Derived, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardMetrics {
    /// Leads acquired through social channels.
    pub social_media: u32,
    /// Walk-in leads.
    pub walkins: u32,
    /// Referred leads.
    pub reference: u32,
    /// Broker / channel-partner leads.
    pub broker: u32,
    /// All leads inside the window, regardless of channel.
    pub total_leads: u32,
    /// Leads with a completed site visit.
    pub site_visits: u32,
    /// Visit conversion in percent, 0 when the window is empty.
    pub ratio: f64,
    // Inventory figures reserved for a future sheet; always zeroed today.
    pub total_sold_number: u32,
    pub total_sold_value: String,
    pub total_remaining_number: u32,
    pub total_remaining_value: String,
    pub sold_number_percent: f64,
    pub sold_value_percent: f64,
}

impl DashboardMetrics {
    pub fn empty() -> Self {
        Self {
            social_media: 0,
            walkins: 0,
            reference: 0,
            broker: 0,
            total_leads: 0,
            site_visits: 0,
            ratio: 0.0,
            total_sold_number: 0,
            total_sold_value: "0 Cr".to_string(),
            total_remaining_number: 0,
            total_remaining_value: "0 Cr".to_string(),
            sold_number_percent: 0.0,
            sold_value_percent: 0.0,
        }
    }
}

/// Metrics for the four standard windows, computed together.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsBundle {
    pub today: DashboardMetrics,
    pub yesterday: DashboardMetrics,
    pub mtd: DashboardMetrics,
    pub ytd: DashboardMetrics,
}

// ============ Derived Rankings ============

/// A lead annotated with its closing-priority score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredLead {
    #[serde(flatten)]
    pub lead: Lead,
    /// rating x 20, plus 25 when the site visit is done.
    pub score: u32,
}

/// Per-representative visit/lead totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub representative: String,
    /// Completed site visits credited to this representative.
    pub visits: u32,
    /// Total leads assigned to this representative.
    pub leads: u32,
}

/// Priority list and leaderboard, derived from one snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingsBundle {
    pub priority: Vec<ScoredLead>,
    pub leaderboard: Vec<LeaderboardEntry>,
}

// ============ API Request/Response Models ============

/// One turn of assistant conversation history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// "user" or "model".
    pub role: String,
    pub text: String,
}

/// Request payload for the assistant proxy.
#[derive(Debug, Deserialize)]
pub struct AssistantRequest {
    pub message: String,
    /// Prior conversation turns, oldest first.
    #[serde(default)]
    pub history: Vec<ChatMessage>,
}

/// Response payload for the assistant proxy.
#[derive(Debug, Serialize)]
pub struct AssistantResponse {
    pub reply: String,
}

/// Query parameters for lead search.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lead_with_visit(status: &str) -> Lead {
        Lead {
            id: 1,
            date: "2025-01-01".to_string(),
            name: String::new(),
            mobile: String::new(),
            occupation: String::new(),
            unit_type: String::new(),
            budget: String::new(),
            source: SourceChannel::WalkIn,
            representative: String::new(),
            discussion: String::new(),
            rating: 0,
            visit_status: status.to_string(),
            deal_status: String::new(),
        }
    }

    #[test]
    fn visit_done_ignores_case_and_whitespace() {
        assert!(lead_with_visit("done").visit_done());
        assert!(lead_with_visit(" Done ").visit_done());
        assert!(lead_with_visit("DONE").visit_done());
        assert!(!lead_with_visit("pending").visit_done());
        assert!(!lead_with_visit("").visit_done());
    }

    #[test]
    fn classify_recognizes_channel_patterns() {
        assert_eq!(
            SourceChannel::classify("Instagram Ads"),
            SourceChannel::SocialMedia
        );
        assert_eq!(
            SourceChannel::classify("FB Campaign"),
            SourceChannel::SocialMedia
        );
        assert_eq!(SourceChannel::classify("walk-in"), SourceChannel::WalkIn);
        assert_eq!(SourceChannel::classify("Referral"), SourceChannel::Reference);
        assert_eq!(SourceChannel::classify("CP Network"), SourceChannel::Broker);
        assert_eq!(
            SourceChannel::classify("Leaflet Drop"),
            SourceChannel::Leaflet
        );
    }

    #[test]
    fn classify_defaults_unrecognized_to_walk_in() {
        assert_eq!(SourceChannel::classify(""), SourceChannel::WalkIn);
        assert_eq!(SourceChannel::classify("   "), SourceChannel::WalkIn);
        assert_eq!(SourceChannel::classify("Newspaper"), SourceChannel::WalkIn);
    }
}
