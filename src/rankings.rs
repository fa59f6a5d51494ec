//! Closing-priority scoring and the representative leaderboard.

use crate::models::{Lead, LeaderboardEntry, RankingsBundle, ScoredLead};

/// Leads retained on the priority list.
const PRIORITY_LIST_SIZE: usize = 10;
/// Representatives retained on the leaderboard.
const LEADERBOARD_SIZE: usize = 4;
/// Group label for leads without a representative.
const UNASSIGNED: &str = "Unassigned";

/// Closing-priority score: rating weighs 20 per star, a completed site
/// visit adds 25.
pub fn priority_score(lead: &Lead) -> u32 {
    u32::from(lead.rating) * 20 + if lead.visit_done() { 25 } else { 0 }
}

/// Top prospects by closing-priority score, descending.
pub fn priority_list(leads: &[Lead]) -> Vec<ScoredLead> {
    let mut scored: Vec<ScoredLead> = leads
        .iter()
        .map(|lead| ScoredLead {
            lead: lead.clone(),
            score: priority_score(lead),
        })
        .collect();

    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored.truncate(PRIORITY_LIST_SIZE);
    scored
}

/// Per-representative visit and lead counts, ordered by completed visits
/// descending. Ties keep group-creation order (first appearance in the
/// snapshot); the top entries are retained.
pub fn leaderboard(leads: &[Lead]) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> = Vec::new();

    for lead in leads {
        let name = if lead.representative.trim().is_empty() {
            UNASSIGNED
        } else {
            lead.representative.as_str()
        };

        let idx = match entries.iter().position(|e| e.representative == name) {
            Some(idx) => idx,
            None => {
                entries.push(LeaderboardEntry {
                    representative: name.to_string(),
                    visits: 0,
                    leads: 0,
                });
                entries.len() - 1
            }
        };

        let entry = &mut entries[idx];
        entry.leads += 1;
        if lead.visit_done() {
            entry.visits += 1;
        }
    }

    // Stable sort keeps insertion order for equal visit counts
    entries.sort_by(|a, b| b.visits.cmp(&a.visits));
    entries.truncate(LEADERBOARD_SIZE);
    entries
}

/// Both rankings, derived together from one snapshot.
pub fn compute_rankings(leads: &[Lead]) -> RankingsBundle {
    RankingsBundle {
        priority: priority_list(leads),
        leaderboard: leaderboard(leads),
    }
}
