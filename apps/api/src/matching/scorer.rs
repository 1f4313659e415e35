//! Tender scoring — pure additive heuristic mapping (profile, tender) to
//! a score, human-readable reasons, and a confidence level.
//!
//! Contributions (no normalization, score is uncapped):
//! - category in profile:                         +30
//! - location in profile:                         +25
//! - budget inside range +20 / within 30% of the nearer bound +10
//! - keyword substring hits, max 2 credits:       +15 each
//! - deadline ≤7 days +15 / ≤14 days +10 (past deadline: nothing)
//! - organization previously saved from:          +10
//! - posted ≤24h +10 / ≤72h +5

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::matching::profile::MatchProfile;
use crate::models::tender::{TenderRow, STATUS_ACTIVE};

// ────────────────────────────────────────────────────────────────────────────
// Score contributions and thresholds
// ────────────────────────────────────────────────────────────────────────────

const CATEGORY_POINTS: i32 = 30;
const LOCATION_POINTS: i32 = 25;
const BUDGET_IN_RANGE_POINTS: i32 = 20;
const BUDGET_NEAR_RANGE_POINTS: i32 = 10;
const KEYWORD_POINTS: i32 = 15;
const KEYWORD_CREDIT_CAP: usize = 2;
const URGENT_DEADLINE_POINTS: i32 = 15;
const NEAR_DEADLINE_POINTS: i32 = 10;
const SAVED_ORG_POINTS: i32 = 10;
const FRESH_POSTING_POINTS: i32 = 10;
const RECENT_POSTING_POINTS: i32 = 5;

/// Matches scoring below this are dropped from the match set entirely.
pub const MIN_MATCH_SCORE: i32 = 25;

// ────────────────────────────────────────────────────────────────────────────
// Output types
// ────────────────────────────────────────────────────────────────────────────

/// Confidence bucket derived from the raw score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchLevel {
    #[serde(rename = "High Chance")]
    HighChance,
    #[serde(rename = "Good Fit")]
    GoodFit,
    #[serde(rename = "Moderate")]
    Moderate,
    #[serde(rename = "Low Fit")]
    LowFit,
}

impl MatchLevel {
    pub fn from_score(score: i32) -> Self {
        match score {
            s if s >= 80 => MatchLevel::HighChance,
            s if s >= 55 => MatchLevel::GoodFit,
            s if s >= 35 => MatchLevel::Moderate,
            _ => MatchLevel::LowFit,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MatchLevel::HighChance => "High Chance",
            MatchLevel::GoodFit => "Good Fit",
            MatchLevel::Moderate => "Moderate",
            MatchLevel::LowFit => "Low Fit",
        }
    }
}

/// One scored tender, as returned to clients and consumed by the alert
/// writer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenderMatch {
    pub tender: TenderRow,
    pub score: i32,
    pub level: MatchLevel,
    pub reasons: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Scoring
// ────────────────────────────────────────────────────────────────────────────

/// Scores a single tender against a profile. Pure: `now` is passed in so
/// deadline and recency contributions are deterministic under test.
pub fn score_tender(
    profile: &MatchProfile,
    tender: &TenderRow,
    now: DateTime<Utc>,
) -> (i32, Vec<String>) {
    let mut score = 0;
    let mut reasons = Vec::new();

    if profile.categories.contains(&tender.category.to_lowercase()) {
        score += CATEGORY_POINTS;
        reasons.push(format!("Matches your {} sector", tender.category));
    }

    if profile.locations.contains(&tender.location.to_lowercase()) {
        score += LOCATION_POINTS;
        reasons.push(format!("Located in {}", tender.location));
    }

    if let (Some((min, max)), Some(budget)) = (profile.budget_range, tender.budget_estimate) {
        if budget >= min && budget <= max {
            score += BUDGET_IN_RANGE_POINTS;
            reasons.push("Within your budget range".to_string());
        } else if near_budget_range(budget, min, max) {
            score += BUDGET_NEAR_RANGE_POINTS;
            reasons.push("Close to your budget range".to_string());
        }
    }

    let haystack = format!(
        "{} {} {}",
        tender.title, tender.description, tender.organization
    )
    .to_lowercase();
    let mut credited = 0usize;
    for keyword in &profile.keywords {
        if credited == KEYWORD_CREDIT_CAP {
            break;
        }
        if haystack.contains(keyword.as_str()) {
            score += KEYWORD_POINTS;
            credited += 1;
            reasons.push(format!("Mentions \"{keyword}\""));
        }
    }

    // A past deadline earns nothing; the status sweep will expire the row.
    if tender.deadline > now {
        let days_left = (tender.deadline - now).num_days();
        if days_left <= 7 {
            score += URGENT_DEADLINE_POINTS;
            reasons.push(format!("Closing soon: {days_left} day(s) left"));
        } else if days_left <= 14 {
            score += NEAR_DEADLINE_POINTS;
            reasons.push("Closes within two weeks".to_string());
        }
    }

    if profile
        .saved_organizations
        .contains(&tender.organization.to_lowercase())
    {
        score += SAVED_ORG_POINTS;
        reasons.push(format!(
            "You previously saved a {} tender",
            tender.organization
        ));
    }

    let age_hours = (now - tender.created_at).num_hours();
    if age_hours <= 24 {
        score += FRESH_POSTING_POINTS;
        reasons.push("Posted in the last 24 hours".to_string());
    } else if age_hours <= 72 {
        score += RECENT_POSTING_POINTS;
        reasons.push("Posted in the last 3 days".to_string());
    }

    (score, reasons)
}

/// Outside the range but within 30% of the nearer bound.
fn near_budget_range(budget: i64, min: i64, max: i64) -> bool {
    if budget < min {
        budget as f64 >= min as f64 * 0.7
    } else {
        budget as f64 <= max as f64 * 1.3
    }
}

/// Scores all eligible tenders, drops those below [`MIN_MATCH_SCORE`], and
/// sorts descending by score. The sort is stable: equal scores keep their
/// incoming order — no secondary tie-break key is defined.
pub fn rank_tenders(
    profile: &MatchProfile,
    tenders: &[TenderRow],
    now: DateTime<Utc>,
) -> Vec<TenderMatch> {
    let mut matches: Vec<TenderMatch> = tenders
        .iter()
        // tenders.status is the eligibility source of truth
        .filter(|t| t.status == STATUS_ACTIVE)
        .filter_map(|tender| {
            let (score, reasons) = score_tender(profile, tender, now);
            if score < MIN_MATCH_SCORE {
                return None;
            }
            Some(TenderMatch {
                tender: tender.clone(),
                score,
                level: MatchLevel::from_score(score),
                reasons,
            })
        })
        .collect();

    matches.sort_by(|a, b| b.score.cmp(&a.score));
    matches
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::collections::HashSet;
    use uuid::Uuid;

    fn fixed_now() -> DateTime<Utc> {
        "2025-06-02T09:00:00Z".parse().unwrap()
    }

    fn make_tender(category: &str, location: &str) -> TenderRow {
        TenderRow {
            id: Uuid::new_v4(),
            title: "Networking equipment for sub-county offices".to_string(),
            description: "Supply and installation of routers and switches".to_string(),
            organization: "Ministry of ICT".to_string(),
            category: category.to_string(),
            location: location.to_string(),
            budget_estimate: None,
            // 20 days out and 5 days old: no urgency or recency noise
            deadline: fixed_now() + Duration::days(20),
            status: STATUS_ACTIVE.to_string(),
            source_url: None,
            created_at: fixed_now() - Duration::days(5),
        }
    }

    fn profile_with_category(category: &str) -> MatchProfile {
        MatchProfile {
            categories: HashSet::from([category.to_lowercase()]),
            ..MatchProfile::default()
        }
    }

    #[test]
    fn test_category_match_contributes_exactly_30() {
        let profile = profile_with_category("ICT");
        let (score, reasons) = score_tender(&profile, &make_tender("ICT", "Mombasa"), fixed_now());
        assert_eq!(score, 30);
        assert!(reasons.iter().any(|r| r.contains("ICT")));
    }

    #[test]
    fn test_location_match_contributes_25() {
        let profile = MatchProfile {
            locations: HashSet::from(["nairobi".to_string()]),
            ..MatchProfile::default()
        };
        let (score, _) = score_tender(&profile, &make_tender("Medical", "Nairobi"), fixed_now());
        assert_eq!(score, 25);
    }

    #[test]
    fn test_budget_in_range_contributes_20() {
        let profile = MatchProfile {
            budget_range: Some((0, 5_000_000)),
            ..MatchProfile::default()
        };
        let mut tender = make_tender("Medical", "Mombasa");
        tender.budget_estimate = Some(2_000_000);
        let (score, _) = score_tender(&profile, &tender, fixed_now());
        assert_eq!(score, 20);
    }

    #[test]
    fn test_budget_within_30_percent_of_nearer_bound_contributes_10() {
        let profile = MatchProfile {
            budget_range: Some((1_000_000, 5_000_000)),
            ..MatchProfile::default()
        };

        // 30% above max: 6,500,000 = 1.3 * 5,000,000 → still +10
        let mut above = make_tender("Medical", "Mombasa");
        above.budget_estimate = Some(6_500_000);
        assert_eq!(score_tender(&profile, &above, fixed_now()).0, 10);

        // 30% below min: 700,000 = 0.7 * 1,000,000 → still +10
        let mut below = make_tender("Medical", "Mombasa");
        below.budget_estimate = Some(700_000);
        assert_eq!(score_tender(&profile, &below, fixed_now()).0, 10);

        // far outside → nothing
        let mut far = make_tender("Medical", "Mombasa");
        far.budget_estimate = Some(20_000_000);
        assert_eq!(score_tender(&profile, &far, fixed_now()).0, 0);
    }

    #[test]
    fn test_missing_budget_estimate_skips_budget_scoring() {
        let profile = MatchProfile {
            budget_range: Some((0, 5_000_000)),
            ..MatchProfile::default()
        };
        let (score, _) = score_tender(&profile, &make_tender("Medical", "Mombasa"), fixed_now());
        assert_eq!(score, 0);
    }

    #[test]
    fn test_keyword_credits_capped_at_two() {
        let profile = MatchProfile {
            keywords: vec![
                "networking".to_string(),
                "routers".to_string(),
                "switches".to_string(),
            ],
            ..MatchProfile::default()
        };
        // all three keywords appear, only two credited
        let (score, _) = score_tender(&profile, &make_tender("ICT", "Mombasa"), fixed_now());
        assert_eq!(score, 30);
    }

    #[test]
    fn test_keyword_counted_once_per_distinct_keyword() {
        let profile = MatchProfile {
            keywords: vec!["routers".to_string()],
            ..MatchProfile::default()
        };
        let mut tender = make_tender("ICT", "Mombasa");
        tender.description = "routers routers routers".to_string();
        let (score, _) = score_tender(&profile, &tender, fixed_now());
        assert_eq!(score, 15);
    }

    #[test]
    fn test_urgency_tiers() {
        let profile = MatchProfile::default();

        let mut urgent = make_tender("ICT", "Mombasa");
        urgent.deadline = fixed_now() + Duration::days(5);
        assert_eq!(score_tender(&profile, &urgent, fixed_now()).0, 15);

        let mut near = make_tender("ICT", "Mombasa");
        near.deadline = fixed_now() + Duration::days(12);
        assert_eq!(score_tender(&profile, &near, fixed_now()).0, 10);

        let mut distant = make_tender("ICT", "Mombasa");
        distant.deadline = fixed_now() + Duration::days(30);
        assert_eq!(score_tender(&profile, &distant, fixed_now()).0, 0);
    }

    #[test]
    fn test_past_deadline_gets_no_urgency_bonus() {
        let profile = MatchProfile::default();
        let mut expired = make_tender("ICT", "Mombasa");
        expired.deadline = fixed_now() - Duration::days(1);
        assert_eq!(score_tender(&profile, &expired, fixed_now()).0, 0);

        // boundary: deadline exactly now is already past
        expired.deadline = fixed_now();
        assert_eq!(score_tender(&profile, &expired, fixed_now()).0, 0);
    }

    #[test]
    fn test_saved_organization_contributes_10() {
        let profile = MatchProfile {
            saved_organizations: HashSet::from(["ministry of ict".to_string()]),
            ..MatchProfile::default()
        };
        let (score, _) = score_tender(&profile, &make_tender("Medical", "Mombasa"), fixed_now());
        assert_eq!(score, 10);
    }

    #[test]
    fn test_recency_tiers() {
        let profile = MatchProfile::default();

        let mut fresh = make_tender("ICT", "Mombasa");
        fresh.created_at = fixed_now() - Duration::hours(6);
        assert_eq!(score_tender(&profile, &fresh, fixed_now()).0, 10);

        let mut recent = make_tender("ICT", "Mombasa");
        recent.created_at = fixed_now() - Duration::hours(48);
        assert_eq!(score_tender(&profile, &recent, fixed_now()).0, 5);

        let mut old = make_tender("ICT", "Mombasa");
        old.created_at = fixed_now() - Duration::days(10);
        assert_eq!(score_tender(&profile, &old, fixed_now()).0, 0);
    }

    #[test]
    fn test_empty_profile_draws_only_urgency_and_recency_bounded_at_30() {
        let profile = MatchProfile::default();
        let mut tender = make_tender("ICT", "Nairobi");
        tender.budget_estimate = Some(1_000_000);
        tender.deadline = fixed_now() + Duration::days(3);
        tender.created_at = fixed_now() - Duration::hours(2);
        let (score, reasons) = score_tender(&profile, &tender, fixed_now());
        assert_eq!(score, 25); // 15 urgency + 10 recency, max possible
        assert!(score <= 30);
        assert_eq!(reasons.len(), 2);
    }

    #[test]
    fn test_worked_example_scores_90_high_chance() {
        // spec example: ICT / Nairobi / 2,000,000 / deadline in 5 days
        // against sectors=[ICT], counties=[Nairobi], budget 0..5,000,000
        let profile = MatchProfile {
            categories: HashSet::from(["ict".to_string()]),
            locations: HashSet::from(["nairobi".to_string()]),
            budget_range: Some((0, 5_000_000)),
            ..MatchProfile::default()
        };
        let mut tender = make_tender("ICT", "Nairobi");
        tender.budget_estimate = Some(2_000_000);
        tender.deadline = fixed_now() + Duration::days(5);

        let (score, _) = score_tender(&profile, &tender, fixed_now());
        assert_eq!(score, 90); // 30 + 25 + 20 + 15
        assert_eq!(MatchLevel::from_score(score), MatchLevel::HighChance);
    }

    #[test]
    fn test_level_thresholds() {
        assert_eq!(MatchLevel::from_score(80), MatchLevel::HighChance);
        assert_eq!(MatchLevel::from_score(79), MatchLevel::GoodFit);
        assert_eq!(MatchLevel::from_score(55), MatchLevel::GoodFit);
        assert_eq!(MatchLevel::from_score(54), MatchLevel::Moderate);
        assert_eq!(MatchLevel::from_score(35), MatchLevel::Moderate);
        assert_eq!(MatchLevel::from_score(34), MatchLevel::LowFit);
        assert_eq!(MatchLevel::from_score(0), MatchLevel::LowFit);
    }

    #[test]
    fn test_level_serializes_to_display_labels() {
        let json = serde_json::to_string(&MatchLevel::HighChance).unwrap();
        assert_eq!(json, "\"High Chance\"");
        let json = serde_json::to_string(&MatchLevel::GoodFit).unwrap();
        assert_eq!(json, "\"Good Fit\"");
    }

    #[test]
    fn test_rank_drops_scores_below_25() {
        let profile = profile_with_category("ICT");
        // location-only tender would score 0; category tender scores 30
        let tenders = vec![make_tender("ICT", "Mombasa"), make_tender("Medical", "Eldoret")];
        let matches = rank_tenders(&profile, &tenders, fixed_now());
        assert_eq!(matches.len(), 1);
        assert!(matches.iter().all(|m| m.score >= MIN_MATCH_SCORE));
    }

    #[test]
    fn test_rank_returns_non_increasing_scores() {
        let profile = MatchProfile {
            categories: HashSet::from(["ict".to_string()]),
            locations: HashSet::from(["nairobi".to_string()]),
            ..MatchProfile::default()
        };
        let tenders = vec![
            make_tender("ICT", "Mombasa"),   // 30
            make_tender("ICT", "Nairobi"),   // 55
            make_tender("Medical", "Nairobi"), // 25
        ];
        let matches = rank_tenders(&profile, &tenders, fixed_now());
        assert_eq!(matches.len(), 3);
        for pair in matches.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        assert_eq!(matches[0].score, 55);
    }

    #[test]
    fn test_rank_ignores_non_active_tenders() {
        use crate::models::tender::{STATUS_CLOSED, STATUS_EXPIRED};

        let profile = profile_with_category("ICT");
        let mut closed = make_tender("ICT", "Mombasa");
        closed.status = STATUS_CLOSED.to_string();
        let mut expired = make_tender("ICT", "Mombasa");
        expired.status = STATUS_EXPIRED.to_string();
        let matches = rank_tenders(&profile, &[closed, expired], fixed_now());
        assert!(matches.is_empty());
    }

    #[test]
    fn test_equal_scores_keep_incoming_order() {
        let profile = profile_with_category("ICT");
        let first = make_tender("ICT", "Mombasa");
        let second = make_tender("ICT", "Eldoret");
        let first_id = first.id;
        let matches = rank_tenders(&profile, &[first, second], fixed_now());
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].score, matches[1].score);
        assert_eq!(matches[0].tender.id, first_id);
    }
}
