//! Match profile — the scoring input for one user.
//!
//! Explicit preferences are unioned with signals inferred from the user's
//! saved tenders: their categories, locations, significant title words,
//! and publishing organizations. Absent preference data is not an error;
//! contributions derived from it are simply skipped by the scorer.

use std::collections::HashSet;

use crate::models::profile::UserPreferencesRow;
use crate::models::tender::TenderRow;

/// Title words shorter than this carry no signal.
const MIN_KEYWORD_LEN: usize = 5;

/// Procurement boilerplate that appears in nearly every tender title.
const TITLE_STOPWORDS: &[&str] = &[
    "supply", "delivery", "provision", "proposed", "tender", "tenders", "request", "quotation",
    "services", "service", "works", "county", "government", "kenya", "national", "various",
];

/// Everything the scorer needs to know about a user, lowercased once here
/// so the scorer never re-normalizes.
#[derive(Debug, Clone, Default)]
pub struct MatchProfile {
    pub categories: HashSet<String>,
    pub locations: HashSet<String>,
    pub keywords: Vec<String>,
    /// (min, max) in whole KES; None when the user set no usable range.
    pub budget_range: Option<(i64, i64)>,
    /// Organizations the user previously saved a tender from.
    pub saved_organizations: HashSet<String>,
}

/// Builds the match profile from explicit preferences (may be absent) and
/// the user's saved tenders (may be empty).
pub fn build_profile(
    preferences: Option<&UserPreferencesRow>,
    saved: &[TenderRow],
) -> MatchProfile {
    let mut profile = MatchProfile::default();

    if let Some(prefs) = preferences {
        profile
            .categories
            .extend(prefs.sectors.iter().map(|s| s.to_lowercase()));
        profile
            .locations
            .extend(prefs.counties.iter().map(|c| c.to_lowercase()));
        for kw in &prefs.keywords {
            push_keyword(&mut profile.keywords, kw);
        }
        if prefs.budget_max > 0 {
            profile.budget_range = Some((prefs.budget_min.max(0), prefs.budget_max));
        }
    }

    for tender in saved {
        profile.categories.insert(tender.category.to_lowercase());
        profile.locations.insert(tender.location.to_lowercase());
        profile
            .saved_organizations
            .insert(tender.organization.to_lowercase());
        for word in title_keywords(&tender.title) {
            push_keyword(&mut profile.keywords, &word);
        }
    }

    profile
}

/// Extracts significant words from a saved tender title.
fn title_keywords(title: &str) -> Vec<String> {
    title
        .split_whitespace()
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .filter(|w| w.len() >= MIN_KEYWORD_LEN && !TITLE_STOPWORDS.contains(&w.as_str()))
        .collect()
}

/// Appends a keyword once, lowercased. Keywords are matched at most twice
/// by the scorer, so order preserves the explicit-preferences-first bias.
fn push_keyword(keywords: &mut Vec<String>, kw: &str) {
    let kw = kw.trim().to_lowercase();
    if !kw.is_empty() && !keywords.contains(&kw) {
        keywords.push(kw);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn make_tender(title: &str, organization: &str, category: &str, location: &str) -> TenderRow {
        TenderRow {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: String::new(),
            organization: organization.to_string(),
            category: category.to_string(),
            location: location.to_string(),
            budget_estimate: None,
            deadline: Utc::now(),
            status: "active".to_string(),
            source_url: None,
            created_at: Utc::now(),
        }
    }

    fn make_prefs(sectors: &[&str], counties: &[&str], keywords: &[&str]) -> UserPreferencesRow {
        UserPreferencesRow {
            user_id: Uuid::new_v4(),
            sectors: sectors.iter().map(|s| s.to_string()).collect(),
            counties: counties.iter().map(|s| s.to_string()).collect(),
            budget_min: 0,
            budget_max: 0,
            keywords: keywords.iter().map(|s| s.to_string()).collect(),
            eligibility_types: vec![],
            email_alerts: true,
            push_alerts: false,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_inputs_give_empty_profile() {
        let profile = build_profile(None, &[]);
        assert!(profile.categories.is_empty());
        assert!(profile.locations.is_empty());
        assert!(profile.keywords.is_empty());
        assert!(profile.budget_range.is_none());
        assert!(profile.saved_organizations.is_empty());
    }

    #[test]
    fn test_explicit_preferences_are_lowercased() {
        let prefs = make_prefs(&["ICT"], &["Nairobi"], &["Fibre"]);
        let profile = build_profile(Some(&prefs), &[]);
        assert!(profile.categories.contains("ict"));
        assert!(profile.locations.contains("nairobi"));
        assert_eq!(profile.keywords, vec!["fibre"]);
    }

    #[test]
    fn test_saved_tenders_union_into_profile() {
        let prefs = make_prefs(&["ICT"], &[], &[]);
        let saved = vec![make_tender(
            "Construction of classrooms",
            "Ministry of Education",
            "Construction",
            "Kisumu",
        )];
        let profile = build_profile(Some(&prefs), &saved);
        assert!(profile.categories.contains("ict"));
        assert!(profile.categories.contains("construction"));
        assert!(profile.locations.contains("kisumu"));
        assert!(profile.saved_organizations.contains("ministry of education"));
    }

    #[test]
    fn test_title_keywords_skip_stopwords_and_short_words() {
        let words = title_keywords("Supply of ICT fibre optic cabling services");
        assert!(words.contains(&"fibre".to_string()));
        assert!(words.contains(&"cabling".to_string()));
        assert!(!words.contains(&"supply".to_string()), "stopword kept");
        assert!(!words.contains(&"of".to_string()), "short word kept");
        assert!(!words.contains(&"ict".to_string()), "short word kept");
    }

    #[test]
    fn test_budget_range_requires_positive_max() {
        let mut prefs = make_prefs(&[], &[], &[]);
        assert!(build_profile(Some(&prefs), &[]).budget_range.is_none());

        prefs.budget_min = 100_000;
        prefs.budget_max = 5_000_000;
        assert_eq!(
            build_profile(Some(&prefs), &[]).budget_range,
            Some((100_000, 5_000_000))
        );
    }

    #[test]
    fn test_keywords_deduplicated_preserving_order() {
        let prefs = make_prefs(&[], &[], &["fibre", "solar"]);
        let saved = vec![make_tender(
            "Solar fibre installation",
            "KPLC",
            "Energy",
            "Nakuru",
        )];
        let profile = build_profile(Some(&prefs), &saved);
        // explicit keywords first, inferred "installation" appended once
        assert_eq!(profile.keywords[0], "fibre");
        assert_eq!(profile.keywords[1], "solar");
        assert!(profile.keywords.contains(&"installation".to_string()));
        assert_eq!(
            profile.keywords.iter().filter(|k| *k == "solar").count(),
            1
        );
    }
}
