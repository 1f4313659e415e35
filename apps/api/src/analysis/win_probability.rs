//! Win-probability engine — plain arithmetic over historical awards in the
//! tender's category.
//!
//! Awarded amounts are inflation-adjusted year by year, then the estimate
//! is a weighted sum of three factors in [0, 1]:
//! - competition: 1 / average bid count
//! - winner-type share: fraction of awards won by the caller's business type
//! - budget fit: how close the intended bid sits to the adjusted mean
//!
//! With no history at all the engine answers anyway, from a static
//! per-category table marked `source: "heuristic"`. It never errors.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::award::HistoricalAwardRow;
use crate::models::tender::TenderRow;

/// Fixed annual inflation rate applied to KES award amounts.
const ANNUAL_INFLATION: f64 = 0.06;

const WEIGHT_COMPETITION: f64 = 0.35;
const WEIGHT_WINNER_TYPE: f64 = 0.35;
const WEIGHT_BUDGET_FIT: f64 = 0.30;

const MIN_PROBABILITY: f64 = 0.05;
const MAX_PROBABILITY: f64 = 0.95;

/// Neutral factor value when the caller gave us nothing to compare.
const NEUTRAL_FACTOR: f64 = 0.5;

pub const SOURCE_HISTORICAL: &str = "historical";
pub const SOURCE_HEURISTIC: &str = "heuristic";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompetitionLevel {
    Low,
    Moderate,
    High,
}

impl CompetitionLevel {
    fn from_avg_bids(avg: f64) -> Self {
        if avg < 4.0 {
            CompetitionLevel::Low
        } else if avg <= 8.0 {
            CompetitionLevel::Moderate
        } else {
            CompetitionLevel::High
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BidRange {
    pub low: i64,
    pub high: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WinProbability {
    pub probability: f64,
    pub competition_level: CompetitionLevel,
    pub avg_bid_count: f64,
    pub sample_size: usize,
    pub same_organization_awards: usize,
    pub same_county_awards: usize,
    pub suggested_bid_range: Option<BidRange>,
    pub source: String,
}

/// Estimates the caller's chance of winning `tender`. `awards` must
/// already be filtered to the tender's category; organization and county
/// overlap is only counted, not required.
pub fn estimate_win_probability(
    awards: &[HistoricalAwardRow],
    tender: &TenderRow,
    business_type: Option<&str>,
    intended_bid: Option<i64>,
    today: NaiveDate,
) -> WinProbability {
    if awards.is_empty() {
        return heuristic_estimate(tender);
    }

    let adjusted: Vec<f64> = awards
        .iter()
        .map(|a| inflation_adjusted(a.awarded_amount, a.award_date, today))
        .collect();
    let mean = adjusted.iter().sum::<f64>() / adjusted.len() as f64;
    let variance = adjusted.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / adjusted.len() as f64;
    let sigma = variance.sqrt();

    let avg_bids = (awards.iter().map(|a| a.bid_count as f64).sum::<f64>()
        / awards.len() as f64)
        .max(1.0);

    let competition_factor = (1.0 / avg_bids).min(1.0);
    let winner_type_factor = winner_type_share(awards, business_type);
    let budget_fit_factor = budget_fit(intended_bid, mean, sigma);

    let raw = WEIGHT_COMPETITION * competition_factor
        + WEIGHT_WINNER_TYPE * winner_type_factor
        + WEIGHT_BUDGET_FIT * budget_fit_factor;
    let probability = round2(raw.clamp(MIN_PROBABILITY, MAX_PROBABILITY));

    let org = tender.organization.to_lowercase();
    let county = tender.location.to_lowercase();

    WinProbability {
        probability,
        competition_level: CompetitionLevel::from_avg_bids(avg_bids),
        avg_bid_count: round2(avg_bids),
        sample_size: awards.len(),
        same_organization_awards: awards
            .iter()
            .filter(|a| a.organization.to_lowercase() == org)
            .count(),
        same_county_awards: awards
            .iter()
            .filter(|a| a.location.to_lowercase() == county)
            .count(),
        suggested_bid_range: Some(suggested_range(mean, sigma)),
        source: SOURCE_HISTORICAL.to_string(),
    }
}

/// Walks the amount forward one inflation multiplier per elapsed calendar
/// year. An award from the current year is returned as-is.
fn inflation_adjusted(amount: i64, award_date: NaiveDate, today: NaiveDate) -> f64 {
    let mut adjusted = amount as f64;
    let mut year = award_date.year();
    while year < today.year() {
        adjusted *= 1.0 + ANNUAL_INFLATION;
        year += 1;
    }
    adjusted
}

/// Fraction of awards won by the caller's business type. Neutral when the
/// caller did not state one.
fn winner_type_share(awards: &[HistoricalAwardRow], business_type: Option<&str>) -> f64 {
    let Some(bt) = business_type else {
        return NEUTRAL_FACTOR;
    };
    let bt = bt.to_lowercase();
    let won = awards
        .iter()
        .filter(|a| a.winner_type.to_lowercase() == bt)
        .count();
    won as f64 / awards.len() as f64
}

/// 1.0 inside the mean ± σ band, falling off linearly with the distance
/// beyond it, relative to the mean. Neutral without an intended bid.
fn budget_fit(intended_bid: Option<i64>, mean: f64, sigma: f64) -> f64 {
    let Some(bid) = intended_bid else {
        return NEUTRAL_FACTOR;
    };
    if mean <= 0.0 {
        return NEUTRAL_FACTOR;
    }
    let excess = ((bid as f64 - mean).abs() - sigma).max(0.0);
    (1.0 - excess / mean).clamp(0.0, 1.0)
}

fn suggested_range(mean: f64, sigma: f64) -> BidRange {
    let half_band = if sigma == 0.0 { mean * 0.10 } else { sigma * 0.5 };
    BidRange {
        low: ((mean - half_band).max(0.0)).round() as i64,
        high: (mean + half_band).round() as i64,
    }
}

/// Static per-category defaults when the category has no award history.
fn heuristic_estimate(tender: &TenderRow) -> WinProbability {
    let (probability, competition_level) = match tender.category.to_lowercase().as_str() {
        "consultancy" => (0.35, CompetitionLevel::Moderate),
        "ict" => (0.30, CompetitionLevel::Moderate),
        "medical" => (0.30, CompetitionLevel::Moderate),
        "construction" => (0.25, CompetitionLevel::High),
        "supplies" => (0.20, CompetitionLevel::High),
        _ => (0.25, CompetitionLevel::Moderate),
    };

    WinProbability {
        probability,
        competition_level,
        avg_bid_count: 0.0,
        sample_size: 0,
        same_organization_awards: 0,
        same_county_awards: 0,
        suggested_bid_range: tender.budget_estimate.map(|b| BidRange {
            low: (b as f64 * 0.9).round() as i64,
            high: (b as f64 * 1.1).round() as i64,
        }),
        source: SOURCE_HEURISTIC.to_string(),
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
