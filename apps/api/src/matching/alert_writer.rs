//! Turns a ranked match list into `new_matches` alert rows.
//!
//! Only strong matches become alerts, and a tender never alerts the same
//! user twice: existing alerts are checked by the `tender_id` stashed in
//! the alert's JSON payload before inserting.

use serde_json::json;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::scorer::TenderMatch;
use crate::models::alert::ALERT_NEW_MATCHES;

/// Matches below this score are not worth an alert.
const ALERT_SCORE_FLOOR: i32 = 40;

/// At most this many alerts per user per run.
const MAX_ALERTS_PER_RUN: usize = 10;

/// Picks the alert-worthy slice of an already-ranked match list.
pub fn alert_candidates(matches: &[TenderMatch]) -> Vec<&TenderMatch> {
    matches
        .iter()
        .filter(|m| m.score >= ALERT_SCORE_FLOOR)
        .take(MAX_ALERTS_PER_RUN)
        .collect()
}

fn alert_payload(m: &TenderMatch) -> serde_json::Value {
    json!({
        "tender_id": m.tender.id,
        "score": m.score,
        "level": m.level,
        "deadline": m.tender.deadline,
        "reasons": m.reasons,
    })
}

/// Writes alerts for the top matches, skipping tenders already alerted.
/// Returns the number of rows inserted.
///
/// The existence check and the insert are separate statements. A
/// concurrent run could slip a duplicate in between; runs are sequenced
/// by the batch runner, so the window is accepted rather than locked.
pub async fn write_match_alerts(
    db: &PgPool,
    user_id: Uuid,
    matches: &[TenderMatch],
) -> Result<u64, AppError> {
    let mut inserted = 0u64;

    for m in alert_candidates(matches) {
        let already_alerted: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM user_alerts
                WHERE user_id = $1
                  AND alert_type = $2
                  AND data->>'tender_id' = $3
            )
            "#,
        )
        .bind(user_id)
        .bind(ALERT_NEW_MATCHES)
        .bind(m.tender.id.to_string())
        .fetch_one(db)
        .await?;

        if already_alerted {
            continue;
        }

        sqlx::query(
            r#"
            INSERT INTO user_alerts (user_id, alert_type, title, message, data)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(user_id)
        .bind(ALERT_NEW_MATCHES)
        .bind(format!("New tender match: {}", m.level.label()))
        .bind(format!(
            "{} from {} matches your profile (score {})",
            m.tender.title, m.tender.organization, m.score
        ))
        .bind(alert_payload(m))
        .execute(db)
        .await?;

        inserted += 1;
    }

    if inserted > 0 {
        info!(%user_id, inserted, "wrote match alerts");
    }

    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::scorer::MatchLevel;
    use crate::models::tender::{TenderRow, STATUS_ACTIVE};
    use chrono::{Duration, Utc};

    fn make_match(score: i32) -> TenderMatch {
        let now = Utc::now();
        TenderMatch {
            tender: TenderRow {
                id: Uuid::new_v4(),
                title: "Office fit-out".to_string(),
                description: "Partitioning and furniture".to_string(),
                organization: "State Department of Housing".to_string(),
                category: "Construction".to_string(),
                location: "Nakuru".to_string(),
                budget_estimate: Some(3_000_000),
                deadline: now + Duration::days(10),
                status: STATUS_ACTIVE.to_string(),
                source_url: None,
                created_at: now,
            },
            score,
            level: MatchLevel::from_score(score),
            reasons: vec!["Matches your Construction sector".to_string()],
        }
    }

    #[test]
    fn test_candidates_drop_scores_below_40() {
        let matches = vec![make_match(85), make_match(40), make_match(39), make_match(25)];
        let candidates = alert_candidates(&matches);
        assert_eq!(candidates.len(), 2);
        assert!(candidates.iter().all(|m| m.score >= 40));
    }

    #[test]
    fn test_candidates_capped_at_ten() {
        let matches: Vec<TenderMatch> = (0..15).map(|_| make_match(60)).collect();
        assert_eq!(alert_candidates(&matches).len(), 10);
    }

    #[test]
    fn test_candidates_preserve_ranked_order() {
        let matches = vec![make_match(90), make_match(70), make_match(50)];
        let candidates = alert_candidates(&matches);
        let scores: Vec<i32> = candidates.iter().map(|m| m.score).collect();
        assert_eq!(scores, vec![90, 70, 50]);
    }

    #[test]
    fn test_payload_carries_tender_id_and_score() {
        let m = make_match(72);
        let payload = alert_payload(&m);
        assert_eq!(
            payload["tender_id"].as_str().unwrap(),
            m.tender.id.to_string()
        );
        assert_eq!(payload["score"].as_i64().unwrap(), 72);
        assert_eq!(payload["level"].as_str().unwrap(), "Good Fit");
        assert!(payload["reasons"].is_array());
    }
}
