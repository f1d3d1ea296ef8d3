//! GameHub data model.
//!
//! Plain records deserialized from the envelope's `data` field. Fields the
//! server leaves out take their default value; nullable ones are `Option`s.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A GameHub user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub id: i64,
    pub telegram_id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_pic_url: Option<String>,
    pub global_coins: i64,
    pub total_games_played: i64,
    pub average_score: f64,
    pub referral_code: String,
    pub referred_by: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet_address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A registered game.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Game {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub status: String,
    pub icon_url: String,
    pub banner_url: String,
    pub min_version: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A user's stats for one game.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserGameStats {
    pub game_id: String,
    pub game_name: String,
    pub total_score: i64,
    pub games_played: i64,
    pub best_score: i64,
    pub last_played: DateTime<Utc>,
}

/// A coin transaction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_id: Option<String>,
    pub amount: i64,
    pub transaction_type: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A leaderboard row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingEntry {
    pub user_id: i64,
    pub username: String,
    pub display_name: String,
    pub score: i64,
    pub games_played: i64,
    pub rank: i64,
}

/// A user's position in the global ranking.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserRanking {
    pub user_id: i64,
    pub global_rank: i64,
    pub total_score: i64,
    pub games_played: i64,
    pub average_score: f64,
}

/// A referral between two users.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Referral {
    pub id: i64,
    pub referrer_id: i64,
    pub referred_id: i64,
    pub referred_user: String,
    pub reward_amount: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Aggregate referral counts for a user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferralStats {
    pub total_referrals: i64,
    pub completed_referrals: i64,
    pub total_rewards: i64,
    pub pending_rewards: i64,
}

/// A user's coin balance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoinBalance {
    pub balance: i64,
}

/// Body of the coin deduct and add endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoinMutation<'a> {
    pub user_id: i64,
    pub amount: i64,
    pub game_id: &'a str,
    pub reason: &'a str,
    pub reference_id: &'a str,
}

/// Body of the score report endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreReport<'a> {
    pub user_id: i64,
    pub game_id: &'a str,
    pub score: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_optional_fields() {
        let json = r#"{
            "id": 1,
            "telegram_id": 555,
            "username": "ana",
            "first_name": "Ana",
            "last_name": "Lee",
            "display_name": "Ana L.",
            "global_coins": 120,
            "total_games_played": 9,
            "average_score": 310.5,
            "referral_code": "ANA1",
            "referred_by": null,
            "created_at": "2024-01-02T03:04:05Z",
            "updated_at": "2024-02-02T03:04:05Z"
        }"#;

        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.username, "ana");
        assert_eq!(user.referred_by, None);
        assert_eq!(user.profile_pic_url, None);
        assert_eq!(user.created_at.to_rfc3339(), "2024-01-02T03:04:05+00:00");
    }

    #[test]
    fn test_coin_mutation_body() {
        let body = CoinMutation {
            user_id: 42,
            amount: 100,
            game_id: "snake",
            reason: "entry fee",
            reference_id: "match-1",
        };

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({
                "user_id": 42,
                "amount": 100,
                "game_id": "snake",
                "reason": "entry fee",
                "reference_id": "match-1"
            })
        );
    }

    #[test]
    fn test_absent_fields_take_defaults() {
        let game: Game = serde_json::from_str(r#"{"id": "snake", "name": "Snake"}"#).unwrap();
        assert_eq!(game.id, "snake");
        assert_eq!(game.description, "");
        assert_eq!(game.created_at, DateTime::<Utc>::default());

        let entry: RankingEntry =
            serde_json::from_str(r#"{"user_id": 4, "score": 90, "rank": 1}"#).unwrap();
        assert_eq!(entry.games_played, 0);
        assert_eq!(entry.username, "");
        assert_eq!(entry.score, 90);
    }

    #[test]
    fn test_referral_completed_at() {
        let json = r#"{
            "id": 3, "referrer_id": 1, "referred_id": 2, "referred_user": "bo",
            "reward_amount": 50, "status": "pending",
            "created_at": "2024-01-01T00:00:00Z", "completed_at": null
        }"#;

        let referral: Referral = serde_json::from_str(json).unwrap();
        assert!(referral.completed_at.is_none());
    }
}
