//! DTO definitions for the score and leaderboard endpoints.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Query string carrying the user a score operation targets.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UsernameQuery {
    /// Name of the player.
    pub username: Option<String>,
}

impl UsernameQuery {
    /// The supplied username, or an empty string when the parameter is absent.
    pub fn username(&self) -> &str {
        self.username.as_deref().unwrap_or_default()
    }
}

/// Current score of a single user.
#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct ScoreResponse {
    pub username: String,
    pub score: i64,
}

/// Confirmation returned once a score was incremented.
#[derive(Debug, Serialize, ToSchema)]
pub struct ScoreUpdateResponse {
    pub message: String,
    /// Value of the counter after the increment.
    pub score: i64,
}

/// Optional paging of the leaderboard.
#[derive(Debug, Default, Deserialize, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct LeaderboardQuery {
    /// Maximum number of entries to return (1 to 100, default 10).
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<usize>,
}

/// One ranked row of the leaderboard.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub username: String,
    pub score: i64,
}
