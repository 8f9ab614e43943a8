use std::cmp::Ordering;

use tracing::{info, warn};

use crate::{
    dao::card_store::{SCORE_KEY_PREFIX, score_key},
    dto::{score::LeaderboardEntry, validation::validate_username},
    error::ServiceError,
    state::SharedState,
};

/// Leaderboard size used when the caller does not ask for one.
pub const DEFAULT_LEADERBOARD_LIMIT: usize = 10;

/// Read the score counter of `username`.
pub async fn get_score(state: &SharedState, username: &str) -> Result<i64, ServiceError> {
    validate_username(username)?;

    let key = score_key(username);
    let Some(raw) = state.run_store_op(state.store().get(&key)).await? else {
        return Err(ServiceError::NotFound("User not found".into()));
    };

    raw.trim().parse::<i64>().map_err(|err| {
        ServiceError::Serialization(format!("score `{key}` is not an integer: {err}"))
    })
}

/// Atomically add one to the score of `username`, creating the counter at 1.
/// Returns the updated value.
pub async fn increment_score(state: &SharedState, username: &str) -> Result<i64, ServiceError> {
    validate_username(username)?;

    let score = state
        .run_store_op(state.store().increment(&score_key(username)))
        .await?;
    info!(username, score, "score updated");
    Ok(score)
}

/// Every user ranked by score, highest first, ties ordered by username.
pub async fn leaderboard(
    state: &SharedState,
    limit: Option<usize>,
) -> Result<Vec<LeaderboardEntry>, ServiceError> {
    let entries = state
        .run_store_op(state.store().scan_prefix(SCORE_KEY_PREFIX))
        .await?;

    let scores = entries
        .into_iter()
        .filter_map(|(key, raw)| {
            let username = key.strip_prefix(SCORE_KEY_PREFIX)?.to_owned();
            match raw.trim().parse::<i64>() {
                Ok(score) => Some(LeaderboardEntry { username, score }),
                Err(err) => {
                    warn!(%key, error = %err, "skipping non-integer score");
                    None
                }
            }
        })
        .collect();

    Ok(rank(scores, limit.unwrap_or(DEFAULT_LEADERBOARD_LIMIT)))
}

fn rank(mut entries: Vec<LeaderboardEntry>, limit: usize) -> Vec<LeaderboardEntry> {
    entries.sort_by(|a, b| match b.score.cmp(&a.score) {
        Ordering::Equal => a.username.cmp(&b.username),
        other => other,
    });
    entries.truncate(limit);
    entries
}
