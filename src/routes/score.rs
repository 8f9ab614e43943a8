use axum::{
    Json, Router,
    extract::{Query, State},
    routing::{get, post},
};
use axum_valid::Valid;

use crate::{
    dto::score::{
        LeaderboardEntry, LeaderboardQuery, ScoreResponse, ScoreUpdateResponse, UsernameQuery,
    },
    error::AppError,
    services::score_service,
    state::SharedState,
};

/// Score counters and the leaderboard.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/api/getScore", post(get_score))
        .route("/api/updateScore", post(update_score))
        .route("/api/leaderboard", get(leaderboard))
}

#[utoipa::path(
    post,
    path = "/api/getScore",
    tag = "score",
    params(UsernameQuery),
    responses(
        (status = 200, description = "Current score", body = ScoreResponse),
        (status = 400, description = "Missing username", body = String, content_type = "text/plain"),
        (status = 404, description = "User has no score yet", body = String, content_type = "text/plain")
    )
)]
/// Return the score of the user named in the `username` query parameter.
pub async fn get_score(
    State(state): State<SharedState>,
    Query(query): Query<UsernameQuery>,
) -> Result<Json<ScoreResponse>, AppError> {
    let username = query.username();
    let score = score_service::get_score(&state, username).await?;
    Ok(Json(ScoreResponse {
        username: username.to_owned(),
        score,
    }))
}

#[utoipa::path(
    post,
    path = "/api/updateScore",
    tag = "score",
    params(UsernameQuery),
    responses(
        (status = 200, description = "Score incremented by one", body = ScoreUpdateResponse),
        (status = 400, description = "Missing username", body = String, content_type = "text/plain")
    )
)]
/// Increment the score of the user named in the `username` query parameter.
pub async fn update_score(
    State(state): State<SharedState>,
    Query(query): Query<UsernameQuery>,
) -> Result<Json<ScoreUpdateResponse>, AppError> {
    let score = score_service::increment_score(&state, query.username()).await?;
    Ok(Json(ScoreUpdateResponse {
        message: "Score updated successfully".into(),
        score,
    }))
}

#[utoipa::path(
    get,
    path = "/api/leaderboard",
    tag = "score",
    params(LeaderboardQuery),
    responses(
        (status = 200, description = "Users ranked by score", body = [LeaderboardEntry]),
        (status = 400, description = "Invalid limit", body = String, content_type = "text/plain")
    )
)]
/// Rank every user by score, highest first.
pub async fn leaderboard(
    State(state): State<SharedState>,
    Valid(Query(query)): Valid<Query<LeaderboardQuery>>,
) -> Result<Json<Vec<LeaderboardEntry>>, AppError> {
    let entries = score_service::leaderboard(&state, query.limit).await?;
    Ok(Json(entries))
}
