use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Exploding Kittens Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::deck::draw_card,
        crate::routes::deck::shuffle_deck,
        crate::routes::deck::get_deck,
        crate::routes::deck::defuse_bomb,
        crate::routes::score::get_score,
        crate::routes::score::update_score,
        crate::routes::score::leaderboard,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::deck::DrawCardResponse,
            crate::dto::deck::DeckCard,
            crate::dto::deck::DeckResponse,
            crate::dto::deck::MessageResponse,
            crate::dto::score::ScoreResponse,
            crate::dto::score::ScoreUpdateResponse,
            crate::dto::score::LeaderboardEntry,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "deck", description = "Shared deck operations"),
        (name = "score", description = "Player scores and leaderboard"),
    )
)]
pub struct ApiDoc;
