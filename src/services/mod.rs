/// Shared deck reset and draw operations.
pub mod deck_service;
/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Per-user score counters and the leaderboard.
pub mod score_service;
