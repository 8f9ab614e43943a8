use std::{collections::HashMap, net::SocketAddr, sync::Arc, time::Duration};

use exploding_kittens_back::{
    config::{AppConfig, StoreBackend},
    dao::card_store::{CardStore, memory::MemoryCardStore},
    dto::score::{LeaderboardEntry, ScoreResponse},
    routes,
    state::{AppState, deck::Card},
};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tokio::net::TcpListener;

struct TestApp {
    base_url: String,
    client: Client,
    store: MemoryCardStore,
}

impl TestApp {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post(&self, path: &str) -> reqwest::Response {
        self.client.post(self.url(path)).send().await.unwrap()
    }

    async fn get(&self, path: &str) -> reqwest::Response {
        self.client.get(self.url(path)).send().await.unwrap()
    }
}

async fn start_server(deck_copies: usize) -> TestApp {
    start_server_with(AppConfig {
        deck_copies,
        ..AppConfig::default()
    })
    .await
}

async fn start_server_with(config: AppConfig) -> TestApp {
    let store = MemoryCardStore::new();
    let config = AppConfig {
        store_backend: StoreBackend::Memory,
        ..config
    };
    let state = AppState::new(Arc::new(store.clone()), config);
    let app = routes::router(state);

    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0))
        .await
        .unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("server error: {}", e);
        }
    });

    TestApp {
        base_url: format!("http://{}", addr),
        client: Client::new(),
        store,
    }
}

fn tally(tokens: &[String]) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for token in tokens {
        *counts.entry(token.clone()).or_insert(0) += 1;
    }
    counts
}

#[tokio::test]
async fn shuffle_then_draw_every_card() {
    let app = start_server(2).await;

    let res = app.post("/api/shuffleDeck").await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.text().await.unwrap().is_empty());

    let deck: Value = app.get("/api/deck").await.json().await.unwrap();
    assert_eq!(deck["remaining"], 8);

    let mut drawn = Vec::new();
    for _ in 0..8 {
        let res = app.post("/api/drawCard").await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = res.json().await.unwrap();
        let token = body["drawnCard"].as_str().unwrap().to_owned();
        assert!(token.parse::<Card>().is_ok(), "unexpected token {token}");
        drawn.push(token);
    }

    let expected: Vec<String> = Card::ALL
        .iter()
        .chain(Card::ALL.iter())
        .map(|card| card.token().to_owned())
        .collect();
    assert_eq!(tally(&drawn), tally(&expected));

    let res = app.post("/api/drawCard").await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.text().await.unwrap(), "Deck is empty");
}

#[tokio::test]
async fn draw_before_any_shuffle_reports_empty_deck() {
    let app = start_server(1).await;
    let res = app.post("/api/drawCard").await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn concurrent_draws_never_hand_out_the_same_entry_twice() {
    let app = Arc::new(start_server(4).await);
    app.post("/api/shuffleDeck").await;

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let app = app.clone();
            tokio::spawn(async move {
                let body: Value = app.post("/api/drawCard").await.json().await.unwrap();
                body["drawnCard"].as_str().unwrap().to_owned()
            })
        })
        .collect();

    let mut seen = Vec::new();
    for handle in handles {
        seen.push(handle.await.unwrap());
    }

    let mut remaining = app.store.list_range("deck").await.unwrap();
    assert_eq!(remaining.len(), 6);

    remaining.extend(seen);
    let full: Vec<String> = (0..4)
        .flat_map(|_| Card::ALL.iter().map(|card| card.token().to_owned()))
        .collect();
    assert_eq!(tally(&remaining), tally(&full));
}

#[tokio::test]
async fn scores_count_updates_per_user() {
    let app = start_server(1).await;

    for _ in 0..3 {
        let res = app.post("/api/updateScore?username=alice").await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["message"], "Score updated successfully");
    }

    let res = app.post("/api/getScore?username=alice").await;
    assert_eq!(res.status(), StatusCode::OK);
    let score: ScoreResponse = res.json().await.unwrap();
    assert_eq!(
        score,
        ScoreResponse {
            username: "alice".into(),
            score: 3
        }
    );
}

#[tokio::test]
async fn unknown_user_is_not_found() {
    let app = start_server(1).await;
    let res = app.post("/api/getScore?username=ghost").await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.text().await.unwrap(), "User not found");
}

#[tokio::test]
async fn missing_username_is_a_bad_request() {
    let app = start_server(1).await;
    for path in [
        "/api/getScore",
        "/api/getScore?username=",
        "/api/updateScore",
        "/api/updateScore?username=",
    ] {
        let res = app.post(path).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{path}");
        assert_eq!(res.text().await.unwrap(), "Username is required");
    }
}

#[tokio::test]
async fn leaderboard_ranks_real_scores() {
    let app = start_server(1).await;
    for (user, times) in [("bob", 1), ("alice", 3), ("carol", 3)] {
        for _ in 0..times {
            app.post(&format!("/api/updateScore?username={user}")).await;
        }
    }

    let res = app.get("/api/leaderboard").await;
    assert_eq!(res.status(), StatusCode::OK);
    let board: Vec<LeaderboardEntry> = res.json().await.unwrap();
    let order: Vec<(&str, i64)> = board
        .iter()
        .map(|entry| (entry.username.as_str(), entry.score))
        .collect();
    assert_eq!(order, vec![("alice", 3), ("carol", 3), ("bob", 1)]);

    let top: Vec<LeaderboardEntry> = app
        .get("/api/leaderboard?limit=1")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].username, "alice");
}

#[tokio::test]
async fn leaderboard_rejects_out_of_range_limits() {
    let app = start_server(1).await;
    assert_eq!(
        app.get("/api/leaderboard?limit=0").await.status(),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        app.get("/api/leaderboard?limit=500").await.status(),
        StatusCode::BAD_REQUEST
    );
}

#[tokio::test]
async fn defuse_bomb_always_succeeds() {
    let app = start_server(1).await;
    let res = app.post("/api/defuseBomb").await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Bomb defused successfully!");
}

#[tokio::test]
async fn store_outage_turns_into_server_errors() {
    let app = start_server(1).await;
    app.store.set_offline(true);

    assert_eq!(
        app.post("/api/shuffleDeck").await.status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
    assert_eq!(
        app.post("/api/updateScore?username=alice").await.status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
    assert_eq!(
        app.post("/api/getScore?username=alice").await.status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
    assert_eq!(
        app.get("/api/leaderboard").await.status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
    assert_eq!(
        app.get("/api/deck").await.status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );

    let health: Value = app.get("/healthcheck").await.json().await.unwrap();
    assert_eq!(health["status"], "degraded");
    assert_eq!(health["store"], "memory");

    app.store.set_offline(false);
    let health: Value = app.get("/healthcheck").await.json().await.unwrap();
    assert_eq!(health["status"], "ok");
}

#[tokio::test]
async fn slow_store_replies_time_out() {
    let app = start_server_with(AppConfig {
        store_timeout: Duration::from_millis(50),
        ..AppConfig::default()
    })
    .await;
    app.store.set_latency(Duration::from_millis(500));

    for res in [
        app.post("/api/drawCard").await,
        app.post("/api/getScore?username=alice").await,
        app.get("/api/leaderboard").await,
    ] {
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(res.text().await.unwrap(), "operation timed out");
    }

    let health: Value = app.get("/healthcheck").await.json().await.unwrap();
    assert_eq!(health["status"], "degraded");

    app.store.set_latency(Duration::ZERO);
    let health: Value = app.get("/healthcheck").await.json().await.unwrap();
    assert_eq!(health["status"], "ok");
}

#[tokio::test]
async fn whitespace_username_is_a_valid_counter() {
    let app = start_server(1).await;
    let res = app.post("/api/updateScore?username=%20%20").await;
    assert_eq!(res.status(), StatusCode::OK);

    let score: ScoreResponse = app
        .post("/api/getScore?username=%20%20")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(score.username, "  ");
    assert_eq!(score.score, 1);
}

#[tokio::test]
async fn wrong_method_is_rejected() {
    let app = start_server(1).await;
    assert_eq!(
        app.get("/api/drawCard").await.status(),
        StatusCode::METHOD_NOT_ALLOWED
    );
}

#[tokio::test]
async fn openapi_document_lists_the_game_routes() {
    let app = start_server(1).await;
    let doc: Value = app.get("/api-doc/openapi.json").await.json().await.unwrap();
    for path in [
        "/api/drawCard",
        "/api/shuffleDeck",
        "/api/defuseBomb",
        "/api/leaderboard",
        "/api/getScore",
        "/api/updateScore",
    ] {
        assert!(doc["paths"].get(path).is_some(), "missing {path}");
    }
}
