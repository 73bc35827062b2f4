//! Integration tests for the fan hub backend.
//!
//! The team page, profile pages and the news API are served by a second local
//! axum server so the real HTTP clients are exercised end to end.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Html,
    routing::get,
    Json, Router,
};
use reqwest::Client;
use serde_json::{json, Value};
use tempfile::TempDir;

use crate::config::Config;
use crate::db::{init_database, Repository};
use crate::{create_router, AppState};

const TEAM_PAGE: &str = r#"
<html><body>
  <div class="profile-team-stat">World ranking #12</div>
  <div class="playerFlagName">FalleN</div>
  <div class="playerFlagName">KSCERATO</div>
  <a class="subTab-newsArticle" href="/news/1/win">FURIA wins</a>
  <div class="upcomingMatch">
    <div class="matchTeam team2">G2</div>
    <div class="matchTime">18:00</div>
    <div class="matchEventName">IEM Dallas</div>
    <a href="/matches/100/furia-vs-g2">details</a>
  </div>
</body></html>
"#;

const VALID_ID: &str = "529.982.247-25";

/// Counts hits on the fake team page.
#[derive(Clone, Default)]
struct Remote {
    team_hits: Arc<AtomicUsize>,
}

async fn team_page(State(remote): State<Remote>) -> Html<&'static str> {
    remote.team_hits.fetch_add(1, Ordering::SeqCst);
    Html(TEAM_PAGE)
}

async fn esports_profile() -> Html<&'static str> {
    Html("<html><body><h1>Player profile</h1><p>Valorant Champions Tour</p></body></html>")
}

async fn cooking_profile() -> Html<&'static str> {
    Html("<html><body><h1>Recipes</h1><p>Feijoada</p></body></html>")
}

/// Answers only after any sane link timeout has elapsed.
async fn slow_profile() -> Html<&'static str> {
    tokio::time::sleep(Duration::from_secs(2)).await;
    Html("<html><body><p>Valorant</p></body></html>")
}

/// The only keyword sits past the 2 MiB page cap.
async fn huge_profile() -> Html<String> {
    let filler = "lorem ipsum ".repeat(256 * 1024);
    Html(format!("<html><body><p>{}</p><p>valorant</p></body></html>", filler))
}

async fn broken() -> StatusCode {
    StatusCode::INTERNAL_SERVER_ERROR
}

/// Portuguese is empty, English has two articles, `xx` fails.
async fn news_api(Query(params): Query<HashMap<String, String>>) -> Result<Json<Value>, StatusCode> {
    assert_eq!(params.get("sortBy").map(String::as_str), Some("publishedAt"));
    match params.get("language").map(String::as_str) {
        Some("en") => Ok(Json(json!({
            "status": "ok",
            "articles": [
                { "title": "FURIA qualifies", "url": "https://news.example/1", "source": {} },
                { "title": "FURIA roster", "url": "https://news.example/2" }
            ]
        }))),
        Some("xx") => Err(StatusCode::UNAUTHORIZED),
        _ => Ok(Json(json!({ "status": "ok", "articles": [] }))),
    }
}

async fn spawn(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to get addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn spawn_remote(remote: Remote) -> SocketAddr {
    let app = Router::new()
        .route("/team", get(team_page))
        .route("/profile/esports", get(esports_profile))
        .route("/profile/cooking", get(cooking_profile))
        .route("/profile/slow", get(slow_profile))
        .route("/profile/huge", get(huge_profile))
        .route("/broken", get(broken))
        .route("/v2/everything", get(news_api))
        .with_state(remote);
    spawn(app).await
}

fn test_config(remote: SocketAddr, db_path: std::path::PathBuf) -> Config {
    Config {
        api_psk: None,
        db_path,
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        log_level: "warn".to_string(),
        org_name: "furia".to_string(),
        team_page_url: format!("http://{}/team", remote),
        site_base_url: "https://stats.example".to_string(),
        news_link_base: "https://stats.example/team#news".to_string(),
        cache_ttl: Duration::from_secs(600),
        fetch_timeout: Duration::from_secs(5),
        link_timeout: Duration::from_secs(5),
        news_api_url: format!("http://{}/v2/everything", remote),
        news_api_key: Some("test-news-key".to_string()),
        news_query: "FURIA esports".to_string(),
        news_primary_lang: "pt".to_string(),
        news_secondary_lang: "en".to_string(),
    }
}

/// Test fixture for integration tests.
struct TestFixture {
    client: Client,
    base_url: String,
    remote: Remote,
    remote_addr: SocketAddr,
    _temp_dir: TempDir,
}

impl TestFixture {
    async fn new() -> Self {
        Self::with(|_| {}).await
    }

    async fn with(tweak: impl FnOnce(&mut Config)) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.sqlite");

        let remote = Remote::default();
        let remote_addr = spawn_remote(remote.clone()).await;

        let mut config = test_config(remote_addr, db_path.clone());
        tweak(&mut config);

        let pool = init_database(&db_path).await.expect("Failed to init DB");
        let state =
            AppState::from_config(Repository::new(pool), config).expect("Failed to build state");
        let addr = spawn(create_router(state)).await;

        // Wait for servers to start
        tokio::time::sleep(Duration::from_millis(100)).await;

        TestFixture {
            client: Client::new(),
            base_url: format!("http://{}", addr),
            remote,
            remote_addr,
            _temp_dir: temp_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn remote_url(&self, path: &str) -> String {
        format!("http://{}{}", self.remote_addr, path)
    }

    fn team_hits(&self) -> usize {
        self.remote.team_hits.load(Ordering::SeqCst)
    }

    async fn get(&self, path: &str) -> (StatusCode, Value) {
        let resp = self.client.get(self.url(path)).send().await.unwrap();
        let status = StatusCode::from_u16(resp.status().as_u16()).unwrap();
        (status, resp.json().await.unwrap())
    }

    async fn post(&self, path: &str, body: Value) -> (StatusCode, Value) {
        let resp = self
            .client
            .post(self.url(path))
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = StatusCode::from_u16(resp.status().as_u16()).unwrap();
        (status, resp.json().await.unwrap())
    }

    async fn register(&self) -> i64 {
        let (status, body) = self
            .post(
                "/api/fans",
                json!({ "name": "Ana Souza", "nationalId": VALID_ID, "interests": "CS2" }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        body["data"]["id"].as_i64().unwrap()
    }
}

#[tokio::test]
async fn test_health_check() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_team_snapshot_shape() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture.get("/team-snapshot").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ranking"], "World ranking #12");
    assert_eq!(body["roster"], json!(["FalleN", "KSCERATO"]));
    assert_eq!(body["news"][0]["title"], "FURIA wins");
    assert_eq!(
        body["news"][0]["link"],
        "https://stats.example/team#news/news/1/win"
    );
    assert_eq!(body["upcomingMatches"][0]["opponent"], "G2");
    assert_eq!(body["upcomingMatches"][0]["eventName"], "IEM Dallas");
    assert_eq!(
        body["upcomingMatches"][0]["link"],
        "https://stats.example/matches/100/furia-vs-g2"
    );
}

#[tokio::test]
async fn test_team_snapshot_cached_until_invalidated() {
    let fixture = TestFixture::new().await;

    let (_, first) = fixture.get("/team-snapshot").await;
    let (_, second) = fixture.get("/team-snapshot").await;
    assert_eq!(first, second);
    assert_eq!(fixture.team_hits(), 1);

    let (status, body) = fixture.get("/cache/invalidate").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Cache cleared");
    assert_eq!(fixture.team_hits(), 1);

    fixture.get("/team-snapshot").await;
    assert_eq!(fixture.team_hits(), 2);
}

#[tokio::test]
async fn test_team_snapshot_transport_error() {
    let fixture = TestFixture::with(|config| {
        config.team_page_url = config.team_page_url.replace("/team", "/broken");
    })
    .await;

    let (status, body) = fixture.get("/team-snapshot").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "TRANSPORT_ERROR");
}

#[tokio::test]
async fn test_news_falls_back_to_secondary_language() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture.get("/news").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["language"], "en");
    assert_eq!(body["articles"].as_array().unwrap().len(), 2);
    assert_eq!(body["articles"][0]["title"], "FURIA qualifies");
    assert_eq!(body["articles"][1]["url"], "https://news.example/2");
}

#[tokio::test]
async fn test_news_no_results() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture.get("/news?primary=pt&secondary=es").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["language"].is_null());
    assert_eq!(body["articles"], json!([]));
}

#[tokio::test]
async fn test_news_primary_failure_is_not_masked() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture.get("/news?primary=xx&secondary=en").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["code"], "TRANSPORT_ERROR");
}

#[tokio::test]
async fn test_news_without_key() {
    let fixture = TestFixture::with(|config| config.news_api_key = None).await;

    let (status, body) = fixture.get("/news").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["code"], "UNAVAILABLE");
}

#[tokio::test]
async fn test_fan_registration() {
    let fixture = TestFixture::new().await;

    let id = fixture.register().await;
    let (status, body) = fixture.get(&format!("/api/fans/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["nationalId"], "52998224725");
    assert_eq!(body["data"]["interests"], "CS2");
}

#[tokio::test]
async fn test_fan_registration_rejects_invalid_id() {
    let fixture = TestFixture::new().await;

    for bad in ["111.111.111-11", "529.982.247-24", "123"] {
        let (status, body) = fixture
            .post("/api/fans", json!({ "name": "Ana", "nationalId": bad }))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", bad);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    let (status, _) = fixture
        .post("/api/fans", json!({ "name": "  ", "nationalId": VALID_ID }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_fan_registration_rejects_duplicate() {
    let fixture = TestFixture::new().await;
    fixture.register().await;

    let (status, body) = fixture
        .post(
            "/api/fans",
            json!({ "name": "Someone Else", "nationalId": "52998224725" }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "DUPLICATE");
}

#[tokio::test]
async fn test_unknown_fan() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture.get("/api/fans/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_social_profiles() {
    let fixture = TestFixture::new().await;
    let id = fixture.register().await;

    let resp = fixture
        .client
        .put(fixture.url(&format!("/api/fans/{}/social-profiles", id)))
        .json(&json!({ "instagram": "@ana", "twitter": "  ", "youtube": "UC123" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let (_, body) = fixture
        .get(&format!("/api/fans/{}/social-profiles", id))
        .await;
    assert_eq!(body["data"]["fanId"], id);
    assert_eq!(body["data"]["instagram"], "ana");
    assert!(body["data"].get("twitter").is_none());
    assert_eq!(body["data"]["youtube"], "UC123");
}

#[tokio::test]
async fn test_document_classification() {
    let fixture = TestFixture::new().await;
    let id = fixture.register().await;
    let path = format!("/api/fans/{}/documents", id);

    let (status, body) = fixture
        .post(
            &path,
            json!({ "documentPath": "uploads/rg.png", "ocrText": "NOME: ANA\nCPF 529.982.247-25" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["accepted"], true);
    assert_eq!(body["data"]["matchedKeywords"], json!(["cpf", "nome"]));
    assert_eq!(body["data"]["record"]["documentPath"], "uploads/rg.png");

    let (status, body) = fixture
        .post(
            &path,
            json!({ "documentPath": "uploads/cat.png", "ocrText": "hello world" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["accepted"], false);
    assert!(body["data"]["warning"].is_string());
    assert!(body["data"].get("record").is_none());

    let (_, body) = fixture.get(&path).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_link_validation() {
    let fixture = TestFixture::new().await;
    let id = fixture.register().await;
    let path = format!("/api/fans/{}/links", id);

    let (status, body) = fixture
        .post(&path, json!({ "url": fixture.remote_url("/profile/esports") }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["accepted"], true);
    assert_eq!(body["data"]["matchedKeywords"], json!(["valorant"]));

    let (status, body) = fixture
        .post(&path, json!({ "url": fixture.remote_url("/profile/cooking") }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["accepted"], false);

    let (status, body) = fixture
        .post(&path, json!({ "url": fixture.remote_url("/broken") }))
        .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["code"], "TRANSPORT_ERROR");

    let (status, _) = fixture.post(&path, json!({ "url": "ftp://x" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = fixture.get(&path).await;
    let links = body["data"].as_array().unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0]["url"], fixture.remote_url("/profile/esports"));
}

#[tokio::test]
async fn test_link_validation_timeout() {
    let fixture =
        TestFixture::with(|config| config.link_timeout = Duration::from_millis(200)).await;
    let id = fixture.register().await;
    let path = format!("/api/fans/{}/links", id);

    let (status, body) = fixture
        .post(&path, json!({ "url": fixture.remote_url("/profile/slow") }))
        .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "TRANSPORT_ERROR");

    let (_, body) = fixture.get(&path).await;
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_link_validation_reads_capped_body() {
    let fixture = TestFixture::new().await;
    let id = fixture.register().await;
    let path = format!("/api/fans/{}/links", id);

    let (status, body) = fixture
        .post(&path, json!({ "url": fixture.remote_url("/profile/huge") }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["accepted"], false);

    let (_, body) = fixture.get(&path).await;
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_malformed_input_uses_error_envelope() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture.get("/api/fans/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
    assert!(body["error"]["message"].is_string());

    let (status, body) = fixture.post("/api/fans", json!({ "name": 1 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");

    let resp = fixture
        .client
        .post(fixture.url("/api/fans"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_registration_api_requires_key() {
    let fixture =
        TestFixture::with(|config| config.api_psk = Some("secret-key".to_string())).await;

    let (status, body) = fixture.get("/api/fans/1").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");

    let resp = fixture
        .client
        .get(fixture.url("/api/fans/1"))
        .header("x-api-key", "wrong-key")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);

    let resp = fixture
        .client
        .get(fixture.url("/api/fans/1"))
        .header("Authorization", "Bearer secret-key")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    // Aggregation endpoints stay open
    let (status, _) = fixture.get("/team-snapshot").await;
    assert_eq!(status, StatusCode::OK);
}
