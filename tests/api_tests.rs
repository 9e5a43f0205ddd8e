// tests/api_tests.rs

use std::fs;
use std::path::{Path, PathBuf};

use team_hub::{config::Config, routes, state::AppState};

/// Writes a small dashboard tree into a fresh temp directory.
fn seed_fixture() -> PathBuf {
    let root = std::env::temp_dir().join(format!("team-hub-api-{}", uuid::Uuid::new_v4()));

    let daily = root.join("team-tracking/alice/hub/daily");
    fs::create_dir_all(&daily).unwrap();
    fs::write(
        daily.join("2026-01-19.md"),
        "# Monday\n\n- shipped [docs](https://example.com/docs)\n\
         - <span onclick=\"steal()\">clicked</span>\n\n\
         <script>alert('xss')</script>\n\n\
         [bad link](javascript:alert(1))\n",
    )
    .unwrap();
    fs::write(daily.join("2026-01-18.md"), "Quiet day.\n").unwrap();
    fs::write(daily.join("scratch.md"), "not a dated log\n").unwrap();

    fs::create_dir_all(root.join("config")).unwrap();
    fs::write(
        root.join("config/projects.json"),
        serde_json::json!({
            "projects": [
                {"key": "alice__hub", "display_name": "Gene Hub", "member": "Alice", "owner": "alice", "repo": "hub"},
                {"key": "bob__TBD", "member": "Bob", "owner": "bob", "repo": "TBD"}
            ]
        })
        .to_string(),
    )
    .unwrap();

    let data = root.join("data");
    fs::create_dir_all(data.join("alice__hub")).unwrap();
    fs::create_dir_all(data.join("bob__engine")).unwrap();
    fs::create_dir_all(data.join("broken__feed")).unwrap();
    fs::write(
        data.join("alice__hub/commits.json"),
        serde_json::json!([
            {"sha": "abc1234", "message": "init", "timestamp": "2026-01-19T09:00:00Z"}
        ])
        .to_string(),
    )
    .unwrap();
    let many: Vec<_> = (0..12)
        .map(|i| serde_json::json!({"sha_short": format!("s{i}"), "message": format!("commit {i}")}))
        .collect();
    fs::write(
        data.join("bob__engine/commits.json"),
        serde_json::json!({"repo": "bob/engine", "commits": many}).to_string(),
    )
    .unwrap();
    fs::write(data.join("broken__feed/commits.json"), "{not json").unwrap();

    fs::create_dir_all(root.join("site")).unwrap();
    fs::write(root.join("site/index.html"), "<h1>Dashboard</h1>").unwrap();

    root
}

/// Helper function to spawn the app on a random port for testing.
/// Returns the base URL (e.g., "http://127.0.0.1:12345").
async fn spawn_app(root: &Path) -> String {
    let config = Config {
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        team_tracking_dir: root.join("team-tracking"),
        data_dir: root.join("data"),
        projects_file: root.join("config/projects.json"),
        site_dir: root.join("site"),
        log_dir: root.join("logs"),
        rust_log: "error".to_string(),
        allowed_origins: vec!["http://localhost:3000".to_string()],
    };

    let app = routes::create_router(AppState::new(config));

    // Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    // Spawn the server in the background
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}

#[tokio::test]
async fn health_check_404() {
    // Arrange
    let root = seed_fixture();
    let address = spawn_app(&root).await;
    let client = reqwest::Client::new();

    // Act
    let response = client
        .get(format!("{}/random_path_that_does_not_exist", address))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn health_works() {
    let root = seed_fixture();
    let address = spawn_app(&root).await;

    let body: serde_json::Value = reqwest::get(format!("{}/health", address))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn static_site_is_served() {
    let root = seed_fixture();
    let address = spawn_app(&root).await;

    let response = reqwest::get(format!("{}/index.html", address)).await.unwrap();
    assert_eq!(response.status().as_u16(), 200);
    assert!(response.text().await.unwrap().contains("Dashboard"));
}

#[tokio::test]
async fn log_is_rendered_and_sanitized() {
    // Arrange
    let root = seed_fixture();
    let address = spawn_app(&root).await;
    let client = reqwest::Client::new();

    // Act
    let response = client
        .get(format!("{}/api/logs", address))
        .query(&[("path", "team-tracking/alice/hub/daily/2026-01-19.md")])
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["date"], "2026-01-19");

    let html = body["html"].as_str().unwrap();
    assert!(html.contains("<h1>Monday</h1>"));
    assert!(html.contains(
        r#"<a href="https://example.com/docs" rel="noopener noreferrer">docs</a>"#
    ));
    assert!(html.contains("clicked"));
    assert!(html.contains("<a>bad link</a>"));
    assert!(!html.contains("<script"));
    assert!(!html.contains("onclick"));
    assert!(!html.contains("<span"));
    assert!(!html.contains("javascript:"));
}

#[tokio::test]
async fn log_rejects_invalid_paths() {
    let root = seed_fixture();
    let address = spawn_app(&root).await;
    let client = reqwest::Client::new();

    for path in [
        "team-tracking/../config/projects.json",
        "config/projects.json",
        "team-tracking/alice/hub/daily/2026-01-19.txt",
        "team-tracking/https://evil.example/x.md",
    ] {
        let response = client
            .get(format!("{}/api/logs", address))
            .query(&[("path", path)])
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 400, "path {path}");
    }
}

#[tokio::test]
async fn missing_log_is_404() {
    let root = seed_fixture();
    let address = spawn_app(&root).await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/api/logs", address))
        .query(&[("path", "team-tracking/alice/hub/daily/2020-01-01.md")])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 404);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn log_page_has_dated_title() {
    let root = seed_fixture();
    let address = spawn_app(&root).await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/log", address))
        .query(&[("path", "team-tracking/alice/hub/daily/2026-01-19.md")])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    let page = response.text().await.unwrap();
    assert!(page.contains("2026-01-19"));
    assert!(page.contains(r#"id="logViewer""#));
    assert!(page.contains("<h1>Monday</h1>"));
    assert!(!page.contains("<script"));
}

#[tokio::test]
async fn log_page_error_states() {
    let root = seed_fixture();
    let address = spawn_app(&root).await;
    let client = reqwest::Client::new();

    let missing = client.get(format!("{}/log", address)).send().await.unwrap();
    assert_eq!(missing.status().as_u16(), 400);
    assert!(missing.text().await.unwrap().contains("No log path specified"));

    let invalid = client
        .get(format!("{}/log", address))
        .query(&[("path", "<script>alert(1)</script>")])
        .send()
        .await
        .unwrap();
    assert_eq!(invalid.status().as_u16(), 400);
    let page = invalid.text().await.unwrap();
    assert!(page.contains("Invalid log path"));
    assert!(!page.contains("<script>"));

    let not_found = client
        .get(format!("{}/log", address))
        .query(&[("path", "team-tracking/alice/hub/daily/2020-01-01.md")])
        .send()
        .await
        .unwrap();
    assert_eq!(not_found.status().as_u16(), 404);
    assert!(not_found.text().await.unwrap().contains("Error loading log:"));
}

#[tokio::test]
async fn daily_lists_projects_with_logs() {
    let root = seed_fixture();
    let address = spawn_app(&root).await;

    let index: serde_json::Value = reqwest::get(format!("{}/api/daily/index", address))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(index, serde_json::json!({"alice__hub": ["2026-01-19", "2026-01-18"]}));

    let sections: serde_json::Value = reqwest::get(format!("{}/api/daily", address))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let sections = sections.as_array().unwrap();
    assert_eq!(sections.len(), 2);

    assert_eq!(sections[0]["project"]["display_name"], "Gene Hub");
    assert_eq!(
        sections[0]["logs"][0]["path"],
        "team-tracking/alice/hub/daily/2026-01-19.md"
    );
    assert_eq!(sections[1]["project"]["key"], "bob__TBD");
    assert_eq!(sections[1]["logs"], serde_json::json!([]));
}

#[tokio::test]
async fn commits_feed_builds_cards() {
    let root = seed_fixture();
    let address = spawn_app(&root).await;

    let cards: serde_json::Value = reqwest::get(format!("{}/api/commits", address))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let cards = cards.as_array().unwrap();

    let keys: Vec<&str> = cards
        .iter()
        .map(|c| c["project"]["key"].as_str().unwrap())
        .collect();
    assert_eq!(keys, vec!["alice__hub", "bob__engine", "broken__feed"]);

    assert_eq!(cards[0]["commits"][0]["sha_short"], "abc1234");
    assert_eq!(cards[0]["commits"][0]["committed_at"], "2026-01-19T09:00:00Z");

    assert_eq!(cards[1]["project"]["member"], "Bob");
    assert_eq!(cards[1]["project"]["repo"], "engine");
    assert_eq!(cards[1]["commits"].as_array().unwrap().len(), 8);

    assert!(cards[2]["commits"].is_null());
}

#[tokio::test]
async fn single_feed_keeps_extra_fields() {
    let root = seed_fixture();
    let address = spawn_app(&root).await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/api/commits/bob__engine", address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let feed: serde_json::Value = response.json().await.unwrap();
    assert_eq!(feed["repo"], "bob/engine");
    assert_eq!(feed["commits"].as_array().unwrap().len(), 12);

    let missing = client
        .get(format!("{}/api/commits/nobody__nothing", address))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status().as_u16(), 404);

    let invalid = client
        .get(format!("{}/api/commits/..", address))
        .send()
        .await
        .unwrap();
    assert!(invalid.status().is_client_error());
}
