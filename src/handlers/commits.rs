// src/handlers/commits.rs

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde_json::Value;

use crate::{
    config::Config,
    error::AppError,
    models::{
        commit::{
            COMMITS_FILE, CommitCard, CommitFeed, MAX_COMMITS_DISPLAY, discover_data_keys,
            feed_keys, normalize_commits,
        },
        project::{load_projects, resolve_project},
    },
    utils::path::is_valid_project_key,
};

/// Loads and normalizes `<data_dir>/<key>/commits.json`.
async fn load_feed(config: &Config, key: &str) -> Result<CommitFeed, AppError> {
    if !is_valid_project_key(key) {
        return Err(AppError::BadRequest("Invalid project key".to_string()));
    }

    let file = config.data_dir.join(key).join(COMMITS_FILE);
    let raw = tokio::fs::read_to_string(&file).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => AppError::NotFound(format!("No commits for {}", key)),
        _ => AppError::from(e),
    })?;

    // The file is ours, not the client's: a broken one is a server fault.
    let value: Value = serde_json::from_str(&raw)
        .map_err(|e| AppError::InternalServerError(format!("{}: {}", file.display(), e)))?;

    Ok(normalize_commits(value))
}

/// Builds one card per project, newest commits first as stored.
///
/// A project whose feed cannot be loaded still gets a card, with
/// `commits: null`.
pub async fn list_commits(State(config): State<Config>) -> Result<impl IntoResponse, AppError> {
    let data_dir = config.data_dir.clone();
    let discovered = tokio::task::spawn_blocking(move || discover_data_keys(&data_dir)).await??;
    let projects = load_projects(&config.projects_file).await;

    let mut cards = Vec::new();
    for key in feed_keys(&projects, &discovered) {
        let commits = match load_feed(&config, &key).await {
            Ok(feed) => Some(feed.commits.into_iter().take(MAX_COMMITS_DISPLAY).collect()),
            Err(e) => {
                tracing::warn!("Failed to load commits for {}: {}", key, e);
                None
            }
        };
        cards.push(CommitCard {
            project: resolve_project(&projects, &key),
            commits,
        });
    }

    Ok(Json(cards))
}

/// Returns the full normalized feed of one project.
pub async fn get_commits(
    State(config): State<Config>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let feed = load_feed(&config, &key).await?;
    Ok(Json(feed))
}
