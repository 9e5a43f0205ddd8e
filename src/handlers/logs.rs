// src/handlers/logs.rs

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    markdown::render_log,
    utils::{
        html::escape_html,
        path::{is_valid_log_path, log_date, resolve_log_path, validate_log_path},
    },
};

/// Site name used in page titles.
pub const SITE_TITLE: &str = "Gene-Brain Hub";

/// Query parameters for the JSON log endpoint.
#[derive(Debug, Deserialize, Validate)]
pub struct LogQuery {
    #[validate(custom(function = validate_log_path))]
    pub path: String,
}

/// Query parameters for the log page. A missing path is rendered as an
/// empty state rather than rejected by the extractor.
#[derive(Debug, Deserialize)]
pub struct LogPageQuery {
    pub path: Option<String>,
}

/// A Markdown log rendered to sanitized HTML.
#[derive(Debug, Serialize)]
pub struct RenderedLog {
    pub path: String,
    /// Date taken from a `YYYY-MM-DD.md` file name.
    pub date: Option<NaiveDate>,
    pub html: String,
}

/// Reads and renders the log at a `team-tracking/...` path.
async fn load_log(config: &Config, path: &str) -> Result<RenderedLog, AppError> {
    let file = resolve_log_path(&config.team_tracking_dir, path)
        .ok_or_else(|| AppError::BadRequest("Invalid log path".to_string()))?;

    let markdown = tokio::fs::read_to_string(&file).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => AppError::NotFound("Log not found".to_string()),
        _ => AppError::from(e),
    })?;

    Ok(RenderedLog {
        path: path.to_string(),
        date: log_date(path),
        html: render_log(&markdown),
    })
}

/// Returns a log as sanitized HTML inside JSON.
pub async fn get_log(
    State(config): State<Config>,
    Query(params): Query<LogQuery>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = params.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let log = load_log(&config, &params.path).await?;
    tracing::debug!("Rendered log {}", log.path);

    Ok(Json(log))
}

/// Serves the log viewer page with the rendered log inlined.
pub async fn log_page(
    State(config): State<Config>,
    Query(params): Query<LogPageQuery>,
) -> (StatusCode, Html<String>) {
    let Some(path) = params.path.filter(|p| !p.is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Html(render_page(SITE_TITLE, &empty_state("❓", "No log path specified"))),
        );
    };

    if !is_valid_log_path(&path) {
        tracing::warn!("Rejected log path {:?}", path);
        return (
            StatusCode::BAD_REQUEST,
            Html(render_page(SITE_TITLE, &empty_state("⚠️", "Invalid log path"))),
        );
    }

    match load_log(&config, &path).await {
        Ok(log) => {
            let title = match log.date {
                Some(date) => format!("{} — {}", date, SITE_TITLE),
                None => SITE_TITLE.to_string(),
            };
            (StatusCode::OK, Html(render_page(&title, &log.html)))
        }
        Err(e) => {
            tracing::warn!("Error loading log {}: {}", path, e);
            let message = format!("Error loading log: {}", escape_html(&path));
            (e.status(), Html(render_page(SITE_TITLE, &empty_state("⚠️", &message))))
        }
    }
}

/// `content` must already be safe HTML.
fn render_page(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<link rel="stylesheet" href="/css/style.css">
</head>
<body>
<main class="log-viewer" id="logViewer">
{content}
</main>
</body>
</html>
"#,
        title = escape_html(title),
    )
}

fn empty_state(icon: &str, text_html: &str) -> String {
    format!(
        r#"<div class="empty-state">
  <div class="empty-state-icon">{icon}</div>
  <div class="empty-state-text">{text_html}</div>
</div>"#
    )
}
