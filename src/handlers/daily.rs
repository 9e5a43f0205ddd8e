// src/handlers/daily.rs

use axum::{Json, extract::State, response::IntoResponse};

use crate::{
    config::Config,
    error::AppError,
    models::{
        daily::{DailyIndex, build_daily_index, daily_sections},
        project::load_projects,
    },
};

/// Scans the tracking tree off the async runtime.
async fn scan_daily_index(config: &Config) -> Result<DailyIndex, AppError> {
    let root = config.team_tracking_dir.clone();
    let index = tokio::task::spawn_blocking(move || build_daily_index(&root)).await??;
    Ok(index)
}

/// Lists every project with links to its daily logs.
pub async fn list_daily(State(config): State<Config>) -> Result<impl IntoResponse, AppError> {
    let index = scan_daily_index(&config).await?;
    let projects = load_projects(&config.projects_file).await;

    Ok(Json(daily_sections(&projects, &index)))
}

/// Returns the raw `owner__repo -> dates` index.
pub async fn get_daily_index(State(config): State<Config>) -> Result<impl IntoResponse, AppError> {
    let index = scan_daily_index(&config).await?;
    Ok(Json(index))
}
