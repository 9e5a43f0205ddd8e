// src/utils/path.rs

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

/// Every log path the viewer accepts lives under this prefix.
pub const ALLOWED_PATH_PREFIX: &str = "team-tracking/";

static LOG_PATH_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9/_.-]+$").expect("valid log path pattern"));

static LOG_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{4}-\d{2}-\d{2})\.md$").expect("valid log date pattern"));

static PROJECT_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.-]+$").expect("valid project key pattern"));

/// Checks that `path` names a Markdown file under `team-tracking/` and
/// cannot escape it.
pub fn is_valid_log_path(path: &str) -> bool {
    if !path.starts_with(ALLOWED_PATH_PREFIX) || !path.ends_with(".md") {
        return false;
    }
    if path.contains("..") || path.contains('\\') || path.contains("://") {
        return false;
    }
    LOG_PATH_CHARS.is_match(path)
}

/// Validator hook for query DTOs.
pub fn validate_log_path(path: &str) -> Result<(), validator::ValidationError> {
    if !is_valid_log_path(path) {
        return Err(validator::ValidationError::new("invalid_log_path"));
    }
    Ok(())
}

/// Date encoded in a `.../YYYY-MM-DD.md` log path.
pub fn log_date(path: &str) -> Option<NaiveDate> {
    let captures = LOG_DATE.captures(path)?;
    NaiveDate::parse_from_str(&captures[1], "%Y-%m-%d").ok()
}

/// Maps a validated log path onto the tracking directory on disk.
///
/// Returns `None` for paths that fail [`is_valid_log_path`].
pub fn resolve_log_path(team_tracking_dir: &Path, path: &str) -> Option<PathBuf> {
    if !is_valid_log_path(path) {
        return None;
    }
    let relative = path.strip_prefix(ALLOWED_PATH_PREFIX)?;
    Some(team_tracking_dir.join(relative))
}

/// Project keys (`owner__repo`) double as directory names.
pub fn is_valid_project_key(key: &str) -> bool {
    !key.contains("..") && PROJECT_KEY.is_match(key)
}

/// Path of the daily log for `owner`/`repo` on `date`, as the viewer expects it.
pub fn daily_log_path(owner: &str, repo: &str, date: &str) -> String {
    format!("{ALLOWED_PATH_PREFIX}{owner}/{repo}/daily/{date}.md")
}
