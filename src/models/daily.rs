// src/models/daily.rs

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::project::{Project, ProjectInfo, resolve_project, split_key};
use crate::utils::path::daily_log_path;

static DAILY_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid daily date pattern"));

/// Project key (`owner__repo`) to log dates, most recent first.
pub type DailyIndex = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyLog {
    pub date: String,
    /// Viewer path, e.g. `team-tracking/alice/hub/daily/2026-01-19.md`.
    pub path: String,
}

/// One project block of the daily logs page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySection {
    pub project: ProjectInfo,
    pub logs: Vec<DailyLog>,
}

/// Scans `<root>/<owner>/<repo>/daily/*.md` for dated logs.
///
/// Files whose stem is not `YYYY-MM-DD` are ignored, as are projects without
/// any dated log. A missing root yields an empty index.
pub fn build_daily_index(root: &Path) -> io::Result<DailyIndex> {
    let mut index = DailyIndex::new();

    let owners = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(index),
        Err(e) => return Err(e),
    };

    for owner_entry in owners {
        let owner_entry = owner_entry?;
        if !owner_entry.file_type()?.is_dir() {
            continue;
        }
        let Some(owner) = owner_entry.file_name().to_str().map(str::to_string) else {
            continue;
        };

        for repo_entry in fs::read_dir(owner_entry.path())? {
            let repo_entry = repo_entry?;
            if !repo_entry.file_type()?.is_dir() {
                continue;
            }
            let Some(repo) = repo_entry.file_name().to_str().map(str::to_string) else {
                continue;
            };

            let daily_dir = repo_entry.path().join("daily");
            if !daily_dir.is_dir() {
                continue;
            }

            let mut dates = Vec::new();
            for file in fs::read_dir(&daily_dir)? {
                let path = file?.path();
                if path.extension().and_then(|e| e.to_str()) != Some("md") {
                    continue;
                }
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    if DAILY_DATE.is_match(stem) {
                        dates.push(stem.to_string());
                    }
                }
            }

            if !dates.is_empty() {
                dates.sort_unstable_by(|a, b| b.cmp(a));
                index.insert(format!("{owner}__{repo}"), dates);
            }
        }
    }

    tracing::debug!("Daily index built with {} project(s)", index.len());
    Ok(index)
}

/// Builds the daily page: every registered project, then every indexed
/// project not in the registry, each with links to its logs.
pub fn daily_sections(projects: &[Project], index: &DailyIndex) -> Vec<DailySection> {
    let mut keys: Vec<&str> = Vec::new();
    for key in projects.iter().map(|p| p.key.as_str()).chain(index.keys().map(String::as_str)) {
        if !keys.contains(&key) {
            keys.push(key);
        }
    }

    keys.into_iter()
        .map(|key| {
            let (owner, repo) = split_key(key);
            let logs = match (owner, repo, index.get(key)) {
                (Some(owner), Some(repo), Some(dates)) => dates
                    .iter()
                    .map(|date| DailyLog {
                        date: date.clone(),
                        path: daily_log_path(owner, repo, date),
                    })
                    .collect(),
                _ => Vec::new(),
            };
            DailySection {
                project: resolve_project(projects, key),
                logs,
            }
        })
        .collect()
}
