// src/models/commit.rs

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::project::{Project, ProjectInfo, split_key};

/// Commits shown per project card.
pub const MAX_COMMITS_DISPLAY: usize = 8;

pub const COMMITS_FILE: &str = "commits.json";

const MISSING_SHA: &str = "—";

/// A commit in the normalized shape served to the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Commit {
    pub sha_short: String,
    pub message: String,
    pub committed_at: String,
}

/// Normalized contents of a `commits.json` file.
///
/// Top-level fields other than `commits` are passed through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CommitFeed {
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    pub commits: Vec<Commit>,
}

/// One card of the commits page. `commits` is `None` when the project's
/// file could not be loaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommitCard {
    pub project: ProjectInfo,
    pub commits: Option<Vec<Commit>>,
}

/// First non-empty string among `fields`.
fn first_str<'a>(commit: &'a Value, fields: &[&str]) -> Option<&'a str> {
    fields
        .iter()
        .find_map(|field| commit.get(*field)?.as_str().filter(|s| !s.is_empty()))
}

fn normalize_commit(commit: &Value, sha_fields: &[&str], time_fields: &[&str]) -> Commit {
    Commit {
        sha_short: first_str(commit, sha_fields).unwrap_or(MISSING_SHA).to_string(),
        message: first_str(commit, &["message"]).unwrap_or_default().to_string(),
        committed_at: first_str(commit, time_fields).unwrap_or_default().to_string(),
    }
}

/// Accepts both layouts of `commits.json`.
///
/// The old layout is a bare array of `{sha, message, timestamp}`; the new one
/// is an object with a `commits` array of `{sha_short, message,
/// committed_at}`. Either spelling is accepted inside both, with the
/// layout's own names taking precedence. Anything else is an empty feed.
pub fn normalize_commits(value: Value) -> CommitFeed {
    match value {
        Value::Array(items) => CommitFeed {
            extra: Map::new(),
            commits: items
                .iter()
                .map(|c| normalize_commit(c, &["sha", "sha_short"], &["timestamp", "committed_at"]))
                .collect(),
        },
        Value::Object(mut map) => match map.remove("commits") {
            Some(Value::Array(items)) => CommitFeed {
                extra: map,
                commits: items
                    .iter()
                    .map(|c| normalize_commit(c, &["sha_short", "sha"], &["committed_at", "timestamp"]))
                    .collect(),
            },
            _ => {
                tracing::warn!("Unexpected commits.json layout: object without a commits array");
                CommitFeed::default()
            }
        },
        other => {
            tracing::warn!("Unexpected commits.json layout: {}", other);
            CommitFeed::default()
        }
    }
}

/// Names of the subdirectories of `data_dir` holding a `commits.json`, sorted.
pub fn discover_data_keys(data_dir: &Path) -> io::Result<Vec<String>> {
    let entries = match fs::read_dir(data_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };

    let mut keys = Vec::new();
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_dir() || !entry.path().join(COMMITS_FILE).is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            keys.push(name.to_string());
        }
    }
    keys.sort();
    Ok(keys)
}

/// Keys to render on the commits page, in display order.
///
/// Registered projects come first. A placeholder key (`owner__TBD`) is
/// swapped for the keys discovered for that owner, if any. Remaining
/// discovered keys follow.
pub fn feed_keys(projects: &[Project], discovered: &[String]) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    let mut add = |key: &str| {
        if !keys.iter().any(|k| k == key) {
            keys.push(key.to_string());
        }
    };

    for project in projects {
        let owned: Vec<&String> = match project.owner.as_deref() {
            Some(owner) if project.key.contains("__TBD") => discovered
                .iter()
                .filter(|k| split_key(k).0 == Some(owner))
                .collect(),
            _ => Vec::new(),
        };

        if owned.is_empty() {
            add(project.key.as_str());
        } else {
            owned.into_iter().for_each(|k| add(k.as_str()));
        }
    }
    for key in discovered {
        add(key.as_str());
    }

    keys
}
