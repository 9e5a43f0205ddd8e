// src/models/project.rs

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Repo placeholder used in `projects.json` before a member has picked a repo.
pub const PLACEHOLDER_REPO: &str = "TBD";

/// One entry of `projects.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// `owner__repo`.
    pub key: String,
    pub display_name: Option<String>,
    /// Team member responsible for the project.
    pub member: Option<String>,
    /// GitHub username owning the repo.
    pub owner: Option<String>,
    pub repo: Option<String>,
    /// Other GitHub usernames that push on behalf of the same member.
    #[serde(default)]
    pub additional_owners: Vec<String>,
}

/// Top-level shape of `projects.json`.
#[derive(Debug, Default, Deserialize)]
pub struct ProjectsFile {
    #[serde(default)]
    pub projects: Vec<Project>,
}

/// Display information for a project key, after resolution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectInfo {
    pub key: String,
    pub display_name: String,
    pub member: String,
    pub owner: Option<String>,
    pub repo: Option<String>,
}

/// Splits `owner__repo` into its parts. Empty parts count as missing.
pub fn split_key(key: &str) -> (Option<&str>, Option<&str>) {
    let mut parts = key.split("__");
    let owner = parts.next().filter(|s| !s.is_empty());
    let repo = parts.next().filter(|s| !s.is_empty());
    (owner, repo)
}

/// Resolves `key` against the registry.
///
/// Tries an exact key match, then a project owned by the key's owner
/// (primary owner first, then additional owners), and finally derives
/// the display info from the key itself.
pub fn resolve_project(projects: &[Project], key: &str) -> ProjectInfo {
    let (owner, repo) = split_key(key);

    let matched = projects.iter().find(|p| p.key == key).or_else(|| {
        let owner = owner?;
        projects
            .iter()
            .find(|p| p.owner.as_deref() == Some(owner))
            .or_else(|| {
                projects
                    .iter()
                    .find(|p| p.additional_owners.iter().any(|o| o == owner))
            })
    });

    match matched {
        Some(project) => {
            let repo = match project.repo.as_deref() {
                Some(r) if r != PLACEHOLDER_REPO => Some(r.to_string()),
                _ => repo.map(str::to_string),
            };
            ProjectInfo {
                key: key.to_string(),
                display_name: project
                    .display_name
                    .clone()
                    .or_else(|| repo.clone())
                    .unwrap_or_else(|| key.to_string()),
                member: project
                    .member
                    .clone()
                    .unwrap_or_else(|| "Unknown".to_string()),
                owner: project.owner.clone().or_else(|| owner.map(str::to_string)),
                repo,
            }
        }
        None => ProjectInfo {
            key: key.to_string(),
            display_name: repo.unwrap_or(key).to_string(),
            member: owner.unwrap_or("Unknown").to_string(),
            owner: owner.map(str::to_string),
            repo: repo.map(str::to_string),
        },
    }
}

/// Loads the project registry.
///
/// The dashboard still works without a registry, so a missing or broken
/// file yields an empty list after logging the problem.
pub async fn load_projects(path: &Path) -> Vec<Project> {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) => {
            tracing::error!("Failed to load projects from {}: {}", path.display(), e);
            return Vec::new();
        }
    };

    match serde_json::from_str::<ProjectsFile>(&raw) {
        Ok(file) => file.projects,
        Err(e) => {
            tracing::error!("Failed to parse projects from {}: {}", path.display(), e);
            Vec::new()
        }
    }
}
