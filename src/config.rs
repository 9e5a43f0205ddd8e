// src/config.rs

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use dotenvy::dotenv;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    /// Root of the `team-tracking/` tree holding the Markdown logs.
    pub team_tracking_dir: PathBuf,
    /// Holds `<owner>__<repo>/commits.json` per project.
    pub data_dir: PathBuf,
    pub projects_file: PathBuf,
    /// Static dashboard assets served for every unmatched route.
    pub site_dir: PathBuf,
    pub log_dir: PathBuf,
    pub rust_log: String,
    pub allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
            .parse()
            .expect("BIND_ADDR must be a socket address, e.g. 0.0.0.0:3000");

        let allowed_origins = env::var("ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Self {
            bind_addr,
            team_tracking_dir: path_var("TEAM_TRACKING_DIR", "team-tracking"),
            data_dir: path_var("DATA_DIR", "data"),
            projects_file: path_var("PROJECTS_FILE", "config/projects.json"),
            site_dir: path_var("SITE_DIR", "site"),
            log_dir: path_var("LOG_DIR", "logs"),
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            allowed_origins,
        }
    }
}

fn path_var(name: &str, default: &str) -> PathBuf {
    env::var_os(name)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(default))
}
