//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// The snapshot file holding all post metadata.
    pub posts_file: PathBuf,
    /// Directory of per-post content files (`<id>.md`).
    pub posts_dir: PathBuf,
    /// Directory of uploaded thumbnails.
    pub thumbs_dir: PathBuf,
    pub validator_url: String,
    pub validator_key: String,
    pub allowed_users: AllowedUsers,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            posts_file: env::var("POSTS_JSON")
                .unwrap_or_else(|_| "posts.json".to_string())
                .into(),
            posts_dir: env::var("POSTS_DIR")
                .unwrap_or_else(|_| "posts".to_string())
                .into(),
            thumbs_dir: env::var("THUMBS_DIR")
                .unwrap_or_else(|_| "thumbnails".to_string())
                .into(),
            validator_url: env::var("VALIDATOR_URL")
                .unwrap_or_else(|_| "https://social.rotur.dev/validate".to_string()),
            validator_key: env::var("VALIDATOR_KEY")
                .unwrap_or_else(|_| "warpdrive-blogger".to_string()),
            allowed_users: AllowedUsers::parse(
                &env::var("ALLOWED_USERS").unwrap_or_else(|_| "mist,jax".to_string()),
            ),
        }
    }
}

/// Users permitted to mutate posts. `*` allows everyone.
#[derive(Debug, Clone)]
pub struct AllowedUsers {
    all: bool,
    users: Vec<String>,
}

impl AllowedUsers {
    /// Parse a comma-separated list of usernames, or `*` for everyone.
    pub fn parse(spec: &str) -> Self {
        let spec = spec.trim();
        if spec == "*" {
            return Self {
                all: true,
                users: Vec::new(),
            };
        }
        Self {
            all: false,
            users: spec
                .split(',')
                .map(|u| u.trim().to_lowercase())
                .filter(|u| !u.is_empty())
                .collect(),
        }
    }

    pub fn contains(&self, username: &str) -> bool {
        self.all || self.users.iter().any(|u| u == &username.to_lowercase())
    }
}
