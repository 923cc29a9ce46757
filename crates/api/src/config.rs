use std::path::{Path, PathBuf};

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8888`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `8888`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8888".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins = parse_origins(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".into()),
        );

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Locations of the content the server reads and writes outside the database.
#[derive(Debug, Clone)]
pub struct ContentConfig {
    /// Static mirror file. `None` disables mirroring.
    pub story_json_path: Option<PathBuf>,
    /// Directory uploads are written into.
    pub media_root: PathBuf,
    /// URL path the media root is published under.
    pub media_url_prefix: String,
    /// Scheme and host prepended to public media URLs.
    pub media_base_url: String,
    /// Default directory holding `story.json` for imports.
    pub import_root: PathBuf,
}

/// Directories searched (relative to the working directory) for an existing
/// `story.json` when `STORY_JSON_PATH` is not set.
const MIRROR_SEARCH_DIRS: &[&str] = &["frontend/public", "../frontend/public", "public"];

/// File name of the story document, both for the mirror and for imports.
pub const STORY_JSON_FILE: &str = "story.json";

impl ContentConfig {
    /// Load content locations from environment variables with defaults.
    ///
    /// | Env Var            | Default                                  |
    /// |--------------------|------------------------------------------|
    /// | `STORY_JSON_PATH`  | first existing `story.json` found under `frontend/public`, `../frontend/public`, `public` |
    /// | `MEDIA_ROOT`       | `static_media`                           |
    /// | `MEDIA_URL_PREFIX` | `/media`                                 |
    /// | `MEDIA_BASE_URL`   | `http://localhost:8888`                  |
    /// | `IMPORT_ROOT`      | `frontend/public`                        |
    pub fn from_env() -> Self {
        let story_json_path = match std::env::var("STORY_JSON_PATH") {
            Ok(path) if !path.trim().is_empty() => Some(PathBuf::from(path)),
            _ => std::env::current_dir()
                .ok()
                .and_then(|cwd| discover_story_json(&cwd)),
        };

        Self {
            story_json_path,
            media_root: PathBuf::from(
                std::env::var("MEDIA_ROOT").unwrap_or_else(|_| "static_media".into()),
            ),
            media_url_prefix: std::env::var("MEDIA_URL_PREFIX").unwrap_or_else(|_| "/media".into()),
            media_base_url: std::env::var("MEDIA_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8888".into()),
            import_root: PathBuf::from(
                std::env::var("IMPORT_ROOT").unwrap_or_else(|_| "frontend/public".into()),
            ),
        }
    }
}

/// Find the first existing `story.json` below `base` in the search order.
pub fn discover_story_json(base: &Path) -> Option<PathBuf> {
    MIRROR_SEARCH_DIRS
        .iter()
        .map(|dir| base.join(dir).join(STORY_JSON_FILE))
        .find(|candidate| candidate.is_file())
}
