// Configuration loading and parsing (scoutai.toml, credentials.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub recommendations: RecommendationConfig,
    pub scoring: ScoringConfig,
    pub search: SearchConfig,
    pub credentials: CredentialsConfig,
    /// Raw database path from `[database]`. Empty means "use the platform
    /// data directory"; see [`Config::resolve_db_path`].
    pub db_path: String,
}

// ---------------------------------------------------------------------------
// scoutai.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire scoutai.toml file.
#[derive(Debug, Clone, Deserialize)]
struct ScoutaiFile {
    api: ApiConfig,
    recommendations: RecommendationConfig,
    #[serde(default)]
    scoring: ScoringConfig,
    search: SearchConfig,
    database: DatabaseSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL including the `/api` prefix, e.g. `http://localhost:5000/api`.
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationConfig {
    pub top_k: usize,
}

/// Point values for the similarity scorer. Omitted keys keep the stock
/// values (30/20/15 bonuses, a 3-year age window, 10 points per stat and 10
/// for market value).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub style_bonus: f64,
    pub position_bonus: f64,
    pub age_bonus: f64,
    pub age_window: u32,
    pub stat_weight: f64,
    pub value_weight: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            style_bonus: 30.0,
            position_bonus: 20.0,
            age_bonus: 15.0,
            age_window: 3,
            stat_weight: 10.0,
            value_weight: 10.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    pub history_limit: usize,
    pub max_results: usize,
    pub default_results: usize,
}

#[derive(Debug, Clone, Deserialize)]
struct DatabaseSection {
    #[serde(default)]
    path: String,
}

// ---------------------------------------------------------------------------
// credentials.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Default)]
pub struct CredentialsConfig {
    /// Value of the API's session cookie (`session=...`), copied from a
    /// logged-in browser. Needed only for favorites/comparisons endpoints.
    pub session_cookie: Option<String>,
}

impl Config {
    /// Where the SQLite file lives. A blank `[database] path` resolves to
    /// `<platform data dir>/scoutai.db`, falling back to the working
    /// directory when no home directory can be determined.
    pub fn resolve_db_path(&self) -> PathBuf {
        if !self.db_path.trim().is_empty() {
            return PathBuf::from(&self.db_path);
        }
        match directories::ProjectDirs::from("", "", "scoutai") {
            Some(dirs) => dirs.data_dir().join("scoutai.db"),
            None => PathBuf::from("scoutai.db"),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/scoutai.toml` and
/// (optionally) `config/credentials.toml`, relative to `base_dir`.
///
/// Does not copy defaults; `load_config()` does that first.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let config_dir = base_dir.join("config");

    // --- scoutai.toml (required) ---
    let main_path = config_dir.join("scoutai.toml");
    let main_text = read_file(&main_path)?;
    let file: ScoutaiFile = toml::from_str(&main_text).map_err(|e| ConfigError::ParseError {
        path: main_path.clone(),
        source: e,
    })?;

    // --- credentials.toml (optional) ---
    let credentials_path = config_dir.join("credentials.toml");
    let credentials = if credentials_path.exists() {
        let cred_text = read_file(&credentials_path)?;
        toml::from_str(&cred_text).map_err(|e| ConfigError::ParseError {
            path: credentials_path.clone(),
            source: e,
        })?
    } else {
        CredentialsConfig::default()
    };

    let config = Config {
        api: file.api,
        recommendations: file.recommendations,
        scoring: file.scoring,
        search: file.search,
        credentials,
        db_path: file.database.path,
    };

    validate(&config)?;

    Ok(config)
}

/// Ensure all config files exist by copying missing ones from `defaults/`.
/// Returns the list of files that were copied. Skips `.example` files.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the project root or ensure defaults/ is present",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    let mut copied = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }
        let target = config_dir.join(file_name);

        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(mut dest) => {
                let content = std::fs::read(&path).map_err(|e| ConfigError::DefaultsCopyError {
                    message: format!("failed to read {}: {e}", path.display()),
                })?;
                std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                    ConfigError::DefaultsCopyError {
                        message: format!("failed to write {}: {e}", target.display()),
                    }
                })?;
                copied.push(target);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("failed to create {}: {e}", target.display()),
                });
            }
        }
    }

    Ok(copied)
}

/// Loads config relative to the current working directory, copying default
/// files into `config/` first.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let base_url = config.api.base_url.trim();
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(ConfigError::ValidationError {
            field: "api.base_url".into(),
            message: format!("must start with http:// or https://, got {base_url:?}"),
        });
    }

    if config.api.timeout_secs == 0 {
        return Err(ConfigError::ValidationError {
            field: "api.timeout_secs".into(),
            message: "must be greater than 0".into(),
        });
    }

    if config.recommendations.top_k == 0 {
        return Err(ConfigError::ValidationError {
            field: "recommendations.top_k".into(),
            message: "must be greater than 0".into(),
        });
    }

    // Scoring weights may be zero (disables a component) but never negative.
    let s = &config.scoring;
    let weight_fields: &[(&str, f64)] = &[
        ("scoring.style_bonus", s.style_bonus),
        ("scoring.position_bonus", s.position_bonus),
        ("scoring.age_bonus", s.age_bonus),
        ("scoring.stat_weight", s.stat_weight),
        ("scoring.value_weight", s.value_weight),
    ];
    for (name, val) in weight_fields {
        if !val.is_finite() || *val < 0.0 {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: format!("must be a finite value >= 0, got {val}"),
            });
        }
    }

    let search = &config.search;
    let search_fields: &[(&str, usize)] = &[
        ("search.history_limit", search.history_limit),
        ("search.max_results", search.max_results),
        ("search.default_results", search.default_results),
    ];
    for (name, val) in search_fields {
        if *val == 0 {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: "must be > 0".into(),
            });
        }
    }

    if search.default_results > search.max_results {
        return Err(ConfigError::ValidationError {
            field: "search.default_results".into(),
            message: format!(
                "must not exceed search.max_results ({}), got {}",
                search.max_results, search.default_results
            ),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
