// Configuration loading and parsing (lineup.toml, app.toml).

use lineup_core::formation::{Formation, FORMATION_SIZE};
use lineup_core::strategy::ALL_ARCHETYPES;
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
    pub lineup: LineupConfig,
    pub recommendations: RecommendationConfig,
    pub comparison: ComparisonConfig,
    pub db_path: String,
    pub data_paths: DataPaths,
}

// ---------------------------------------------------------------------------
// lineup.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire lineup.toml file.
#[derive(Debug, Clone, Deserialize)]
struct LineupFile {
    lineup: LineupConfig,
    recommendations: RecommendationConfig,
    comparison: ComparisonConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LineupConfig {
    /// Name suggested when saving the working roster.
    pub team_name: String,
    /// Formation used when no working roster has been stored yet.
    pub default_formation: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationConfig {
    /// Placed players required before strategies are shown.
    pub min_players: usize,
    /// How many ranked strategies to show.
    pub top_k: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ComparisonConfig {
    /// Saved teams compared against the working roster when none are named.
    pub max_saved_teams: usize,
}

// ---------------------------------------------------------------------------
// app.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
struct AppFile {
    database: DatabaseSection,
    data_paths: DataPaths,
}

#[derive(Debug, Clone, Deserialize)]
struct DatabaseSection {
    path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    pub players: String,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/lineup.toml` and
/// `config/app.toml`, relative to `base_dir`.
///
/// Does not copy defaults; prefer `load_config()`.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let config_dir = base_dir.join("config");

    let lineup_path = config_dir.join("lineup.toml");
    let lineup_text = read_file(&lineup_path)?;
    let lineup_file: LineupFile =
        toml::from_str(&lineup_text).map_err(|e| ConfigError::ParseError {
            path: lineup_path.clone(),
            source: e,
        })?;

    let app_path = config_dir.join("app.toml");
    let app_text = read_file(&app_path)?;
    let app_file: AppFile = toml::from_str(&app_text).map_err(|e| ConfigError::ParseError {
        path: app_path.clone(),
        source: e,
    })?;

    let config = Config {
        lineup: lineup_file.lineup,
        recommendations: lineup_file.recommendations,
        comparison: lineup_file.comparison,
        db_path: app_file.database.path,
        data_paths: app_file.data_paths,
    };

    validate(&config)?;

    Ok(config)
}

/// Files read from `config/`, each seeded from `defaults/` on first run.
const CONFIG_FILES: [&str; 2] = ["lineup.toml", "app.toml"];

/// Copy each missing config file from `defaults/`, never overwriting one the
/// user already has. Returns the files that were copied.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let mut copied = Vec::new();
    for name in CONFIG_FILES {
        let target = config_dir.join(name);
        if target.exists() {
            continue;
        }
        let source = defaults_dir.join(name);
        std::fs::copy(&source, &target).map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to copy {}: {e}", source.display()),
        })?;
        copied.push(target);
    }

    Ok(copied)
}

/// Load config relative to the current working directory, copying defaults
/// first.
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

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.into(),
        message: message.into(),
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.lineup.team_name.trim().is_empty() {
        return Err(invalid("lineup.team_name", "must not be empty"));
    }

    if Formation::by_name(&config.lineup.default_formation).is_none() {
        return Err(invalid(
            "lineup.default_formation",
            format!("unknown formation `{}`", config.lineup.default_formation),
        ));
    }

    let min = config.recommendations.min_players;
    if !(1..=FORMATION_SIZE).contains(&min) {
        return Err(invalid(
            "recommendations.min_players",
            format!("must be between 1 and {FORMATION_SIZE}, got {min}"),
        ));
    }

    let top_k = config.recommendations.top_k;
    if !(1..=ALL_ARCHETYPES.len()).contains(&top_k) {
        return Err(invalid(
            "recommendations.top_k",
            format!("must be between 1 and {}, got {top_k}", ALL_ARCHETYPES.len()),
        ));
    }

    if config.comparison.max_saved_teams == 0 {
        return Err(invalid("comparison.max_saved_teams", "must be > 0"));
    }

    if config.db_path.trim().is_empty() {
        return Err(invalid("database.path", "must not be empty"));
    }

    if config.data_paths.players.trim().is_empty() {
        return Err(invalid("data_paths.players", "must not be empty"));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
