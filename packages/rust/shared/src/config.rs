//! Application configuration for tildegen.
//!
//! The config file is looked up at [`CONFIG_LOCATIONS`] unless a path is
//! given explicitly. Every value has a built-in default, so a missing file
//! yields a fully usable configuration.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TildegenError};
use crate::types::{Metadata, VisibilityPolicy};

/// Config file locations, checked in order.
pub const CONFIG_LOCATIONS: [&str; 2] = ["/etc/tildegen.toml", "/usr/local/etc/tildegen.toml"];

// ---------------------------------------------------------------------------
// Config structs (matching tildegen.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where to look inside home directories.
    #[serde(default)]
    pub paths: PathsConfig,

    /// Which accounts are considered.
    #[serde(default)]
    pub users: UsersConfig,

    /// Static metadata copied verbatim into the generated document.
    #[serde(default)]
    pub info: BTreeMap<String, toml::Value>,

    /// Output format identifier -> destination file.
    #[serde(default)]
    pub output: BTreeMap<String, PathBuf>,

    /// Template used by the `text` format.
    #[serde(default)]
    pub template: TemplateConfig,
}

/// `[paths]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Public web directory, relative to each home directory.
    #[serde(default = "default_public_html")]
    pub public_html: String,

    /// Opt-out sentinel file inside the public directory.
    #[serde(default = "default_hidden_file")]
    pub hidden_file: String,

    /// Index page inside the public directory.
    #[serde(default = "default_index_file")]
    pub index_file: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            public_html: default_public_html(),
            hidden_file: default_hidden_file(),
            index_file: default_index_file(),
        }
    }
}

fn default_public_html() -> String {
    "public_html".into()
}
fn default_hidden_file() -> String {
    ".hidden".into()
}
fn default_index_file() -> String {
    "index.html".into()
}

/// `[users]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsersConfig {
    /// Primary group id of listed accounts.
    #[serde(default = "default_group_id")]
    pub group_id: u32,

    /// Read accounts from this `passwd(5)` file instead of `getent passwd`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passwd_file: Option<PathBuf>,
}

impl Default for UsersConfig {
    fn default() -> Self {
        Self {
            group_id: default_group_id(),
            passwd_file: None,
        }
    }
}

fn default_group_id() -> u32 {
    100
}

/// `[template]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateConfig {
    /// Handlebars template for the `text` format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl AppConfig {
    /// The `[info]` section as document metadata.
    ///
    /// Dates and datetimes become their TOML string form.
    pub fn metadata(&self) -> Metadata {
        self.info
            .iter()
            .map(|(key, value)| (key.clone(), toml_to_json(value)))
            .collect()
    }

    /// Reject values the enumerator cannot work with.
    pub fn validate(&self) -> Result<()> {
        if Path::new(&self.paths.public_html).is_absolute() {
            return Err(TildegenError::config(format!(
                "paths.public_html must be relative to the home directory, got {}",
                self.paths.public_html
            )));
        }
        for (key, value) in [
            ("paths.hidden_file", &self.paths.hidden_file),
            ("paths.index_file", &self.paths.index_file),
        ] {
            if value.is_empty() {
                return Err(TildegenError::config(format!("{key} must not be empty")));
            }
        }
        Ok(())
    }
}

fn toml_to_json(value: &toml::Value) -> serde_json::Value {
    use serde_json::Value as Json;

    match value {
        toml::Value::String(s) => Json::String(s.clone()),
        toml::Value::Integer(i) => Json::from(*i),
        toml::Value::Float(f) => serde_json::Number::from_f64(*f)
            .map(Json::Number)
            .unwrap_or_else(|| Json::String(f.to_string())),
        toml::Value::Boolean(b) => Json::Bool(*b),
        toml::Value::Datetime(dt) => Json::String(dt.to_string()),
        toml::Value::Array(items) => Json::Array(items.iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Json::Object(
            table
                .iter()
                .map(|(key, value)| (key.clone(), toml_to_json(value)))
                .collect(),
        ),
    }
}

impl From<&AppConfig> for VisibilityPolicy {
    fn from(config: &AppConfig) -> Self {
        Self {
            group_id: config.users.group_id,
            public_html: PathBuf::from(&config.paths.public_html),
            hidden_file: config.paths.hidden_file.clone(),
            index_file: config.paths.index_file.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Pick the config file to use: the explicit path, or the first existing default location.
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    CONFIG_LOCATIONS
        .iter()
        .map(PathBuf::from)
        .find(|path| path.exists())
}

/// Load the application config. Returns defaults if no config file is found.
pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig> {
    match resolve_config_path(explicit) {
        Some(path) => load_config_from(&path),
        None => {
            tracing::debug!(locations = ?CONFIG_LOCATIONS, "no config file found, using defaults");
            Ok(AppConfig::default())
        }
    }
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| TildegenError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        TildegenError::config(format!("failed to parse {}: {e}", path.display()))
    })?;
    config.validate()?;

    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Write a default config file to `path`. Refuses to overwrite an existing file.
pub fn init_config(path: &Path) -> Result<PathBuf> {
    if path.exists() {
        return Err(TildegenError::config(format!(
            "{} already exists, not overwriting",
            path.display()
        )));
    }
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| TildegenError::io(dir, e))?;
    }

    let content = toml::to_string_pretty(&AppConfig::default())
        .map_err(|e| TildegenError::config(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| TildegenError::io(path, e))?;
    tracing::info!(path = %path.display(), "created default config file");

    Ok(path.to_path_buf())
}
