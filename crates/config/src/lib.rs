//! Configuration loading, validation, and management for hashnav.
//!
//! Loads configuration from `./hashnav.toml` (or an explicit path) with
//! environment variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "hashnav.toml";

/// The root configuration structure.
///
/// Maps directly to `hashnav.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Route used when the hash is absent or empty
    #[serde(default = "default_route")]
    pub default_route: String,

    /// Optional site name appended to every title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_name: Option<String>,

    /// Mount point ids
    #[serde(default)]
    pub mounts: MountsConfig,

    /// Fragment layout on the server
    #[serde(default)]
    pub fragments: FragmentsConfig,

    /// Route → sidebar fragment mapping
    #[serde(default)]
    pub sidebar: SidebarConfig,

    /// Document titles for the fallback tiers
    #[serde(default)]
    pub titles: TitlesConfig,

    /// Marker classes read and written by the router
    #[serde(default)]
    pub markers: MarkersConfig,

    /// Reveal-on-scroll settings
    #[serde(default)]
    pub reveal: RevealConfig,

    /// Where fragments are fetched from
    #[serde(default)]
    pub loader: LoaderConfig,
}

fn default_route() -> String {
    "home".into()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MountsConfig {
    #[serde(default = "default_main_mount")]
    pub main: String,

    #[serde(default = "default_sidebar_mount")]
    pub sidebar: String,

    #[serde(default = "default_header_mount")]
    pub header: String,

    #[serde(default = "default_footer_mount")]
    pub footer: String,
}

fn default_main_mount() -> String {
    "page-content".into()
}
fn default_sidebar_mount() -> String {
    "site-sidebar".into()
}
fn default_header_mount() -> String {
    "site-header".into()
}
fn default_footer_mount() -> String {
    "site-footer".into()
}

impl Default for MountsConfig {
    fn default() -> Self {
        Self {
            main: default_main_mount(),
            sidebar: default_sidebar_mount(),
            header: default_header_mount(),
            footer: default_footer_mount(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FragmentsConfig {
    /// Host document shell, fetched through the loader at startup
    #[serde(default = "default_shell")]
    pub shell: String,

    #[serde(default = "default_pages_dir")]
    pub pages_dir: String,

    #[serde(default = "default_extension")]
    pub extension: String,

    /// Shared fallback for main content and sidebars
    #[serde(default = "default_not_found")]
    pub not_found: String,

    /// Mount id → component fragment, injected once at startup
    #[serde(default = "default_includes")]
    pub includes: BTreeMap<String, String>,
}

fn default_shell() -> String {
    "index.html".into()
}
fn default_pages_dir() -> String {
    "pages".into()
}
fn default_extension() -> String {
    "html".into()
}
fn default_not_found() -> String {
    "pages/404.html".into()
}
fn default_includes() -> BTreeMap<String, String> {
    BTreeMap::from([
        (default_header_mount(), "components/header.html".to_string()),
        (default_footer_mount(), "components/footer.html".to_string()),
    ])
}

impl Default for FragmentsConfig {
    fn default() -> Self {
        Self {
            shell: default_shell(),
            pages_dir: default_pages_dir(),
            extension: default_extension(),
            not_found: default_not_found(),
            includes: default_includes(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SidebarConfig {
    /// Routes with a sidebar; every other route hides it
    #[serde(default = "default_sidebar_routes")]
    pub routes: BTreeMap<String, String>,
}

fn default_sidebar_routes() -> BTreeMap<String, String> {
    ["about", "contact"]
        .into_iter()
        .map(|route| (route.to_string(), format!("components/sidebar-{route}.html")))
        .collect()
}

impl Default for SidebarConfig {
    fn default() -> Self {
        Self {
            routes: default_sidebar_routes(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitlesConfig {
    #[serde(default = "default_not_found_title")]
    pub not_found: String,

    #[serde(default = "default_load_error_title")]
    pub load_error: String,

    /// Placed between page title and site name
    #[serde(default = "default_separator")]
    pub separator: String,
}

fn default_not_found_title() -> String {
    "Not Found".into()
}
fn default_load_error_title() -> String {
    "Load Error".into()
}

fn default_separator() -> String {
    " | ".into()
}

impl Default for TitlesConfig {
    fn default() -> Self {
        Self {
            not_found: default_not_found_title(),
            load_error: default_load_error_title(),
            separator: default_separator(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkersConfig {
    /// Class on the root of the 404 fragment
    #[serde(default = "default_not_found_class")]
    pub not_found_class: String,

    /// Class on the root of the inline error fragment
    #[serde(default = "default_error_class")]
    pub error_class: String,

    /// Layout flag set while no sidebar is shown
    #[serde(default = "default_no_sidebar_class")]
    pub no_sidebar_class: String,

    #[serde(default = "default_reveal_class")]
    pub reveal_class: String,

    #[serde(default = "default_revealed_class")]
    pub revealed_class: String,

    #[serde(default = "default_modal_open_class")]
    pub modal_open_class: String,
}

fn default_not_found_class() -> String {
    "page-404".into()
}
fn default_error_class() -> String {
    "page-error".into()
}
fn default_no_sidebar_class() -> String {
    "no-sidebar".into()
}
fn default_reveal_class() -> String {
    "reveal".into()
}
fn default_revealed_class() -> String {
    "is-in".into()
}
fn default_modal_open_class() -> String {
    "is-open".into()
}

impl Default for MarkersConfig {
    fn default() -> Self {
        Self {
            not_found_class: default_not_found_class(),
            error_class: default_error_class(),
            no_sidebar_class: default_no_sidebar_class(),
            reveal_class: default_reveal_class(),
            revealed_class: default_revealed_class(),
            modal_open_class: default_modal_open_class(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevealConfig {
    /// Visible fraction an element needs before it is revealed
    #[serde(default = "default_threshold")]
    pub threshold: f32,
}

fn default_threshold() -> f32 {
    0.12
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Fetch fragments over HTTP from this base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Read fragments from this directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_root: Option<PathBuf>,

    /// Append a `_=<millis>` query to every HTTP request
    #[serde(default = "default_true")]
    pub cache_bust_query: bool,
}

fn default_true() -> bool {
    true
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            site_root: None,
            cache_bust_query: true,
        }
    }
}

/// Where fragments come from, after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoaderSource {
    Http { base_url: String, cache_bust_query: bool },
    File { root: PathBuf },
}

impl RouterConfig {
    /// Load `./hashnav.toml` (or `path`), then apply environment overrides:
    /// - `HASHNAV_BASE_URL` (switches to the HTTP loader)
    /// - `HASHNAV_SITE_ROOT` (switches to the filesystem loader)
    /// - `HASHNAV_DEFAULT_ROUTE`
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from(CONFIG_FILE));
        let mut config = Self::read_from(&path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path, without env overrides.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let config = Self::read_from(path)?;
        config.validate()?;
        Ok(config)
    }

    fn read_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Apply overrides from a variable lookup (the process environment in `load`).
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(base_url) = lookup("HASHNAV_BASE_URL").filter(|v| !v.trim().is_empty()) {
            self.loader.base_url = Some(base_url);
            self.loader.site_root = None;
        }

        if let Some(root) = lookup("HASHNAV_SITE_ROOT").filter(|v| !v.trim().is_empty()) {
            self.loader.site_root = Some(PathBuf::from(root));
            self.loader.base_url = None;
        }

        if let Some(route) = lookup("HASHNAV_DEFAULT_ROUTE").filter(|v| !v.trim().is_empty()) {
            self.default_route = route.trim().to_string();
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_route.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "default_route must not be empty".into(),
            ));
        }

        if !(self.reveal.threshold > 0.0 && self.reveal.threshold <= 1.0) {
            return Err(ConfigError::ValidationError(
                "reveal.threshold must be in (0.0, 1.0]".into(),
            ));
        }

        let mounts = [
            ("main", &self.mounts.main),
            ("sidebar", &self.mounts.sidebar),
            ("header", &self.mounts.header),
            ("footer", &self.mounts.footer),
        ];
        for (name, id) in mounts {
            if id.trim().is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "mounts.{name} must not be empty"
                )));
            }
        }

        if self.mounts.main == self.mounts.sidebar {
            return Err(ConfigError::ValidationError(
                "mounts.main and mounts.sidebar must differ".into(),
            ));
        }

        if self.fragments.not_found.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "fragments.not_found must not be empty".into(),
            ));
        }

        for (route, path) in &self.sidebar.routes {
            if route.trim().is_empty() || path.trim().is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "sidebar.routes entry '{route}' must have a non-empty route and path"
                )));
            }
        }

        self.loader_source().map(|_| ())
    }

    /// Resolve which loader to build. Defaults to the working directory.
    pub fn loader_source(&self) -> Result<LoaderSource, ConfigError> {
        match (&self.loader.base_url, &self.loader.site_root) {
            (Some(_), Some(_)) => Err(ConfigError::ValidationError(
                "loader.base_url and loader.site_root are mutually exclusive".into(),
            )),
            (Some(base_url), None) => {
                if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
                    return Err(ConfigError::ValidationError(
                        "loader.base_url must start with http:// or https://".into(),
                    ));
                }
                Ok(LoaderSource::Http {
                    base_url: base_url.clone(),
                    cache_bust_query: self.loader.cache_bust_query,
                })
            }
            (None, Some(root)) => Ok(LoaderSource::File { root: root.clone() }),
            (None, None) => Ok(LoaderSource::File {
                root: PathBuf::from("."),
            }),
        }
    }

    /// Generate a default config TOML string (for the `init` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            default_route: default_route(),
            site_name: None,
            mounts: MountsConfig::default(),
            fragments: FragmentsConfig::default(),
            sidebar: SidebarConfig::default(),
            titles: TitlesConfig::default(),
            markers: MarkersConfig::default(),
            reveal: RevealConfig::default(),
            loader: LoaderConfig::default(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigError> for hashnav_core::Error {
    fn from(err: ConfigError) -> Self {
        hashnav_core::Error::Config {
            message: err.to_string(),
        }
    }
}
