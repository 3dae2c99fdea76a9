//! Application configuration: TOML file loading, CLI overrides, and defaults.
//!
//! Resolution order (first found wins, values merge/override):
//! 1. CLI flags (`--config`, `--url`, `--no-mouse`, etc.)
//! 2. `$RFS_CONFIG` environment variable (path to config file)
//! 3. Project-local `.rfs.toml` in the current working directory
//! 4. Global `~/.config/rfs/config.toml`
//! 5. Built-in defaults

use std::path::{Path, PathBuf};

use serde::Deserialize;

// ── Section configs ──────────────────────────────────────────────────────────

/// General application settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct GeneralConfig {
    /// Base URL of the listing service.
    pub server_url: Option<String>,
    /// Path to browse when none is given on startup.
    pub default_root: Option<String>,
    /// Enable mouse support.
    pub mouse: Option<bool>,
}

/// Listing grid settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct UiConfig {
    /// Type-column label for directories.
    pub dir_label: Option<String>,
    /// Type-column label for files.
    pub file_label: Option<String>,
}

/// Color settings for a single theme palette.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ThemeColorsConfig {
    pub list_bg: Option<String>,
    pub list_fg: Option<String>,
    pub list_selected_bg: Option<String>,
    pub list_selected_fg: Option<String>,
    pub dir_fg: Option<String>,
    pub file_fg: Option<String>,
    pub status_bg: Option<String>,
    pub status_fg: Option<String>,
    pub border_fg: Option<String>,
}

/// Theme configuration section.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ThemeConfig {
    /// Color scheme: "dark", "light", "custom".
    pub scheme: Option<String>,
    /// Custom color overrides.
    pub custom: Option<ThemeColorsConfig>,
}

// ── Top-level config ─────────────────────────────────────────────────────────

/// Top-level application configuration.
///
/// All fields are optional so that partial configs from different sources
/// can be merged together (CLI overrides file, file overrides defaults).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub ui: UiConfig,
    pub theme: ThemeConfig,
}

// ── Default constants ────────────────────────────────────────────────────────

/// Default listing service URL.
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8080";
/// Default browse root when neither the CLI nor the config names one.
pub const DEFAULT_ROOT: &str = "/";
/// Default directory label, as rendered by the original web UI.
pub const DEFAULT_DIR_LABEL: &str = "Директория";
/// Default file label, as rendered by the original web UI.
pub const DEFAULT_FILE_LABEL: &str = "Файл";

/// Localized labels for the listing grid's type column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeLabels {
    pub dir: String,
    pub file: String,
}

// ── Config file locator ──────────────────────────────────────────────────────

/// Return the list of candidate config file paths in priority order.
///
/// Does NOT include the CLI `--config` path — that is handled separately.
fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    // 1. $RFS_CONFIG environment variable
    if let Ok(env_path) = std::env::var("RFS_CONFIG") {
        paths.push(PathBuf::from(env_path));
    }

    // 2. Project-local `.rfs.toml` in CWD
    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(".rfs.toml"));
    }

    // 3. Global `~/.config/rfs/config.toml`
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("rfs").join("config.toml"));
    }

    paths
}

/// Try to read and parse a TOML config file. Returns `None` if the file
/// doesn't exist or can't be parsed (with a warning printed to stderr).
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(_) => return None,
    };
    match toml::from_str::<AppConfig>(&content) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            eprintln!(
                "Warning: failed to parse config file {}: {}",
                path.display(),
                e
            );
            None
        }
    }
}

// ── Merge logic ──────────────────────────────────────────────────────────────

impl AppConfig {
    /// Merge `other` on top of `self` — `other`'s `Some` values win.
    pub fn merge(self, other: &AppConfig) -> AppConfig {
        AppConfig {
            general: GeneralConfig {
                server_url: other.general.server_url.clone().or(self.general.server_url),
                default_root: other
                    .general
                    .default_root
                    .clone()
                    .or(self.general.default_root),
                mouse: other.general.mouse.or(self.general.mouse),
            },
            ui: UiConfig {
                dir_label: other.ui.dir_label.clone().or(self.ui.dir_label),
                file_label: other.ui.file_label.clone().or(self.ui.file_label),
            },
            theme: ThemeConfig {
                scheme: other.theme.scheme.clone().or(self.theme.scheme),
                custom: match (&self.theme.custom, &other.theme.custom) {
                    (_, Some(o)) => Some(o.clone()),
                    (Some(s), None) => Some(s.clone()),
                    (None, None) => None,
                },
            },
        }
    }

    /// Load the final merged configuration.
    ///
    /// `cli_config_path` is an explicit config file path from `--config`.
    /// `cli_overrides` are partial overrides derived from CLI flags.
    pub fn load(cli_config_path: Option<&Path>, cli_overrides: Option<&AppConfig>) -> AppConfig {
        // Start with built-in defaults (all None — the struct Default).
        let mut config = AppConfig::default();

        // Load from candidate files (lowest priority first so higher overwrites).
        let paths = candidate_paths();
        // Walk in reverse so that highest-priority (env var) overwrites lower.
        for path in paths.iter().rev() {
            if let Some(file_cfg) = load_file(path) {
                config = config.merge(&file_cfg);
            }
        }

        // Explicit --config file has higher priority than candidates.
        if let Some(cli_path) = cli_config_path {
            if let Some(file_cfg) = load_file(cli_path) {
                config = config.merge(&file_cfg);
            }
        }

        // CLI flag overrides are highest priority.
        if let Some(overrides) = cli_overrides {
            config = config.merge(overrides);
        }

        config
    }

    // ── Convenience getters with built-in defaults ──────────────────────────

    /// Base URL of the listing service.
    pub fn server_url(&self) -> &str {
        self.general.server_url.as_deref().unwrap_or(DEFAULT_SERVER_URL)
    }

    /// Path to browse when startup names none.
    pub fn default_root(&self) -> &str {
        self.general.default_root.as_deref().unwrap_or(DEFAULT_ROOT)
    }

    /// Whether mouse support is enabled.
    pub fn mouse_enabled(&self) -> bool {
        self.general.mouse.unwrap_or(true)
    }

    /// Localized labels for the type column.
    pub fn type_labels(&self) -> TypeLabels {
        TypeLabels {
            dir: self
                .ui
                .dir_label
                .clone()
                .unwrap_or_else(|| DEFAULT_DIR_LABEL.to_string()),
            file: self
                .ui
                .file_label
                .clone()
                .unwrap_or_else(|| DEFAULT_FILE_LABEL.to_string()),
        }
    }

}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.server_url(), "http://127.0.0.1:8080");
        assert_eq!(cfg.default_root(), "/");
        assert!(cfg.mouse_enabled());
        assert!(cfg.theme.scheme.is_none());
    }

    #[test]
    fn test_default_labels_match_original_ui() {
        let labels = AppConfig::default().type_labels();
        assert_eq!(labels.dir, "Директория");
        assert_eq!(labels.file, "Файл");
    }

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
            [general]
            server_url = "http://files.local:9000"
            default_root = "/home/danil"
            mouse = false

            [ui]
            dir_label = "Directory"
            file_label = "File"

            [theme]
            scheme = "light"
        "#;
        let cfg: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.server_url(), "http://files.local:9000");
        assert_eq!(cfg.default_root(), "/home/danil");
        assert!(!cfg.mouse_enabled());
        assert_eq!(cfg.type_labels().dir, "Directory");
        assert_eq!(cfg.theme.scheme.as_deref(), Some("light"));
    }

    #[test]
    fn test_parse_partial_config_keeps_defaults() {
        let toml_str = r#"
            [general]
            default_root = "/srv"
        "#;
        let cfg: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.default_root(), "/srv");
        assert_eq!(cfg.server_url(), DEFAULT_SERVER_URL);
        assert_eq!(cfg.type_labels().file, DEFAULT_FILE_LABEL);
    }

    #[test]
    fn test_merge_other_wins() {
        let base: AppConfig = toml::from_str(
            r#"
            [general]
            server_url = "http://base:1"
            default_root = "/base"
        "#,
        )
        .unwrap();
        let over: AppConfig = toml::from_str(
            r#"
            [general]
            server_url = "http://over:2"
        "#,
        )
        .unwrap();
        let merged = base.merge(&over);
        assert_eq!(merged.server_url(), "http://over:2");
        // Fields absent from the override keep the base value.
        assert_eq!(merged.default_root(), "/base");
    }

    #[test]
    fn test_merge_custom_theme_replaced_wholesale() {
        let base: AppConfig = toml::from_str(
            r##"
            [theme]
            scheme = "custom"
            [theme.custom]
            dir_fg = "#112233"
        "##,
        )
        .unwrap();
        let over: AppConfig = toml::from_str(
            r##"
            [theme.custom]
            file_fg = "#445566"
        "##,
        )
        .unwrap();
        let merged = base.merge(&over);
        let custom = merged.theme.custom.unwrap();
        assert_eq!(custom.file_fg.as_deref(), Some("#445566"));
        // The override's custom block replaces the base block entirely.
        assert!(custom.dir_fg.is_none());
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let toml_str = r#"
            [general]
            server_url = "http://x:1"
            unknown_key = 42
        "#;
        let cfg: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.server_url(), "http://x:1");
    }
}
