//! Application configuration: TOML file loading, CLI overrides, and defaults.
//!
//! Resolution order (first found wins, values merge/override):
//! 1. CLI flags (`--external`, `--no-delete`, `--config`, etc.)
//! 2. `$FL_CONFIG` environment variable (path to config file)
//! 3. Project-local `.fl.toml` in the current working directory
//! 4. Global `~/.config/fl/config.toml`
//! 5. Built-in defaults

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::fs::backup::DEFAULT_BACKUP_DIR;

// ── Section configs ──────────────────────────────────────────────────────────

/// General application settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct GeneralConfig {
    /// Open files with the system opener instead of the editor.
    pub external: Option<bool>,
    /// Allow the delete key.
    pub allow_delete: Option<bool>,
    /// Editor command; falls back to `$EDITOR`.
    pub editor: Option<String>,
}

/// Undo backup settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct BackupConfig {
    /// Mirror root for deleted files.
    pub dir: Option<String>,
}

/// Log sink settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct LogConfig {
    /// Log file path.
    pub file: Option<String>,
}

/// Color overrides for the `custom` scheme.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ThemeColorsConfig {
    pub file_fg: Option<String>,
    pub dir_fg: Option<String>,
    pub symlink_fg: Option<String>,
    pub other_fg: Option<String>,
    pub selected_bg: Option<String>,
    pub selected_fg: Option<String>,
    pub status_bg: Option<String>,
    pub status_fg: Option<String>,
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
    pub backup: BackupConfig,
    pub log: LogConfig,
    pub theme: ThemeConfig,
}

// ── Config file locator ──────────────────────────────────────────────────────

/// Return the list of candidate config file paths in priority order.
///
/// Does NOT include the CLI `--config` path; `load` handles that separately.
fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(env_path) = std::env::var("FL_CONFIG") {
        paths.push(PathBuf::from(env_path));
    }

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(".fl.toml"));
    }

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("fl").join("config.toml"));
    }

    paths
}

/// Try to read and parse a TOML config file. Returns `None` if the file
/// doesn't exist or can't be parsed (with a warning printed to stderr).
///
/// This runs before the terminal is taken over, so stderr is still visible.
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = std::fs::read_to_string(path).ok()?;
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
    /// Merge `other` on top of `self`; `Some` values in `other` win.
    pub fn merge(self, other: &AppConfig) -> AppConfig {
        AppConfig {
            general: GeneralConfig {
                external: other.general.external.or(self.general.external),
                allow_delete: other.general.allow_delete.or(self.general.allow_delete),
                editor: other.general.editor.clone().or(self.general.editor),
            },
            backup: BackupConfig {
                dir: other.backup.dir.clone().or(self.backup.dir),
            },
            log: LogConfig {
                file: other.log.file.clone().or(self.log.file),
            },
            theme: ThemeConfig {
                scheme: other.theme.scheme.clone().or(self.theme.scheme),
                custom: other.theme.custom.clone().or(self.theme.custom),
            },
        }
    }

    /// Load the final merged configuration.
    ///
    /// `cli_config_path` is an explicit config file path from `--config`.
    /// `cli_overrides` are partial overrides derived from CLI flags.
    pub fn load(cli_config_path: Option<&Path>, cli_overrides: Option<&AppConfig>) -> AppConfig {
        let mut config = AppConfig::default();

        // Walk in reverse so that highest-priority (env var) overwrites lower.
        for path in candidate_paths().iter().rev() {
            if let Some(file_cfg) = load_file(path) {
                config = config.merge(&file_cfg);
            }
        }

        if let Some(cli_path) = cli_config_path {
            if let Some(file_cfg) = load_file(cli_path) {
                config = config.merge(&file_cfg);
            }
        }

        if let Some(overrides) = cli_overrides {
            config = config.merge(overrides);
        }

        config
    }

    // ── Convenience getters with built-in defaults ──────────────────────────

    /// Whether files open with the system opener.
    pub fn open_external(&self) -> bool {
        self.general.external.unwrap_or(false)
    }

    /// Whether the delete key is enabled.
    pub fn allow_delete(&self) -> bool {
        self.general.allow_delete.unwrap_or(true)
    }

    /// Editor command: config value, then `$EDITOR`.
    pub fn editor(&self) -> Option<String> {
        self.general
            .editor
            .clone()
            .or_else(|| std::env::var("EDITOR").ok())
    }

    /// Backup mirror root.
    pub fn backup_dir(&self) -> PathBuf {
        PathBuf::from(self.backup.dir.as_deref().unwrap_or(DEFAULT_BACKUP_DIR))
    }

    /// Log file path: config value, then `<state dir>/fl/fl.log`.
    pub fn log_file(&self) -> PathBuf {
        if let Some(file) = &self.log.file {
            return PathBuf::from(file);
        }
        let state = dirs::state_dir()
            .or_else(|| dirs::home_dir().map(|h| h.join(".local").join("state")))
            .unwrap_or_else(|| PathBuf::from("."));
        state.join("fl").join("fl.log")
    }

    /// Theme scheme: "dark", "light", or "custom".
    pub fn theme_scheme(&self) -> &str {
        self.theme.scheme.as_deref().unwrap_or("dark")
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_values() {
        let cfg = AppConfig::default();
        assert!(!cfg.open_external());
        assert!(cfg.allow_delete());
        assert_eq!(cfg.backup_dir(), PathBuf::from("/tmp/fl-backup"));
        assert!(cfg.log_file().ends_with("fl/fl.log"));
        assert_eq!(cfg.theme_scheme(), "dark");
    }

    #[test]
    fn test_toml_parsing_full() {
        let toml = r#"
[general]
external = true
allow_delete = false
editor = "hx"

[backup]
dir = "/var/tmp/fl"

[log]
file = "/tmp/fl-test.log"

[theme]
scheme = "light"
"#;
        let cfg: AppConfig = toml::from_str(toml).expect("parse failed");
        assert!(cfg.open_external());
        assert!(!cfg.allow_delete());
        assert_eq!(cfg.editor().as_deref(), Some("hx"));
        assert_eq!(cfg.backup_dir(), PathBuf::from("/var/tmp/fl"));
        assert_eq!(cfg.log_file(), PathBuf::from("/tmp/fl-test.log"));
        assert_eq!(cfg.theme_scheme(), "light");
    }

    #[test]
    fn test_toml_parsing_partial() {
        let toml = r#"
[general]
allow_delete = false
"#;
        let cfg: AppConfig = toml::from_str(toml).expect("parse failed");
        assert!(!cfg.allow_delete());
        assert!(!cfg.open_external());
        assert_eq!(cfg.backup_dir(), PathBuf::from(DEFAULT_BACKUP_DIR));
    }

    #[test]
    fn test_toml_parsing_empty() {
        let cfg: AppConfig = toml::from_str("").expect("parse failed");
        assert!(cfg.allow_delete());
    }

    #[test]
    fn test_merge_overrides() {
        let base = AppConfig {
            general: GeneralConfig {
                external: Some(false),
                allow_delete: Some(true),
                ..Default::default()
            },
            backup: BackupConfig {
                dir: Some("/a".into()),
            },
            ..Default::default()
        };

        let over = AppConfig {
            general: GeneralConfig {
                external: Some(true),
                ..Default::default()
            },
            ..Default::default()
        };

        let merged = base.merge(&over);
        assert!(merged.open_external()); // overridden
        assert!(merged.allow_delete()); // from base
        assert_eq!(merged.backup_dir(), PathBuf::from("/a")); // from base
    }

    #[test]
    fn test_merge_none_does_not_clear_some() {
        let base = AppConfig {
            log: LogConfig {
                file: Some("/x.log".into()),
            },
            ..Default::default()
        };
        let merged = base.merge(&AppConfig::default());
        assert_eq!(merged.log_file(), PathBuf::from("/x.log"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg_path = dir.path().join("test-config.toml");
        let mut f = std::fs::File::create(&cfg_path).expect("create");
        writeln!(
            f,
            r#"
[general]
external = true

[backup]
dir = "/srv/backup"
"#
        )
        .expect("write");

        let cfg = load_file(&cfg_path).expect("load");
        assert!(cfg.open_external());
        assert_eq!(cfg.backup_dir(), PathBuf::from("/srv/backup"));
        assert!(cfg.allow_delete());
    }

    #[test]
    fn test_load_missing_file() {
        assert!(load_file(Path::new("/nonexistent/config.toml")).is_none());
    }

    #[test]
    fn test_load_invalid_toml_returns_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg_path = dir.path().join("bad.toml");
        std::fs::write(&cfg_path, "this is { not valid toml").expect("write");
        assert!(load_file(&cfg_path).is_none());
    }

    #[test]
    fn test_load_with_cli_overrides() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg_path = dir.path().join("config.toml");
        std::fs::write(
            &cfg_path,
            r#"
[general]
external = true
allow_delete = true
"#,
        )
        .expect("write");

        let cli_overrides = AppConfig {
            general: GeneralConfig {
                allow_delete: Some(false),
                ..Default::default()
            },
            ..Default::default()
        };

        let cfg = AppConfig::load(Some(&cfg_path), Some(&cli_overrides));
        assert!(!cfg.allow_delete());
        assert!(cfg.open_external());
    }

    #[test]
    fn test_theme_custom_colors() {
        let toml = r##"
[theme]
scheme = "custom"

[theme.custom]
dir_fg = "#1a1b26"
selected_bg = "#c0caf5"
"##;
        let cfg: AppConfig = toml::from_str(toml).expect("parse");
        assert_eq!(cfg.theme_scheme(), "custom");
        let custom = cfg.theme.custom.as_ref().expect("custom present");
        assert_eq!(custom.dir_fg.as_deref(), Some("#1a1b26"));
        assert_eq!(custom.selected_bg.as_deref(), Some("#c0caf5"));
        assert!(custom.status_bg.is_none());
    }
}
