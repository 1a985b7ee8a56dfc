use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::geometry::SurfaceSize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigPathError {
    #[error("neither XDG_CONFIG_HOME nor HOME is set")]
    MissingHomeDirectory,
}

const APP_DIR: &str = "yeti-goggles";
const APP_CONFIG_FILE: &str = "config.json";

pub const DEFAULT_OVERLAY_PATH: &str = "assets/goggles.png";
pub const DEFAULT_EXPORT_FILE_NAME: &str = "yeti-profile.png";
pub const DEFAULT_SURFACE_SIZE: u32 = 400;

/// Application-level settings from `config.json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub overlay_path: Option<PathBuf>,
    #[serde(default)]
    pub export_file_name: Option<String>,
    #[serde(default)]
    pub export_dir: Option<PathBuf>,
    #[serde(default)]
    pub surface_size: Option<u32>,
}

impl AppConfig {
    pub fn overlay_path(&self) -> PathBuf {
        self.overlay_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OVERLAY_PATH))
    }

    pub fn export_file_name(&self) -> &str {
        self.export_file_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(DEFAULT_EXPORT_FILE_NAME)
    }

    /// Side of the square surface, kept within `1..=65535`.
    pub fn surface_size(&self) -> SurfaceSize {
        SurfaceSize::square(
            self.surface_size
                .unwrap_or(DEFAULT_SURFACE_SIZE)
                .clamp(1, u32::from(u16::MAX)),
        )
    }
}

pub fn load_app_config() -> AppConfig {
    let (xdg_config_home, home) = config_env_dirs();
    load_app_config_with(xdg_config_home.as_deref(), home.as_deref())
}

fn load_app_config_with(xdg_config_home: Option<&Path>, home: Option<&Path>) -> AppConfig {
    let path = match app_config_path(APP_DIR, APP_CONFIG_FILE, xdg_config_home, home) {
        Ok(p) => p,
        Err(err) => {
            tracing::debug!(%err, "no config directory; using defaults");
            return AppConfig::default();
        }
    };
    if !path.exists() {
        return AppConfig::default();
    }
    match std::fs::read_to_string(&path) {
        Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|err| {
            tracing::warn!(?err, ?path, "failed to parse config.json; using defaults");
            AppConfig::default()
        }),
        Err(err) => {
            tracing::warn!(?err, ?path, "failed to read config.json; using defaults");
            AppConfig::default()
        }
    }
}

pub(crate) fn config_env_dirs() -> (Option<PathBuf>, Option<PathBuf>) {
    (
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

pub(crate) fn app_config_path(
    app_dir: &str,
    file_name: &str,
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    let mut path = config_root(xdg_config_home, home)?;
    path.push(app_dir);
    path.push(file_name);
    Ok(path)
}

fn config_root(
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    if let Some(xdg) = xdg_config_home.filter(|path| !path.as_os_str().is_empty()) {
        return Ok(xdg.to_path_buf());
    }

    let home = home.ok_or(ConfigPathError::MissingHomeDirectory)?;
    Ok(home.join(".config"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_config_root(name: &str) -> PathBuf {
        let root = std::env::temp_dir().join(format!("yeti-goggles-config-{name}"));
        let _ = std::fs::remove_dir_all(&root);
        std::fs::create_dir_all(root.join(APP_DIR)).expect("create config dir");
        root
    }

    #[test]
    fn app_config_path_prefers_xdg_config_home() {
        let path = app_config_path(
            "yeti-goggles",
            "config.json",
            Some(Path::new("/tmp/config-root")),
            Some(Path::new("/tmp/home")),
        )
        .expect("path should resolve");

        assert_eq!(
            path,
            PathBuf::from("/tmp/config-root/yeti-goggles/config.json")
        );
    }

    #[test]
    fn app_config_path_falls_back_to_home_dot_config() {
        let path = app_config_path(
            "yeti-goggles",
            "config.json",
            Some(Path::new("")),
            Some(Path::new("/tmp/home")),
        )
        .expect("path should resolve");

        assert_eq!(
            path,
            PathBuf::from("/tmp/home/.config/yeti-goggles/config.json")
        );
    }

    #[test]
    fn app_config_path_errors_when_home_missing_and_xdg_unset() {
        let error = app_config_path("yeti-goggles", "config.json", None, None).unwrap_err();
        assert_eq!(error, ConfigPathError::MissingHomeDirectory);
        assert_eq!(error.to_string(), "neither XDG_CONFIG_HOME nor HOME is set");
    }

    #[test]
    fn surface_size_is_capped_at_renderer_limit() {
        let config = AppConfig {
            surface_size: Some(100_000),
            ..AppConfig::default()
        };
        assert_eq!(config.surface_size(), SurfaceSize::square(65_535));
    }

    #[test]
    fn defaults_apply_when_fields_are_absent() {
        let config = AppConfig::default();
        assert_eq!(config.overlay_path(), PathBuf::from(DEFAULT_OVERLAY_PATH));
        assert_eq!(config.export_file_name(), DEFAULT_EXPORT_FILE_NAME);
        assert_eq!(config.surface_size(), SurfaceSize::square(400));
    }

    #[test]
    fn load_app_config_reads_overrides() {
        let root = scratch_config_root("overrides");
        std::fs::write(
            root.join(APP_DIR).join(APP_CONFIG_FILE),
            r#"{"overlay_path": "/opt/goggles.png", "export_file_name": "me.png", "surface_size": 0}"#,
        )
        .expect("write config");

        let config = load_app_config_with(Some(&root), None);
        assert_eq!(config.overlay_path(), PathBuf::from("/opt/goggles.png"));
        assert_eq!(config.export_file_name(), "me.png");
        assert_eq!(config.surface_size(), SurfaceSize::square(1));
        assert!(config.export_dir.is_none());

        let _ = std::fs::remove_dir_all(root);
    }

    #[test]
    fn load_app_config_falls_back_on_malformed_json() {
        let root = scratch_config_root("malformed");
        std::fs::write(root.join(APP_DIR).join(APP_CONFIG_FILE), "{ not json")
            .expect("write config");

        let config = load_app_config_with(Some(&root), None);
        assert!(config.overlay_path.is_none());
        assert_eq!(config.export_file_name(), DEFAULT_EXPORT_FILE_NAME);

        let _ = std::fs::remove_dir_all(root);
    }
}
