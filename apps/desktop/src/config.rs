use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use client_core::{ControllerConfig, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_SUCCESS_CLEAR_AFTER};
use serde::Deserialize;
use tracing::warn;

pub const DEFAULT_CONFIG_FILE: &str = "cartoonize.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_url: String,
    /// `0` disables the size check.
    pub max_upload_bytes: u64,
    /// `0` keeps success messages until replaced.
    pub success_clear_after_ms: u64,
    pub request_timeout_secs: Option<u64>,
    pub output_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".into(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            success_clear_after_ms: DEFAULT_SUCCESS_CLEAR_AFTER.as_millis() as u64,
            request_timeout_secs: None,
            output_dir: PathBuf::from("."),
        }
    }
}

impl Settings {
    pub fn controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            max_upload_bytes: (self.max_upload_bytes > 0).then_some(self.max_upload_bytes),
            success_clear_after: (self.success_clear_after_ms > 0)
                .then(|| Duration::from_millis(self.success_clear_after_ms)),
            scroll_errors_into_view: true,
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    server_url: Option<String>,
    max_upload_bytes: Option<u64>,
    success_clear_after_ms: Option<u64>,
    request_timeout_secs: Option<u64>,
    output_dir: Option<PathBuf>,
}

pub fn load_settings(config_path: &Path) -> Settings {
    load_settings_from(config_path, |name| std::env::var(name).ok())
}

/// Defaults, then the TOML file if it exists and parses, then environment
/// variables (`CARTOONIZE_*`, with `APP__*` taking precedence).
pub fn load_settings_from(
    config_path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(config_path) {
        match toml::from_str::<FileSettings>(&raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.server_url {
                    settings.server_url = v;
                }
                if let Some(v) = file_cfg.max_upload_bytes {
                    settings.max_upload_bytes = v;
                }
                if let Some(v) = file_cfg.success_clear_after_ms {
                    settings.success_clear_after_ms = v;
                }
                if let Some(v) = file_cfg.request_timeout_secs {
                    settings.request_timeout_secs = Some(v);
                }
                if let Some(v) = file_cfg.output_dir {
                    settings.output_dir = v;
                }
            }
            Err(err) => warn!(
                path = %config_path.display(),
                error = %err,
                "config: ignoring unparseable settings file"
            ),
        }
    }

    for name in ["CARTOONIZE_SERVER_URL", "APP__SERVER_URL"] {
        if let Some(v) = env(name) {
            settings.server_url = v;
        }
    }
    for name in ["CARTOONIZE_MAX_UPLOAD_BYTES", "APP__MAX_UPLOAD_BYTES"] {
        if let Some(parsed) = env(name).and_then(|v| v.parse::<u64>().ok()) {
            settings.max_upload_bytes = parsed;
        }
    }
    for name in [
        "CARTOONIZE_SUCCESS_CLEAR_AFTER_MS",
        "APP__SUCCESS_CLEAR_AFTER_MS",
    ] {
        if let Some(parsed) = env(name).and_then(|v| v.parse::<u64>().ok()) {
            settings.success_clear_after_ms = parsed;
        }
    }
    for name in ["CARTOONIZE_REQUEST_TIMEOUT_SECS", "APP__REQUEST_TIMEOUT_SECS"] {
        if let Some(parsed) = env(name).and_then(|v| v.parse::<u64>().ok()) {
            settings.request_timeout_secs = Some(parsed);
        }
    }
    for name in ["CARTOONIZE_OUTPUT_DIR", "APP__OUTPUT_DIR"] {
        if let Some(v) = env(name) {
            settings.output_dir = PathBuf::from(v);
        }
    }

    settings
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn defaults_apply_without_file_or_env() {
        let dir = tempfile::tempdir().expect("tempdir");
        let settings = load_settings_from(&dir.path().join("missing.toml"), no_env);
        assert_eq!(settings, Settings::default());

        let config = settings.controller_config();
        assert_eq!(config.max_upload_bytes, Some(10 * 1024 * 1024));
        assert_eq!(config.success_clear_after, Some(Duration::from_secs(4)));
        assert_eq!(settings.request_timeout(), None);
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("cartoonize.toml");
        fs::write(
            &path,
            "server_url = \"http://toon.local:8080\"\nmax_upload_bytes = 0\nrequest_timeout_secs = 30\n",
        )
        .expect("write config");

        let settings = load_settings_from(&path, no_env);
        assert_eq!(settings.server_url, "http://toon.local:8080");
        assert_eq!(settings.controller_config().max_upload_bytes, None);
        assert_eq!(settings.request_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn env_overrides_file_and_app_prefix_wins() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("cartoonize.toml");
        fs::write(&path, "server_url = \"http://from-file:5000\"\n").expect("write config");

        let env: HashMap<&str, &str> = HashMap::from([
            ("CARTOONIZE_SERVER_URL", "http://from-env:5000"),
            ("APP__SERVER_URL", "http://from-app-env:5000"),
            ("CARTOONIZE_SUCCESS_CLEAR_AFTER_MS", "3000"),
            ("CARTOONIZE_MAX_UPLOAD_BYTES", "not-a-number"),
        ]);
        let settings = load_settings_from(&path, |name| env.get(name).map(|v| v.to_string()));

        assert_eq!(settings.server_url, "http://from-app-env:5000");
        assert_eq!(
            settings.controller_config().success_clear_after,
            Some(Duration::from_secs(3))
        );
        assert_eq!(settings.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
    }

    #[test]
    fn unparseable_file_is_ignored() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("cartoonize.toml");
        fs::write(&path, "server_url = [").expect("write config");

        assert_eq!(load_settings_from(&path, no_env), Settings::default());
    }
}
