//! Application configuration
//!
//! Loaded from a TOML file when one exists; every field has a default so
//! the binary runs with no config at all. CLI flags override the file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use voxplay_foundation::error::VoxPlayError;
use voxplay_speech::RecognitionConfig;
use voxplay_tts::TtsConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where the user database lives
    pub store_path: PathBuf,
    pub recognition: RecognitionConfig,
    pub tts: TtsConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from("voxplay-users.json"),
            recognition: RecognitionConfig::default(),
            tts: TtsConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load from `path`. A missing file yields the defaults; a file that
    /// exists but does not parse is an error.
    pub fn load(path: &Path) -> Result<Self, VoxPlayError> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file; using defaults");
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .map_err(|e| VoxPlayError::Config(format!("read {}: {}", path.display(), e)))?;
        let config: AppConfig = toml::from_str(&raw)
            .map_err(|e| VoxPlayError::Config(format!("parse {}: {}", path.display(), e)))?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = AppConfig::load(Path::new("/nonexistent/voxplay.toml")).unwrap();
        assert_eq!(config.recognition.language, "en-US");
        assert!(config.tts.enabled);
    }

    #[test]
    fn partial_toml_keeps_defaults_for_the_rest() {
        let config: AppConfig = toml::from_str(
            r#"
            store_path = "/tmp/users.json"

            [tts]
            enabled = false
            "#,
        )
        .unwrap();
        assert_eq!(config.store_path, PathBuf::from("/tmp/users.json"));
        assert!(!config.tts.enabled);
        assert!(config.recognition.continuous);
    }

    #[test]
    fn bad_toml_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("voxplay.toml");
        std::fs::write(&path, "store_path = [not toml").unwrap();
        let err = AppConfig::load(&path).unwrap_err();
        assert!(matches!(err, VoxPlayError::Config(_)));
    }
}
