//! Configuration loader for ShiftDesk.
//!
//! Reads `config.toml` from the data directory (`~/.shiftdesk/` in
//! production) and deserializes it into [`DraftsConfig`]. Falls back to
//! defaults when the file is missing or malformed.

use std::path::Path;

use shiftdesk_types::config::DraftsConfig;

/// Smallest accepted autosave delay; anything lower saves on every keystroke.
const MIN_AUTOSAVE_DELAY_MS: u64 = 50;

/// Load configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`DraftsConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - Otherwise returns the parsed config, with the autosave delay clamped
///   to a sane minimum.
pub async fn load_drafts_config(data_dir: &Path) -> DraftsConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return DraftsConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return DraftsConfig::default();
        }
    };

    match toml::from_str::<DraftsConfig>(&content) {
        Ok(mut config) => {
            if config.autosave_delay_ms < MIN_AUTOSAVE_DELAY_MS {
                tracing::warn!(
                    configured = config.autosave_delay_ms,
                    minimum = MIN_AUTOSAVE_DELAY_MS,
                    "autosave_delay_ms too low, clamping"
                );
                config.autosave_delay_ms = MIN_AUTOSAVE_DELAY_MS;
            }
            config
        }
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            DraftsConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_drafts_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_drafts_config(tmp.path()).await;
        assert_eq!(config, DraftsConfig::default());
        assert_eq!(config.storage_key, "report-drafts");
    }

    #[tokio::test]
    async fn load_drafts_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            r#"
autosave_delay_ms = 500
storage_key = "kiosk-drafts"
"#,
        )
        .await
        .unwrap();

        let config = load_drafts_config(tmp.path()).await;
        assert_eq!(config.autosave_delay_ms, 500);
        assert_eq!(config.storage_key, "kiosk-drafts");
        assert_eq!(config.max_value_bytes, DraftsConfig::default().max_value_bytes);
    }

    #[tokio::test]
    async fn load_drafts_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_drafts_config(tmp.path()).await;
        assert_eq!(config, DraftsConfig::default());
    }

    #[tokio::test]
    async fn load_drafts_config_clamps_tiny_delay() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "autosave_delay_ms = 0")
            .await
            .unwrap();

        let config = load_drafts_config(tmp.path()).await;
        assert_eq!(config.autosave_delay_ms, MIN_AUTOSAVE_DELAY_MS);
    }
}
