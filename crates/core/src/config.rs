use std::{env::VarError, path::Path};

use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::debug;

use crate::{
    date::DateStyle,
    error::{ReportViewError, Result},
    page::SlotIds,
    paths::get_config_path,
    render::DEFAULT_EMBED_HOST,
};

pub const ENV_EMBED_HOST: &str = "REPORTVIEW_EMBED_HOST";
pub const ENV_DATE_STYLE: &str = "REPORTVIEW_DATE_STYLE";
pub const ENV_LOG_LEVEL: &str = "REPORTVIEW_LOG_LEVEL";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub embed_host: String,
    pub date_style: DateStyle,
    pub log_level: String,
    pub slots: SlotIds,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            embed_host: DEFAULT_EMBED_HOST.to_string(),
            date_style: DateStyle::default(),
            log_level: "info".to_string(),
            slots: SlotIds::default(),
        }
    }
}

/// Load configuration: defaults, then the config file, then environment.
///
/// An explicit `path` must exist. Without one, the default location is read
/// only if a file is there.
pub async fn load_config(path: Option<&Path>) -> Result<RenderConfig> {
    let config = match path {
        Some(path) => read_config_file(path).await?,
        None => {
            let default_path = get_config_path();
            if fs::try_exists(&default_path).await? {
                read_config_file(&default_path).await?
            } else {
                RenderConfig::default()
            }
        }
    };
    apply_env(config, |key| std::env::var(key))
}

async fn read_config_file(path: &Path) -> Result<RenderConfig> {
    let json_content = fs::read_to_string(path).await?;
    let config: RenderConfig =
        serde_json::from_str(&json_content).map_err(|e| ReportViewError::InvalidConfig {
            reason: format!("{}: {}", path.display(), e),
        })?;
    debug!(path = %path.display(), "loaded config file");
    Ok(config)
}

/// Overlay environment variables read through `lookup`.
pub fn apply_env<F>(mut config: RenderConfig, lookup: F) -> Result<RenderConfig>
where
    F: Fn(&str) -> std::result::Result<String, VarError>,
{
    if let Ok(host) = lookup(ENV_EMBED_HOST) {
        config.embed_host = host;
    }
    if let Ok(style) = lookup(ENV_DATE_STYLE) {
        config.date_style = style.parse()?;
    }
    if let Ok(level) = lookup(ENV_LOG_LEVEL) {
        config.log_level = level;
    }
    validate(&config)?;
    Ok(config)
}

/// Reject settings that would produce broken embed URLs.
pub fn validate(config: &RenderConfig) -> Result<()> {
    let host = config.embed_host.trim();
    if host.is_empty() || host.contains(['/', ' ', '"', '<', '>']) {
        return Err(ReportViewError::InvalidConfig {
            reason: format!("embed_host {:?} is not a bare host name", config.embed_host),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> std::result::Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    #[test]
    fn env_overrides_defaults() {
        let map = HashMap::from([
            (ENV_EMBED_HOST, "www.youtube-nocookie.com"),
            (ENV_DATE_STYLE, "iso"),
            (ENV_LOG_LEVEL, "debug"),
        ]);
        let config = apply_env(RenderConfig::default(), lookup_from_map(&map)).unwrap();
        assert_eq!(config.embed_host, "www.youtube-nocookie.com");
        assert_eq!(config.date_style, DateStyle::Iso);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn empty_env_keeps_defaults() {
        let map = HashMap::new();
        let config = apply_env(RenderConfig::default(), lookup_from_map(&map)).unwrap();
        assert_eq!(config, RenderConfig::default());
    }

    #[test]
    fn bad_values_are_rejected() {
        let map = HashMap::from([(ENV_DATE_STYLE, "klingon")]);
        let err = apply_env(RenderConfig::default(), lookup_from_map(&map)).unwrap_err();
        assert!(matches!(err, ReportViewError::InvalidConfig { .. }));

        let map = HashMap::from([(ENV_EMBED_HOST, "evil.example/\"")]);
        let err = apply_env(RenderConfig::default(), lookup_from_map(&map)).unwrap_err();
        assert!(matches!(err, ReportViewError::InvalidConfig { .. }));
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let config: RenderConfig =
            serde_json::from_str(r#"{"date_style": "de", "slots": {"title": "headline"}}"#)
                .unwrap();
        assert_eq!(config.date_style, DateStyle::De);
        assert_eq!(config.embed_host, DEFAULT_EMBED_HOST);
        assert_eq!(config.slots.title, "headline");
        assert_eq!(config.slots.body, "video-summary");
    }

    #[tokio::test]
    async fn explicit_missing_file_is_an_error() {
        let path = std::env::temp_dir().join("reportview-does-not-exist/config.json");
        let err = load_config(Some(&path)).await.unwrap_err();
        assert!(matches!(err, ReportViewError::IoError(_)));
    }
}
