use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Optional settings loaded from ~/.config/mrkl-agent/settings.json
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AgentSettings {
    pub openweather_api_key: Option<String>,
    pub serpapi_key: Option<String>,
    pub huggingface_api_token: Option<String>,
    pub history_capacity: Option<usize>,
    pub weather_api_url: Option<String>,
    pub weather_mirror_url: Option<String>,
    pub serpapi_url: Option<String>,
    pub wikipedia_api_url: Option<String>,
    pub inference_url: Option<String>,
}

static SETTINGS: OnceLock<AgentSettings> = OnceLock::new();

/// Get the loaded settings, initializing them lazily on first use.
pub fn get_settings() -> &'static AgentSettings {
    SETTINGS.get_or_init(|| {
        let loaded = config_dir().and_then(|dir| load_settings_from(&dir.join("settings.json")));
        match loaded {
            Ok(settings) => settings,
            Err(err) => {
                tracing::warn!("Failed to load settings: {err}");
                AgentSettings::default()
            }
        }
    })
}

/// `$MRKL_AGENT_CONFIG_DIR`, or `~/.config/mrkl-agent`.
pub fn config_dir() -> Result<PathBuf> {
    if let Ok(custom_dir) = std::env::var("MRKL_AGENT_CONFIG_DIR") {
        return Ok(PathBuf::from(custom_dir));
    }
    let home =
        dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;
    Ok(home.join(".config").join("mrkl-agent"))
}

/// Reads a settings file; a missing file yields the defaults.
pub fn load_settings_from(settings_path: &Path) -> Result<AgentSettings> {
    if !settings_path.exists() {
        return Ok(AgentSettings::default());
    }

    let contents = std::fs::read_to_string(settings_path).map_err(|err| {
        tracing::warn!(
            "Failed to read settings from {}: {err}",
            settings_path.display()
        );
        err
    })?;

    let mut settings: AgentSettings = serde_json::from_str(&contents).map_err(|err| {
        tracing::warn!(
            "Failed to parse settings from {}: {err}",
            settings_path.display()
        );
        err
    })?;

    let lookup = |name: &str| std::env::var(name).ok();
    for value in [
        &mut settings.openweather_api_key,
        &mut settings.serpapi_key,
        &mut settings.huggingface_api_token,
    ]
    .into_iter()
    .flatten()
    {
        if let Some(resolved) = substitute_env_vars(value, lookup) {
            *value = resolved;
        }
    }

    Ok(settings)
}

/// Expands `${VAR}` references. Returns `None` when nothing was substituted
/// or a referenced variable is not set.
pub fn substitute_env_vars(input: &str, lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    let mut result = input.to_string();
    let mut changed = false;
    while let Some(start) = result.find("${") {
        let end = result[start..].find('}')?;
        let end = start + end;
        let var_name = &result[start + 2..end];
        let var_value = lookup(var_name)?;
        result.replace_range(start..=end, &var_value);
        changed = true;
    }

    if changed {
        Some(result)
    } else {
        None
    }
}
