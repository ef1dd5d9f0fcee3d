use std::{env, path::PathBuf};

use super::schema::Settings;

const HISTORY_FILE_NAME: &str = "conversion-history.json";

/// Configuration loading helpers.
///
/// `Settings::load` tries environment variables first (prefix `RECAST__`), then an
/// optional config file and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("RECAST")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if self.conversion.sample_rate == 0 {
            return Err("conversion.sample_rate must be >= 1".to_string());
        }
        if self.conversion.channel_count == 0 {
            return Err("conversion.channel_count must be >= 1".to_string());
        }
        Ok(())
    }

    /// The history file the tracker should use.
    pub fn history_path(&self) -> PathBuf {
        self.tracker
            .history_path
            .clone()
            .or_else(default_history_path)
            .unwrap_or_else(|| PathBuf::from(HISTORY_FILE_NAME))
    }
}

/// Resolve the config path from `RECAST_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("RECAST_CONFIG_PATH") {
        let p = PathBuf::from(p);
        return Some(p);
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/recast/config.toml`
/// or `~/.config/recast/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    xdg_dir("XDG_CONFIG_HOME", ".config").map(|d| d.join("recast").join("config.toml"))
}

/// Compute the default history path under `$XDG_DATA_HOME/recast/`
/// or `~/.local/share/recast/` when `XDG_DATA_HOME` is not set.
pub fn default_history_path() -> Option<PathBuf> {
    xdg_dir("XDG_DATA_HOME", ".local/share").map(|d| d.join("recast").join(HISTORY_FILE_NAME))
}

fn xdg_dir(var: &str, home_fallback: &str) -> Option<PathBuf> {
    if let Some(xdg) = env::var_os(var) {
        let xdg = PathBuf::from(xdg);
        if !xdg.as_os_str().is_empty() {
            return Some(xdg);
        }
    }
    env::var_os("HOME").map(|home| PathBuf::from(home).join(home_fallback))
}
