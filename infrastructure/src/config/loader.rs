//! Configuration file loader with multi-source merging

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use super::ConfigError;
use super::file_config::FileConfig;

const APP_DIR: &str = "anvil";
const PROJECT_FILES: [&str; 2] = ["anvil.toml", ".anvil.toml"];
const ENV_PREFIX: &str = "ANVIL_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `ANVIL_*` environment variables (`ANVIL_EXECUTION__PARALLEL=false`)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./anvil.toml` or `./.anvil.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/anvil/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&Path>) -> Result<FileConfig, ConfigError> {
        let config: FileConfig = Self::figment(config_path).extract().map_err(Box::new)?;
        config.validate()?;
        Ok(config)
    }

    fn figment(config_path: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load only default configuration (for `--no-config`)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// `$XDG_CONFIG_HOME/anvil/config.toml` (or the platform equivalent)
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }

    /// The project-level config file, if one exists
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Describe the config file locations being used
    pub fn describe_sources(config_path: Option<&Path>) -> Vec<String> {
        let found = |exists: bool| if exists { "[FOUND]" } else { "[     ]" };
        let mut lines = vec!["Configuration sources (in priority order):".to_string()];

        lines.push(format!("  [ENV  ] Environment: {}*", ENV_PREFIX));
        if let Some(path) = config_path {
            lines.push(format!("  {} Explicit: {}", found(path.exists()), path.display()));
        }
        match Self::project_config_path() {
            Some(path) => lines.push(format!("  [FOUND] Project: {}", path.display())),
            None => lines.push(format!("  [     ] Project: ./{}", PROJECT_FILES.join(" or ./"))),
        }
        if let Some(path) = Self::global_config_path() {
            lines.push(format!("  {} Global:  {}", found(path.exists()), path.display()));
        }
        lines.push("  [     ] Default: built-in defaults".to_string());
        lines
    }
}
