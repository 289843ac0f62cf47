//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "gov-arena";
const PROJECT_FILES: [&str; 2] = ["arena.toml", ".arena.toml"];
/// `GOV_ARENA_DEBATE__MAX_ATTEMPTS=5` overrides `debate.max_attempts`
const ENV_PREFIX: &str = "GOV_ARENA_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `GOV_ARENA_<SECTION>__<KEY>` environment variables
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./arena.toml` or `./.arena.toml`
    /// 4. XDG config: `$XDG_CONFIG_HOME/gov-arena/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(&path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(Box::new)
    }

    /// Load a single file over the defaults, ignoring every other source
    pub fn load_file(path: &Path) -> Result<FileConfig, Box<figment::Error>> {
        Figment::new()
            .merge(Serialized::defaults(FileConfig::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(Box::new)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/gov-arena/config.toml if set,
    /// otherwise falls back to ~/.config/gov-arena/config.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources() {
        println!("Configuration sources (in priority order):");

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./arena.toml or ./.arena.toml");
        }

        if let Some(path) = Self::global_config_path() {
            if path.exists() {
                println!("  [FOUND] Global:  {}", path.display());
            } else {
                println!("  [     ] Global:  {}", path.display());
            }
        }

        println!("  [     ] Default: built-in defaults");
        println!("Environment overrides: {}<SECTION>__<KEY>", ENV_PREFIX);
    }
}
