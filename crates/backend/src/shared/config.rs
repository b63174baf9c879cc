use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatasetConfig {
    pub path: String,
}

/// Chart sizing knobs.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct DashboardConfig {
    /// Bars in "Top N Most Profitable Sub-Categories".
    #[serde(default = "default_top_products")]
    pub top_products: usize,
    /// Bars in "Top N States by Sales".
    #[serde(default = "default_top_states")]
    pub top_states: usize,
}

fn default_top_products() -> usize {
    3
}

fn default_top_states() -> usize {
    10
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            top_products: default_top_products(),
            top_states: default_top_states(),
        }
    }
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[dataset]
path = "dataset/Super_Store_data.csv"

[dashboard]
top_products = 3
top_states = 10
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                let config: Config = toml::from_str(&contents)?;
                return Ok(config);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    let config: Config = toml::from_str(DEFAULT_CONFIG)?;
    Ok(config)
}

/// Get the dataset file path from configuration.
///
/// Relative paths are tried next to the executable first, then against the
/// current directory.
pub fn get_dataset_path(config: &Config) -> anyhow::Result<PathBuf> {
    let path_str = &config.dataset.path;
    let path = Path::new(path_str);

    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let resolved_path = exe_dir.join(path);
            if resolved_path.exists() {
                return Ok(resolved_path);
            }
        }
    }

    Ok(PathBuf::from(path_str))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config: Result<Config, _> = toml::from_str(DEFAULT_CONFIG);
        assert!(config.is_ok());
        let config = config.unwrap();
        assert_eq!(config.dataset.path, "dataset/Super_Store_data.csv");
        assert_eq!(config.dashboard, DashboardConfig::default());
    }

    #[test]
    fn test_dashboard_section_is_optional() {
        let config: Config = toml::from_str("[dataset]\npath = \"data.csv\"\n").unwrap();
        assert_eq!(config.dashboard.top_products, 3);
        assert_eq!(config.dashboard.top_states, 10);
    }

    #[test]
    fn test_partial_dashboard_section() {
        let config: Config =
            toml::from_str("[dataset]\npath = \"data.csv\"\n[dashboard]\ntop_states = 5\n").unwrap();
        assert_eq!(config.dashboard.top_products, 3);
        assert_eq!(config.dashboard.top_states, 5);
    }

    #[test]
    fn test_absolute_dataset_path_kept() {
        let abs = std::env::temp_dir().join("store.csv");
        let config = Config {
            dataset: DatasetConfig {
                path: abs.to_string_lossy().into_owned(),
            },
            dashboard: DashboardConfig::default(),
        };
        assert_eq!(get_dataset_path(&config).unwrap(), abs);
    }
}
