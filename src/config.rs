use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use orrery_core::{Breakpoints, NodeId, Tuning};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NodeConfig {
    pub id: NodeId,
    pub label: Option<String>,
    pub icon: Option<PathBuf>,
}

impl NodeConfig {
    pub fn new(id: &str, label: &str) -> Self {
        Self {
            id: NodeId::new(id),
            label: Some(label.to_string()),
            icon: None,
        }
    }

    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(self.id.as_str())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "default_nodes")]
    pub nodes: Vec<NodeConfig>,
    #[serde(default)]
    pub media: Option<PathBuf>,
    /// Overrides the desktop's animation setting when present.
    #[serde(default)]
    pub reduced_motion: Option<bool>,
    #[serde(default)]
    pub tuning: Tuning,
    #[serde(default)]
    pub breakpoints: Breakpoints,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            nodes: default_nodes(),
            media: None,
            reduced_motion: None,
            tuning: Tuning::default(),
            breakpoints: Breakpoints::default(),
        }
    }
}

fn default_nodes() -> Vec<NodeConfig> {
    [
        ("vision", "Vision"),
        ("focus", "Focus"),
        ("energy", "Energy"),
        ("clarity", "Clarity"),
        ("resilience", "Resilience"),
        ("flow", "Flow"),
    ]
    .into_iter()
    .map(|(id, label)| NodeConfig::new(id, label))
    .collect()
}

impl Config {
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.iter().map(|n| n.id.clone()).collect()
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "orrery", "orrery").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

pub fn load_config() -> Result<Config, ConfigError> {
    let config_path = get_config_path()?;

    let s = config::Config::builder()
        .add_source(config::File::from(config_path).required(false))
        .add_source(config::Environment::with_prefix("ORRERY").separator("__"))
        .build()?;

    Ok(s.try_deserialize()?)
}

/// Seeds the config file on first run, then loads it. Any failure leaves the
/// built-in ring in place.
pub fn load_or_default() -> Config {
    match write_default_config() {
        Ok(path) => log::debug!("Using config file {}", path.display()),
        Err(e) => log::warn!("Could not create the default config file: {}", e),
    }

    match load_config() {
        Ok(c) => c,
        Err(e) => {
            log::error!("Falling back to the built-in ring: {}", e);
            Config::default()
        }
    }
}

pub fn write_default_config() -> std::io::Result<PathBuf> {
    let path =
        get_config_path().map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

pub const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

use crate::events::AppEvent;
use async_channel::Sender;

pub async fn run_async_watcher(tx: Sender<AppEvent>) {
    let config_path = match get_config_path() {
        Ok(p) => p,
        Err(e) => {
            log::error!("Config watcher error: {}", e);
            return;
        }
    };
    let config_dir = match config_path.parent() {
        Some(p) => p.to_path_buf(),
        None => return,
    };

    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to create watcher: {}", e);
            return;
        }
    };

    if let Err(e) = watcher.watch(&config_dir, RecursiveMode::NonRecursive) {
        log::error!("Failed to watch config directory: {}", e);
        return;
    }

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                let meaningful_event = matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                );

                if meaningful_event
                    && event.paths.iter().any(|p| p == &config_path)
                    && tx.send(AppEvent::ConfigReload).await.is_err()
                {
                    break;
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn parse(toml: &str) -> Config {
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_default_config_file_parses() {
        let config = parse(DEFAULT_CONFIG);
        assert_eq!(config.nodes.len(), 6);
        assert_eq!(config.nodes[0].id, NodeId::new("vision"));
        assert_eq!(config.media, None);
        assert_eq!(config.tuning.lead_time, Duration::from_millis(2500));
        assert_eq!(config.breakpoints.radius_for(800.0).x, 230.0);
        assert!(config.tuning.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse("");
        assert_eq!(config.nodes.len(), 6);
        assert_eq!(config.tuning, Tuning::default());
        assert_eq!(config.reduced_motion, None);
    }

    #[test]
    fn test_node_label_falls_back_to_id() {
        let config = parse(
            r#"
            reduced_motion = true

            [[nodes]]
            id = "solo"
            "#,
        );
        assert_eq!(config.nodes.len(), 1);
        assert_eq!(config.nodes[0].display_label(), "solo");
        assert_eq!(config.reduced_motion, Some(true));
    }

    #[test]
    fn test_node_config_json() {
        let node: NodeConfig =
            serde_json::from_str(r#"{ "id": "flow", "label": "Flow", "icon": null }"#).unwrap();
        assert_eq!(node.id, NodeId::new("flow"));
        assert_eq!(node.display_label(), "Flow");
    }
}
