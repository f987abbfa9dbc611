//! Application settings with persistence.
//!
//! Settings are stored as JSON in the platform config directory
//! (`~/.config/lazyeth/settings.json` on Linux). The API credential for
//! hosted endpoints is deliberately not part of the settings file; it is
//! read from the environment on startup and kept out of the UI entirely.

use color_eyre::Result;
use color_eyre::eyre::eyre;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::constants::API_KEY_ENV_VAR;
use crate::ethereum::Network;

const APP_DIR: &str = "lazyeth";
const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppSettings {
    /// The currently selected network.
    pub selected_network: Network,
    /// User-defined custom RPC endpoints. Built-in networks are implicit.
    #[serde(default)]
    pub custom_networks: Vec<Network>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            selected_network: Network::Mainnet,
            custom_networks: Vec::new(),
        }
    }
}

impl AppSettings {
    /// All selectable networks: the built-ins followed by custom endpoints.
    pub fn available_networks(&self) -> Vec<Network> {
        let mut networks = vec![Network::Mainnet, Network::Sepolia, Network::Localnet];
        networks.extend(self.custom_networks.iter().cloned());
        networks
    }
}

fn settings_path() -> Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| eyre!("no config directory on this platform"))?;
    Ok(base.join(APP_DIR).join(SETTINGS_FILE))
}

/// Loads settings from disk, falling back to defaults if the file is
/// missing or unreadable. A broken settings file is never fatal.
pub fn load_settings() -> AppSettings {
    let Ok(path) = settings_path() else {
        return AppSettings::default();
    };
    match fs::read_to_string(&path) {
        Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::debug!("Settings file unreadable, using defaults: {e}");
            AppSettings::default()
        }),
        Err(_) => AppSettings::default(),
    }
}

/// Persists the settings, creating the config directory if needed.
pub fn save_settings(settings: &AppSettings) -> Result<()> {
    let path = settings_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let raw = serde_json::to_string_pretty(settings)?;
    fs::write(&path, raw)?;
    Ok(())
}

/// Updates the selected network and persists the change.
pub fn set_selected_network(settings: &mut AppSettings, network: Network) -> Result<()> {
    settings.selected_network = network;
    save_settings(settings)
}

/// Reads the hosted-endpoint API credential from the environment.
///
/// Returns `None` when unset or blank; the client then falls back to the
/// public demo tier.
pub fn api_key_from_env() -> Option<String> {
    std::env::var(API_KEY_ENV_VAR)
        .ok()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = AppSettings::default();
        assert_eq!(settings.selected_network, Network::Mainnet);
        assert!(settings.custom_networks.is_empty());
    }

    #[test]
    fn test_available_networks_includes_customs() {
        let custom = Network::Custom {
            name: "Anvil".to_string(),
            rpc_url: "http://127.0.0.1:9545".to_string(),
        };
        let settings = AppSettings {
            selected_network: Network::Sepolia,
            custom_networks: vec![custom.clone()],
        };

        let available = settings.available_networks();
        assert_eq!(available.len(), 4);
        assert_eq!(available[0], Network::Mainnet);
        assert_eq!(available[3], custom);
    }

    #[test]
    fn test_settings_round_trip_through_json() {
        let settings = AppSettings {
            selected_network: Network::Localnet,
            custom_networks: vec![Network::Custom {
                name: "Fork".to_string(),
                rpc_url: "http://localhost:8546".to_string(),
            }],
        };

        let raw = serde_json::to_string(&settings).unwrap();
        let restored: AppSettings = serde_json::from_str(&raw).unwrap();
        assert_eq!(restored, settings);
    }
}
