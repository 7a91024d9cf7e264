// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::load_config::{find_in_parent, resolve_config_path};
use alloy_primitives::Address;
use anyhow::Result;
use figment::{
    providers::{Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::{
    env,
    path::{Path, PathBuf},
};

pub const DEFAULT_CONFIG_NAME: &str = "est.config.yaml";

/// Which co-processor strategy to construct at boot.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FheBackend {
    /// Deterministic test double
    Mock,
    /// Real BFV encryption
    Bfv,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct AppConfig {
    /// The name for the node
    name: String,
    /// The encryption backend to use
    backend: FheBackend,
    /// The chain id the tracker contract is considered deployed on
    chain_id: u64,
    /// Address of the tracker contract that proofs are bound to
    contract: Address,
    /// Seconds a cached user decryption authorization stays valid
    auth_validity_secs: u64,
    /// The base folder for configuration, defaults to `~/.config/est` on linux
    config_dir: PathBuf,
    /// Config file name
    config_file: PathBuf,
    /// The data dir, defaults to `~/.local/share/est`
    data_dir: PathBuf,
    /// The name for the database
    db_file: PathBuf,
    /// Used for testing if required
    cwd: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            backend: FheBackend::Mock,
            chain_id: 31337,
            contract: Address::ZERO,
            auth_validity_secs: 600,
            config_dir: OsDirs::config_dir(), // ~/.config/est
            config_file: PathBuf::from(DEFAULT_CONFIG_NAME),
            data_dir: OsDirs::data_dir(), // ~/.local/share/est
            db_file: PathBuf::from("db"),
            cwd: env::current_dir().unwrap_or_default(),
        }
    }
}

impl AppConfig {
    fn ensure_full_path(&self, dir: &Path, file: &PathBuf) -> PathBuf {
        normalize_path({
            // If this is absolute return it
            if file.is_absolute() || file.to_string_lossy().starts_with('~') {
                return file.clone();
            }

            // Otherwise resolve it relative to the given base dir
            dir.join(file)
        })
    }

    fn resolve_base_dir(&self, base_dir: &PathBuf, default_base_dir: &PathBuf) -> PathBuf {
        if base_dir.is_relative() {
            // If the config file is absolute all relative paths hang off its
            // parent so everything stays relative to the config file
            if self.config_file.is_absolute() {
                self.config_file
                    .parent()
                    .map_or_else(|| base_dir.clone(), |p| p.join(base_dir))
            } else {
                default_base_dir.join(base_dir)
            }
        } else {
            base_dir.to_owned()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn backend(&self) -> FheBackend {
        self.backend
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn contract(&self) -> Address {
        self.contract
    }

    pub fn auth_validity_secs(&self) -> u64 {
        self.auth_validity_secs
    }

    pub fn config_dir(&self) -> PathBuf {
        normalize_path(self.resolve_base_dir(&self.config_dir, &OsDirs::config_dir()))
    }

    pub fn data_dir(&self) -> PathBuf {
        normalize_path(self.resolve_base_dir(&self.data_dir, &OsDirs::data_dir()))
    }

    pub fn db_file(&self) -> PathBuf {
        self.ensure_full_path(&self.data_dir(), &self.db_file)
    }

    pub fn config_file(&self) -> PathBuf {
        self.ensure_full_path(&self.config_dir(), &self.config_file)
    }

    pub fn cwd(&self) -> PathBuf {
        self.cwd.to_owned()
    }
}

/// Load the config at the config_file or search parent directories for the
/// default filename if not provided
pub fn load_config(config_file: Option<&str>) -> Result<AppConfig> {
    let mut defaults = AppConfig::default();

    defaults.config_file = resolve_config_path(
        find_in_parent,
        env::current_dir()?,
        OsDirs::config_dir(),
        DEFAULT_CONFIG_NAME,
        config_file.map(PathBuf::from),
    );

    let config = Figment::from(Serialized::defaults(&defaults))
        .merge(Yaml::file(defaults.config_file()))
        .extract()?;

    Ok(config)
}

/// Utility to normalize paths
fn normalize_path(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    let mut components = Vec::new();

    for component in path.components() {
        match component {
            std::path::Component::ParentDir => {
                components.pop();
            }
            std::path::Component::Normal(name) => {
                components.push(name);
            }
            std::path::Component::RootDir => {
                components.clear();
                components.push(component.as_os_str());
            }
            std::path::Component::Prefix(prefix) => {
                components.push(prefix.as_os_str());
            }
            std::path::Component::CurDir => {}
        }
    }

    let mut result = PathBuf::new();
    for component in components {
        result.push(component);
    }
    result
}

struct OsDirs;
impl OsDirs {
    pub fn config_dir() -> PathBuf {
        dirs::config_dir().unwrap().join("est")
    }

    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir().unwrap().join("est")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_ensure_relative_path() {
        Jail::expect_with(|jail| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/home/testuser".to_string());
            jail.set_env("HOME", &home);

            let config = AppConfig {
                config_file: format!("{}/docs/myconfig.yaml", &home).into(),
                config_dir: "../foo".into(),
                data_dir: "../bar".into(),
                ..AppConfig::default()
            };

            assert_eq!(config.db_file(), PathBuf::from(format!("{}/bar/db", home)));
            assert_eq!(
                config.config_dir(),
                PathBuf::from(format!("{}/foo", home))
            );

            Ok(())
        });
    }

    #[test]
    fn test_defaults() {
        Jail::expect_with(|jail| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/home/testuser".to_string());
            jail.set_env("HOME", &home);

            let config = AppConfig::default();

            assert_eq!(config.backend(), FheBackend::Mock);
            assert_eq!(config.chain_id(), 31337);
            assert_eq!(config.auth_validity_secs(), 600);

            assert_eq!(
                config.db_file(),
                PathBuf::from(format!("{}/.local/share/est/db", home))
            );

            assert_eq!(
                config.config_file(),
                PathBuf::from(format!("{}/.config/est/est.config.yaml", home))
            );

            Ok(())
        });
    }

    #[test]
    fn test_config() {
        Jail::expect_with(|jail| {
            let home = format!("{}", jail.directory().to_string_lossy());
            jail.set_env("HOME", &home);
            jail.set_env("XDG_CONFIG_HOME", &format!("{}/.config", home));
            let filename = format!("{}/.config/est/est.config.yaml", home);
            let filedir = format!("{}/.config/est", home);
            jail.create_dir(filedir)?;
            jail.create_file(
                filename,
                r#"
name: "studynode"
backend: "bfv"
chain_id: 11155111
contract: "0x9fE46736679d2D9a65F0992F2272dE9f3c7fa6e0"
auth_validity_secs: 120
"#,
            )?;

            let config: AppConfig = load_config(None).map_err(|err| err.to_string())?;

            assert_eq!(config.name(), "studynode");
            assert_eq!(config.backend(), FheBackend::Bfv);
            assert_eq!(config.chain_id(), 11155111);
            assert_eq!(config.auth_validity_secs(), 120);
            assert_eq!(
                config.contract(),
                "0x9fE46736679d2D9a65F0992F2272dE9f3c7fa6e0"
                    .parse::<Address>()
                    .unwrap()
            );

            Ok(())
        });
    }
}
