//! Backend selection settings, read once at process start.

use std::path::PathBuf;
use std::str::FromStr;

use crate::constants::DEFAULT_DATA_DIR;
use crate::errors::{Error, Result};

/// The primary storage configuration value.
///
/// The hosted backend is selected by a distinct configuration path (a
/// populated [`StorageSettings::hosted`] section), not by this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageMode {
    #[default]
    Local,
    Api,
}

impl FromStr for StorageMode {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "localStorage" => Ok(StorageMode::Local),
            "api" => Ok(StorageMode::Api),
            other => Err(Error::InvalidConfigValue(format!(
                "unknown storage mode '{other}', expected 'localStorage' or 'api'"
            ))),
        }
    }
}

/// Settings for the remote API backend.
#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub access_token: String,
}

/// Settings for the hosted backend-as-a-service backend.
#[derive(Debug, Clone)]
pub struct HostedSettings {
    pub base_url: String,
    pub api_key: String,
}

/// Storage backend selection, resolved from the environment once at
/// startup and treated as immutable thereafter.
#[derive(Debug, Clone)]
pub struct StorageSettings {
    pub mode: StorageMode,
    /// Directory holding the local backend's serialized collections.
    pub data_dir: PathBuf,
    pub api: Option<ApiSettings>,
    pub hosted: Option<HostedSettings>,
}

impl StorageSettings {
    /// Local-backend settings rooted at the given directory.
    pub fn local(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            mode: StorageMode::Local,
            data_dir: data_dir.into(),
            api: None,
            hosted: None,
        }
    }

    /// Read `DF_STORAGE_MODE`, `DF_DATA_DIR`, `DF_API_BASE_URL`,
    /// `DF_API_TOKEN`, `DF_HOSTED_BASE_URL`, and `DF_HOSTED_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let mode = match std::env::var("DF_STORAGE_MODE") {
            Ok(raw) => raw.parse()?,
            Err(_) => StorageMode::default(),
        };
        let data_dir = std::env::var("DF_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR));

        let api = match std::env::var("DF_API_BASE_URL") {
            Ok(base_url) => Some(ApiSettings {
                base_url,
                access_token: std::env::var("DF_API_TOKEN").unwrap_or_default(),
            }),
            Err(_) => None,
        };
        if mode == StorageMode::Api && api.is_none() {
            return Err(Error::MissingConfigKey("DF_API_BASE_URL".into()));
        }

        let hosted = match std::env::var("DF_HOSTED_BASE_URL") {
            Ok(base_url) => {
                let api_key = std::env::var("DF_HOSTED_API_KEY")
                    .map_err(|_| Error::MissingConfigKey("DF_HOSTED_API_KEY".into()))?;
                Some(HostedSettings { base_url, api_key })
            }
            Err(_) => None,
        };

        Ok(Self {
            mode,
            data_dir,
            api,
            hosted,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_modes() {
        assert_eq!("localStorage".parse::<StorageMode>().unwrap(), StorageMode::Local);
        assert_eq!("api".parse::<StorageMode>().unwrap(), StorageMode::Api);
    }

    #[test]
    fn rejects_unknown_mode() {
        let err = "sessionStorage".parse::<StorageMode>().unwrap_err();
        assert!(matches!(err, Error::InvalidConfigValue(_)));
    }
}
