use std::{net::SocketAddr, time::Duration};

use anyhow::Context;

use debtfolio_core::constants::DEFAULT_TOKEN_TTL_SECS;
use debtfolio_core::storage::StorageSettings;

use crate::auth::decode_secret_key;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub cors_allow: Vec<String>,
    pub jwt_secret: Vec<u8>,
    pub token_ttl: Duration,
    pub storage: StorageSettings,
}

impl Config {
    /// Read the whole configuration from the environment, once at
    /// startup.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = std::env::var("DF_LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .context("Invalid DF_LISTEN_ADDR")?;
        let cors_allow = std::env::var("DF_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let jwt_secret = decode_secret_key(
            &std::env::var("DF_JWT_SECRET").context("DF_JWT_SECRET must be set")?,
        )?;
        let token_ttl_secs: u64 = std::env::var("DF_TOKEN_TTL_SECS")
            .unwrap_or_else(|_| DEFAULT_TOKEN_TTL_SECS.to_string())
            .parse()
            .context("Invalid DF_TOKEN_TTL_SECS")?;
        let storage = StorageSettings::from_env()?;

        Ok(Self {
            listen_addr,
            cors_allow,
            jwt_secret,
            token_ttl: Duration::from_secs(token_ttl_secs),
            storage,
        })
    }
}
