use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use log::debug;

use crate::{proxy::Protocol, Error, Result};

pub const PROXY_ADDRESS: &str = "PROXY_ADDRESS";
pub const PROXY_PORT: &str = "PROXY_PORT";
pub const PROXY_USERNAME: &str = "PROXY_USERNAME";
pub const PROXY_PASSWORD: &str = "PROXY_PASSWORD";
pub const PROXY_PROTOCOL: &str = "PROXY_PROTOCOL";

/// Snapshot of the variables every builder reads from.
///
/// Built once, either from the process environment layered over a `.env`
/// file or from an explicit list of pairs, and passed by reference to the
/// proxy and auth builders. Nothing reads `std::env` after construction.
#[derive(Debug, Clone, Default)]
pub struct Config {
    vars: HashMap<String, String>,
}

/// Proxy endpoint and credentials as read from the config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxySettings {
    pub address: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

impl Config {
    /// Load `env_file` (or `.env` searched from the current directory up) and
    /// overlay the process environment on top of it.
    ///
    /// A missing default `.env` is fine; a missing explicit file is not.
    pub fn load(env_file: Option<&Path>) -> Result<Self> {
        let path = env_file.map_or_else(|| PathBuf::from(".env"), Path::to_path_buf);
        let env_err = |source: dotenvy::Error| Error::EnvFile {
            path: path.clone(),
            source,
        };
        let entries = match env_file {
            Some(path) => Some(dotenvy::from_path_iter(path).map_err(env_err)?),
            None => match dotenvy::dotenv_iter() {
                Ok(iter) => Some(iter),
                Err(e) if e.not_found() => {
                    debug!("no .env file found, using process environment only");
                    None
                }
                Err(e) => return Err(env_err(e)),
            },
        };

        let mut vars = HashMap::new();
        if let Some(entries) = entries {
            for entry in entries {
                let (key, value) = entry.map_err(env_err)?;
                vars.insert(key, value);
            }
        }
        for (key, value) in std::env::vars_os() {
            match (key.to_str(), value.to_str()) {
                (Some(k), Some(v)) => {
                    vars.insert(k.to_string(), v.to_string());
                }
                _ => debug!(
                    "skipping non-UTF-8 environment variable {}",
                    key.to_string_lossy()
                ),
            }
        }
        Ok(Self { vars })
    }

    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn var(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn require(&self, key: &str) -> Result<&str> {
        self.var(key)
            .ok_or_else(|| Error::MissingVar(key.to_string()))
    }

    pub fn proxy_settings(&self) -> Result<ProxySettings> {
        let port = self.require(PROXY_PORT)?;
        let port = port
            .trim()
            .parse::<u16>()
            .map_err(|_| Error::InvalidPort(port.to_string()))?;
        Ok(ProxySettings {
            address: self.require(PROXY_ADDRESS)?.to_string(),
            port,
            username: self.require(PROXY_USERNAME)?.to_string(),
            password: self.require(PROXY_PASSWORD)?.to_string(),
        })
    }

    /// Protocol named by `PROXY_PROTOCOL`, if set.
    pub fn default_protocol(&self) -> Result<Option<Protocol>> {
        self.var(PROXY_PROTOCOL)
            .map(str::parse::<Protocol>)
            .transpose()
    }
}
