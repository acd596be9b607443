use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    /// Anything other than `production` is treated as development.
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("production") {
            Self::Production
        } else {
            Self::Development
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Deserialize, Serialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub database_url: Option<String>,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub environment: Environment,
    #[serde(default = "default_enable_graphiql")]
    pub enable_graphiql: bool,
    /// Maximum accepted request body in bytes
    #[serde(default = "default_body_limit")]
    pub body_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            port: default_port(),
            environment: Environment::default(),
            enable_graphiql: default_enable_graphiql(),
            body_limit: default_body_limit(),
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &self.database_url.as_deref().map(redact_url))
            .field("port", &self.port)
            .field("environment", &self.environment)
            .field("enable_graphiql", &self.enable_graphiql)
            .field("body_limit", &self.body_limit)
            .finish()
    }
}

/// Replaces the `user:password@` part of a connection string.
fn redact_url(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    let host_start = rest.find('/').unwrap_or(rest.len());

    match rest[..host_start].rfind('@') {
        Some(at) => format!("{scheme}://***@{}", &rest[at + 1..]),
        None => url.to_string(),
    }
}

fn default_port() -> u16 {
    8500
}

fn default_enable_graphiql() -> bool {
    true
}

fn default_body_limit() -> usize {
    100 * 1024
}

impl Config {
    /// Read the YAML file at `path` if one is given, then apply environment
    /// variables on top.
    pub fn open<P: AsRef<Path>>(path: Option<P>) -> Result<Config, anyhow::Error> {
        let mut cfg = match path {
            Some(path) => {
                let path = path.as_ref();
                info!("Open config from {:?}", path);
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read config {path:?}"))?;
                serde_yml::from_str(&content)?
            }
            None => Config::default(),
        };

        cfg.merge_env(|key| std::env::var(key).ok())?;

        Ok(cfg)
    }

    /// Override fields from `MONGODB_URL`, `PORT` and `NODE_ENV` as looked up
    /// through `var`.
    pub fn merge_env<F>(&mut self, var: F) -> Result<(), anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = var("MONGODB_URL").filter(|url| !url.is_empty()) {
            self.database_url = Some(url);
        }

        if let Some(port) = var("PORT").filter(|port| !port.is_empty()) {
            self.port = port
                .parse()
                .with_context(|| format!("invalid PORT {port:?}"))?;
        }

        if let Some(env) = var("NODE_ENV") {
            self.environment = Environment::from_name(&env);
        }

        Ok(())
    }

    pub fn database_url(&self) -> Result<&str, anyhow::Error> {
        self.database_url
            .as_deref()
            .ok_or_else(|| anyhow!("MONGODB_URL environment variable is not defined"))
    }
}
