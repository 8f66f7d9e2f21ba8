use anyhow::Context;

pub const DEFAULT_APP_NAME: &str = "Glucotracker";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Settings read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    /// Postgres connection string; only the database-backed commands need it.
    pub database_url: Option<String>,
    pub app_name: String,
    pub max_connections: u32,
}

impl TrackerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let app_name = lookup("GLUCOTRACKER_APP_NAME")
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_APP_NAME.to_string());

        let max_connections = match lookup("GLUCOTRACKER_MAX_CONNECTIONS") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .with_context(|| {
                    format!("GLUCOTRACKER_MAX_CONNECTIONS must be a positive integer, got {raw:?}")
                })?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(Self {
            database_url: lookup("DATABASE_URL"),
            app_name,
            max_connections,
        })
    }

    pub fn require_database_url(&self) -> anyhow::Result<&str> {
        self.database_url
            .as_deref()
            .context("DATABASE_URL must be set to a Postgres instance")
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> anyhow::Result<TrackerConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        TrackerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config(&[]).unwrap();
        assert_eq!(config.app_name, "Glucotracker");
        assert_eq!(config.max_connections, 5);
        assert!(config.database_url.is_none());
        assert!(config.require_database_url().is_err());
    }

    #[test]
    fn reads_overrides() {
        let config = config(&[
            ("DATABASE_URL", "postgres://localhost/gluco"),
            ("GLUCOTRACKER_APP_NAME", "AppName"),
            ("GLUCOTRACKER_MAX_CONNECTIONS", "2"),
        ])
        .unwrap();
        assert_eq!(config.app_name, "AppName");
        assert_eq!(config.max_connections, 2);
        assert_eq!(
            config.require_database_url().unwrap(),
            "postgres://localhost/gluco"
        );
    }

    #[test]
    fn rejects_bad_connection_count() {
        assert!(config(&[("GLUCOTRACKER_MAX_CONNECTIONS", "0")]).is_err());
        assert!(config(&[("GLUCOTRACKER_MAX_CONNECTIONS", "many")]).is_err());
    }
}
