use std::env;

use dotenv::dotenv;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub database_url: String,
    pub host: String,
    pub port: u16,
}

impl Settings {
    /// Reads settings from the environment, loading `.env` if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let host = lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_owned());
        let port = match lookup("SERVER_PORT") {
            Some(port) => port
                .parse()
                .map_err(|_| ConfigError::Invalid("SERVER_PORT", port))?,
            None => 8080,
        };

        Ok(Self {
            database_url,
            host,
            port,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        assert_eq!(
            settings(&[("DATABASE_URL", "sqlite://fittrack.db")]).unwrap(),
            Settings {
                database_url: "sqlite://fittrack.db".to_owned(),
                host: "127.0.0.1".to_owned(),
                port: 8080,
            }
        );
    }

    #[test]
    fn overrides() {
        let settings = settings(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("SERVER_HOST", "0.0.0.0"),
            ("SERVER_PORT", "9000"),
        ])
        .unwrap();
        assert_eq!(settings.host, "0.0.0.0");
        assert_eq!(settings.port, 9000);
    }

    #[test]
    fn database_url_is_required() {
        assert!(matches!(
            settings(&[]),
            Err(ConfigError::Missing("DATABASE_URL"))
        ));
    }

    #[test]
    fn port_must_be_a_number() {
        assert!(matches!(
            settings(&[("DATABASE_URL", "x"), ("SERVER_PORT", "http")]),
            Err(ConfigError::Invalid("SERVER_PORT", _))
        ));
    }
}
