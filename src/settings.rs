//! Runtime settings from the environment (optionally seeded from `.env`).

use crate::error::ConfigError;
use std::net::SocketAddr;

/// Local file store used when `DATABASE_URL` is not set.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://holonet.db?mode=rwc";

/// Database backend selected by the connection string scheme.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backend {
    Sqlite,
    Postgres,
}

impl Backend {
    pub fn from_url(url: &str) -> Result<Self, ConfigError> {
        if url.starts_with("sqlite:") {
            Ok(Backend::Sqlite)
        } else if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            Ok(Backend::Postgres)
        } else {
            Err(ConfigError::UnsupportedDatabaseUrl(redact(url)))
        }
    }

    /// True for SQLite URLs that never touch disk; such a database lives only as long as its connection.
    pub fn is_in_memory(url: &str) -> bool {
        url.starts_with("sqlite:") && (url.contains(":memory:") || url.contains("mode=memory"))
    }
}

#[derive(Clone, Debug)]
pub struct Settings {
    pub database_url: String,
    pub backend: Backend,
    pub host: String,
    pub port: u16,
    pub max_connections: u32,
}

impl Settings {
    /// Read `DATABASE_URL`, `HOST`, `PORT` and `DATABASE_MAX_CONNECTIONS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let backend = Backend::from_url(&database_url)?;
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
                key: "PORT",
                value: raw,
            })?,
            None => 3000,
        };
        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "DATABASE_MAX_CONNECTIONS",
                        value: raw,
                    })
                }
            },
            None => 5,
        };
        Ok(Settings {
            database_url,
            backend,
            host,
            port,
            max_connections,
        })
    }

    /// Settings for a throwaway in-memory SQLite database (single connection).
    pub fn in_memory() -> Self {
        Settings {
            database_url: "sqlite::memory:".into(),
            backend: Backend::Sqlite,
            host: "127.0.0.1".into(),
            port: 0,
            max_connections: 1,
        }
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ConfigError::Invalid {
                key: "HOST",
                value: self.host.clone(),
            })
    }
}

/// Strip credentials before a URL ends up in an error message.
fn redact(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}://***{}", &url[..scheme_end], &url[at..])
        }
        _ => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_to_local_sqlite_file() {
        let s = settings(&[]).unwrap();
        assert_eq!(s.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(s.backend, Backend::Sqlite);
        assert_eq!(s.port, 3000);
        assert_eq!(s.max_connections, 5);
        assert_eq!(s.bind_addr().unwrap().to_string(), "0.0.0.0:3000");
    }

    #[test]
    fn postgres_urls_select_postgres() {
        for url in ["postgres://u:p@db/app", "postgresql://db/app"] {
            let s = settings(&[("DATABASE_URL", url)]).unwrap();
            assert_eq!(s.backend, Backend::Postgres);
        }
    }

    #[test]
    fn unknown_scheme_is_rejected_without_leaking_credentials() {
        let err = settings(&[("DATABASE_URL", "mysql://root:secret@db/app")]).unwrap_err();
        let text = err.to_string();
        assert!(text.contains("mysql://***@db/app"), "{text}");
        assert!(!text.contains("secret"));
    }

    #[test]
    fn invalid_numbers_are_errors() {
        assert!(settings(&[("PORT", "http")]).is_err());
        assert!(settings(&[("DATABASE_MAX_CONNECTIONS", "0")]).is_err());
        assert_eq!(settings(&[("PORT", "8080")]).unwrap().port, 8080);
    }

    #[test]
    fn detects_in_memory_sqlite() {
        assert!(Backend::is_in_memory("sqlite::memory:"));
        assert!(Backend::is_in_memory("sqlite://file:db?mode=memory&cache=shared"));
        assert!(!Backend::is_in_memory(DEFAULT_DATABASE_URL));
    }
}
