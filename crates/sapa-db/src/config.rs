//! Database configuration.

use std::fmt;

use sqlx::mysql::MySqlConnectOptions;

/// Connection settings for the booking database.
#[derive(Clone)]
pub struct DbConfig {
    /// Database server host name or address.
    pub host: String,

    /// Database server port.
    pub port: u16,

    /// Schema name.
    pub database: String,

    /// Login user.
    pub user: String,

    /// Login password.
    pub password: String,

    /// Maximum pooled connections.
    pub max_connections: u32,

    /// Seconds to wait for a free connection before failing.
    pub acquire_timeout_secs: u64,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3306,
            database: "sapa_app_db".to_string(),
            user: "admin".to_string(),
            password: String::new(),
            max_connections: 5,
            acquire_timeout_secs: 10,
        }
    }
}

impl DbConfig {
    /// Connection options for the sqlx driver.
    pub fn connect_options(&self) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database)
    }
}

// Keeps the password out of logs.
impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout_secs", &self.acquire_timeout_secs)
            .finish()
    }
}

impl fmt::Display for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mysql://{}@{}:{}/{}", self.user, self.host, self.port, self.database)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_is_redacted() {
        let config = DbConfig {
            password: "secret".to_string(),
            ..DbConfig::default()
        };
        assert!(!format!("{:?}", config).contains("secret"));
        assert_eq!(config.to_string(), "mysql://admin@127.0.0.1:3306/sapa_app_db");
    }
}
