//! Configuration management for db-relay.
//!
//! Handles loading connection profiles from TOML files and converting them
//! to and from driver-manager style `Key=Value;` descriptors.

use crate::error::{RelayError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Main configuration structure for db-relay.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Named connection profiles.
    #[serde(default)]
    pub connections: HashMap<String, ConnectionProfile>,
}

/// A database connection profile.
///
/// Profiles are the structured form of a driver-manager descriptor; the two
/// convert losslessly for the keys the relay cares about.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConnectionProfile {
    /// Driver name as registered with the driver manager.
    pub driver: Option<String>,

    /// Database host.
    pub host: Option<String>,

    /// Database port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Database name.
    pub database: Option<String>,

    /// Database user.
    pub username: Option<String>,

    /// Database password (not recommended to store in config).
    pub password: Option<String>,

    /// Additional driver-specific key=value pairs, appended verbatim.
    #[serde(default)]
    pub extras: HashMap<String, String>,
}

fn default_port() -> u16 {
    3306
}

// Derived Default would zero the port; the serde attribute only covers
// deserialization, so the default is spelled out here as well.
impl Default for ConnectionProfile {
    fn default() -> Self {
        Self {
            driver: None,
            host: None,
            port: default_port(),
            database: None,
            username: None,
            password: None,
            extras: HashMap::new(),
        }
    }
}

static DESCRIPTOR_PAIR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([^=;]+)=(\{[^}]*\}|[^;]*)").expect("valid descriptor regex"));

impl ConnectionProfile {
    /// Builds the driver-manager descriptor for this profile.
    ///
    /// Format: `Driver={name};Server=host;Port=port;Database=db;Uid=user;Pwd=pass;`
    /// followed by any extras. Unset fields are omitted.
    pub fn to_descriptor(&self) -> String {
        let mut descriptor = String::new();

        if let Some(driver) = &self.driver {
            descriptor.push_str(&format!("Driver={{{driver}}};"));
        }
        if let Some(host) = &self.host {
            descriptor.push_str(&format!("Server={host};"));
        }
        descriptor.push_str(&format!("Port={};", self.port));
        if let Some(database) = &self.database {
            descriptor.push_str(&format!("Database={database};"));
        }
        if let Some(username) = &self.username {
            descriptor.push_str(&format!("Uid={username};"));
        }
        if let Some(password) = &self.password {
            descriptor.push_str(&format!("Pwd={password};"));
        }
        for (key, value) in &self.extras {
            descriptor.push_str(&format!("{key}={value};"));
        }

        descriptor
    }

    /// Parses a `Key=Value;` descriptor into a profile.
    ///
    /// Keys are matched case-sensitively; the first occurrence of a known key
    /// wins. Unknown keys land in `extras`. Brace-wrapped driver names are
    /// unwrapped.
    pub fn from_descriptor(descriptor: &str) -> Result<Self> {
        let mut profile = Self::default();

        for cap in DESCRIPTOR_PAIR.captures_iter(descriptor) {
            let key = cap[1].trim();
            let value = cap[2].to_string();

            match key {
                "Driver" if profile.driver.is_none() => {
                    let value = value
                        .strip_prefix('{')
                        .and_then(|v| v.strip_suffix('}'))
                        .unwrap_or(&value);
                    profile.driver = Some(value.to_string());
                }
                "Server" if profile.host.is_none() => profile.host = Some(value),
                "Port" => {
                    profile.port = value.parse().map_err(|_| {
                        RelayError::config(format!("Invalid port in descriptor: {value}"))
                    })?;
                }
                "Database" if profile.database.is_none() => profile.database = Some(value),
                "Uid" if profile.username.is_none() => profile.username = Some(value),
                "Pwd" if profile.password.is_none() => profile.password = Some(value),
                _ => {
                    profile.extras.entry(key.to_string()).or_insert(value);
                }
            }
        }

        Ok(profile)
    }

    /// Returns a display-safe string (no password) for logging purposes.
    pub fn display_string(&self) -> String {
        let host = self.host.as_deref().unwrap_or("localhost");
        let database = self.database.as_deref().unwrap_or("unknown");
        format!("{database} @ {host}:{}", self.port)
    }
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("db-relay")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| RelayError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            RelayError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }

    /// Gets a named connection profile, or the default profile if name is None.
    pub fn get_connection(&self, name: Option<&str>) -> Option<&ConnectionProfile> {
        let key = name.unwrap_or("default");
        self.connections.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_config() {
        let toml = r#"
[connections.default]
driver = "MySQL ODBC 8.0 Driver"
host = "localhost"
port = 3306
database = "mydb"
username = "root"

[connections.prod]
host = "prod.example.com"
database = "myapp"
username = "readonly"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        let default_conn = config.connections.get("default").unwrap();
        assert_eq!(default_conn.host, Some("localhost".to_string()));
        assert_eq!(default_conn.database, Some("mydb".to_string()));

        let prod_conn = config.connections.get("prod").unwrap();
        assert_eq!(prod_conn.host, Some("prod.example.com".to_string()));
        assert_eq!(prod_conn.port, 3306);
    }

    #[test]
    fn test_to_descriptor() {
        let profile = ConnectionProfile {
            driver: Some("MySQL ODBC 8.0 Driver".to_string()),
            host: Some("localhost".to_string()),
            port: 3306,
            database: Some("shop".to_string()),
            username: Some("root".to_string()),
            password: Some("secret".to_string()),
            extras: HashMap::new(),
        };

        assert_eq!(
            profile.to_descriptor(),
            "Driver={MySQL ODBC 8.0 Driver};Server=localhost;Port=3306;Database=shop;Uid=root;Pwd=secret;"
        );
    }

    #[test]
    fn test_from_descriptor_round_trip() {
        let descriptor =
            "Driver={MySQL ODBC 8.0 Driver};Server=localhost;Port=3307;Database=shop;Uid=root;Pwd=secret;";
        let profile = ConnectionProfile::from_descriptor(descriptor).unwrap();

        assert_eq!(profile.driver, Some("MySQL ODBC 8.0 Driver".to_string()));
        assert_eq!(profile.host, Some("localhost".to_string()));
        assert_eq!(profile.port, 3307);
        assert_eq!(profile.database, Some("shop".to_string()));
        assert_eq!(profile.username, Some("root".to_string()));
        assert_eq!(profile.password, Some("secret".to_string()));
        assert_eq!(profile.to_descriptor(), descriptor);
    }

    #[test]
    fn test_default_profile_uses_standard_port() {
        assert_eq!(ConnectionProfile::default().port, 3306);
    }

    #[test]
    fn test_from_descriptor_without_port_defaults() {
        let profile = ConnectionProfile::from_descriptor("Database=shop;").unwrap();
        assert_eq!(profile.port, 3306);
        assert!(profile.to_descriptor().contains("Port=3306;"));
    }

    #[test]
    fn test_from_descriptor_first_key_wins() {
        let profile =
            ConnectionProfile::from_descriptor("Database=first;Database=second;").unwrap();
        assert_eq!(profile.database, Some("first".to_string()));
    }

    #[test]
    fn test_from_descriptor_unknown_keys_land_in_extras() {
        let profile =
            ConnectionProfile::from_descriptor("Database=shop;Charset=utf8mb4;").unwrap();
        assert_eq!(profile.extras.get("Charset"), Some(&"utf8mb4".to_string()));
    }

    #[test]
    fn test_from_descriptor_invalid_port() {
        let result = ConnectionProfile::from_descriptor("Port=notaport;");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid port"));
    }

    #[test]
    fn test_display_string_hides_password() {
        let profile = ConnectionProfile {
            host: Some("localhost".to_string()),
            port: 3306,
            database: Some("mydb".to_string()),
            password: Some("secret".to_string()),
            ..Default::default()
        };

        assert_eq!(profile.display_string(), "mydb @ localhost:3306");
        assert!(!profile.display_string().contains("secret"));
    }

    #[test]
    fn test_load_from_missing_file_is_default() {
        let config = Config::load_from_file(Path::new("/nonexistent/config.toml")).unwrap();
        assert!(config.connections.is_empty());
    }

    #[test]
    fn test_load_from_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[connections.default]\ndatabase = \"shop\"\nhost = \"db.internal\""
        )
        .unwrap();

        let config = Config::load_from_file(file.path()).unwrap();
        let conn = config.get_connection(None).unwrap();
        assert_eq!(conn.database, Some("shop".to_string()));
        assert_eq!(conn.host, Some("db.internal".to_string()));
    }

    #[test]
    fn test_get_connection() {
        let toml = r#"
[connections.default]
database = "default_db"

[connections.prod]
database = "prod_db"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        let default = config.get_connection(None).unwrap();
        assert_eq!(default.database, Some("default_db".to_string()));

        let prod = config.get_connection(Some("prod")).unwrap();
        assert_eq!(prod.database, Some("prod_db".to_string()));

        assert!(config.get_connection(Some("nonexistent")).is_none());
    }
}
