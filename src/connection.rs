//! Connection configuration as supplied by the authentication server.
//!
//! Only the `validation.username` policy is read here. The server payload is
//! loosely typed, so anything missing or malformed inside `validation` is
//! treated as "no constraint" instead of failing the whole document.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use derive_more::Display;
use log::debug;
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid connection JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("Connection configuration must be a JSON object")]
    NotAnObject,
}

/// Length bounds (in characters, both inclusive) for usernames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[display("[{min}, {max}]")]
pub struct UsernamePolicy {
    pub min: usize,
    pub max: usize,
}

impl UsernamePolicy {
    pub fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    /// Whether a username of `length` characters fits the bounds.
    pub fn accepts_length(&self, length: usize) -> bool {
        (self.min..=self.max).contains(&length)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
struct ConnectionValidation {
    #[serde(default, deserialize_with = "lenient")]
    username: Option<UsernamePolicy>,
}

/// Read-only configuration of a database connection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Connection {
    #[serde(default, deserialize_with = "lenient")]
    validation: Option<ConnectionValidation>,
}

impl Connection {
    /// A connection enforcing a username policy.
    pub fn with_username_policy(min: usize, max: usize) -> Self {
        Self {
            validation: Some(ConnectionValidation {
                username: Some(UsernamePolicy::new(min, max)),
            }),
        }
    }

    /// Parses the JSON document sent by the server.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let value: Value = serde_json::from_str(json)?;
        if !value.is_object() {
            return Err(ConfigError::NotAnObject);
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Loads a connection from a JSON file on disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read connection file {}", path.display()))?;
        let connection = Self::from_json(&raw)
            .with_context(|| format!("Failed to parse connection file {}", path.display()))?;
        debug!("Loaded connection from {}", path.display());
        Ok(connection)
    }

    /// The username policy, if the server sent a usable one.
    pub fn username_validation(&self) -> Option<UsernamePolicy> {
        self.validation.as_ref().and_then(|v| v.username)
    }
}

/// Returns the connection's username policy, or `None` when there is none.
pub fn get_username_validation(connection: &Connection) -> Option<UsernamePolicy> {
    connection.username_validation()
}

// Accepts any JSON value and keeps it only if it is an object of the expected shape.
// Arrays are refused even though serde would fill struct fields from them in order.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if !value.is_object() {
        return Ok(None);
    }
    Ok(serde_json::from_value(value).ok())
}
