use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::domain::value_objects::AllowedExtensions;

const DEFAULT_UPLOAD_DIR: &str = "./uploads";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;
const DEFAULT_INFERENCE_TIMEOUT_SECS: u64 = 60;
const DEFAULT_MAX_CONCURRENT_GENERATIONS: usize = 2;
const DEFAULT_EOS_TOKEN: &str = "<|endoftext|>";
const DEFAULT_MAX_CONTEXT_CHARS: usize = 4000;
const DEFAULT_OWNER_HEADER: &str = "x-user-id";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DB_POOL_SIZE: u32 = 10;

#[derive(Debug, PartialEq)]
pub enum ConfigError {
    MissingVariable(String),
    InvalidValue { key: String, value: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MissingVariable(key) => {
                write!(f, "Missing environment variable: {}", key)
            }
            ConfigError::InvalidValue { key, value } => {
                write!(f, "Invalid value for {}: {:?}", key, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Process settings, read once at start-up.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub db_pool_size: u32,
    pub upload_dir: PathBuf,
    pub allowed_extensions: AllowedExtensions,
    pub max_upload_bytes: usize,
    pub inference_service_url: String,
    pub inference_timeout: Duration,
    pub max_concurrent_generations: usize,
    pub eos_token: String,
    pub inference_seed: Option<u64>,
    /// Prepend the selected document's text to the prompt.
    pub ground_answers_in_document: bool,
    pub max_context_chars: usize,
    /// Header carrying the authenticated user id, set by the fronting auth proxy.
    pub owner_header: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key/value source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let required =
            |key: &str| get(key).ok_or_else(|| ConfigError::MissingVariable(key.to_string()));

        let allowed_extensions = match get("ALLOWED_EXTENSIONS") {
            Some(raw) => {
                AllowedExtensions::parse(&raw).map_err(|_| ConfigError::InvalidValue {
                    key: "ALLOWED_EXTENSIONS".to_string(),
                    value: raw.clone(),
                })?
            }
            None => AllowedExtensions::default(),
        };

        let max_concurrent_generations = parse_or(
            &get,
            "MAX_CONCURRENT_GENERATIONS",
            DEFAULT_MAX_CONCURRENT_GENERATIONS,
        )?;
        if max_concurrent_generations == 0 {
            return Err(ConfigError::InvalidValue {
                key: "MAX_CONCURRENT_GENERATIONS".to_string(),
                value: "0".to_string(),
            });
        }

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            db_pool_size: parse_or(&get, "DB_POOL_SIZE", DEFAULT_DB_POOL_SIZE)?,
            upload_dir: PathBuf::from(
                get("UPLOAD_DIR").unwrap_or_else(|| DEFAULT_UPLOAD_DIR.to_string()),
            ),
            allowed_extensions,
            max_upload_bytes: parse_or(&get, "MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            inference_service_url: required("INFERENCE_SERVICE_URL")?,
            inference_timeout: Duration::from_secs(parse_or(
                &get,
                "INFERENCE_TIMEOUT_SECS",
                DEFAULT_INFERENCE_TIMEOUT_SECS,
            )?),
            max_concurrent_generations,
            eos_token: get("INFERENCE_EOS_TOKEN").unwrap_or_else(|| DEFAULT_EOS_TOKEN.to_string()),
            inference_seed: get("INFERENCE_SEED")
                .map(|raw| parse_value("INFERENCE_SEED", raw))
                .transpose()?,
            ground_answers_in_document: get("GROUND_ANSWERS_IN_DOCUMENT")
                .map(|raw| parse_flag("GROUND_ANSWERS_IN_DOCUMENT", raw))
                .transpose()?
                .unwrap_or(false),
            max_context_chars: parse_or(&get, "MAX_CONTEXT_CHARS", DEFAULT_MAX_CONTEXT_CHARS)?,
            owner_header: get("OWNER_HEADER")
                .map(|header| header.to_ascii_lowercase())
                .unwrap_or_else(|| DEFAULT_OWNER_HEADER.to_string()),
            port: parse_or(&get, "PORT", DEFAULT_PORT)?,
        })
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, raw: String) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: raw,
    })
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => parse_value(key, raw),
        None => Ok(default),
    }
}

fn parse_flag(key: &str, raw: String) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    const REQUIRED: [(&str, &str); 2] = [
        ("DATABASE_URL", "postgres://localhost/docchat"),
        ("INFERENCE_SERVICE_URL", "http://localhost:8080/generate"),
    ];

    #[test]
    fn test_defaults() {
        let config = config_from(&REQUIRED).unwrap();

        assert_eq!(config.upload_dir, PathBuf::from("./uploads"));
        assert!(config.allowed_extensions.matching_extension("a.pdf").is_some());
        assert_eq!(config.max_upload_bytes, 16 * 1024 * 1024);
        assert_eq!(config.inference_timeout, Duration::from_secs(60));
        assert_eq!(config.max_concurrent_generations, 2);
        assert_eq!(config.eos_token, "<|endoftext|>");
        assert_eq!(config.inference_seed, None);
        assert!(!config.ground_answers_in_document);
        assert_eq!(config.max_context_chars, 4000);
        assert_eq!(config.owner_header, "x-user-id");
        assert_eq!(config.port, 3000);
        assert_eq!(config.db_pool_size, 10);
    }

    #[test]
    fn test_missing_required_variable() {
        let result = config_from(&[("DATABASE_URL", "postgres://localhost/docchat")]);
        assert_eq!(
            result.unwrap_err(),
            ConfigError::MissingVariable("INFERENCE_SERVICE_URL".to_string())
        );

        let blank = config_from(&[
            ("DATABASE_URL", "   "),
            ("INFERENCE_SERVICE_URL", "http://localhost"),
        ]);
        assert_eq!(
            blank.unwrap_err(),
            ConfigError::MissingVariable("DATABASE_URL".to_string())
        );
    }

    #[test]
    fn test_overrides() {
        let mut pairs = REQUIRED.to_vec();
        pairs.extend([
            ("ALLOWED_EXTENSIONS", "pdf, TXT"),
            ("INFERENCE_TIMEOUT_SECS", "5"),
            ("MAX_CONCURRENT_GENERATIONS", "4"),
            ("INFERENCE_SEED", "42"),
            ("GROUND_ANSWERS_IN_DOCUMENT", "true"),
            ("OWNER_HEADER", "X-Remote-User"),
            ("PORT", "8081"),
        ]);

        let config = config_from(&pairs).unwrap();

        assert_eq!(
            config.allowed_extensions.matching_extension("notes.txt"),
            Some("txt".to_string())
        );
        assert_eq!(config.inference_timeout, Duration::from_secs(5));
        assert_eq!(config.max_concurrent_generations, 4);
        assert_eq!(config.inference_seed, Some(42));
        assert!(config.ground_answers_in_document);
        assert_eq!(config.owner_header, "x-remote-user");
        assert_eq!(config.port, 8081);
    }

    #[test]
    fn test_invalid_values() {
        for (key, value) in [
            ("PORT", "eighty"),
            ("MAX_CONCURRENT_GENERATIONS", "0"),
            ("GROUND_ANSWERS_IN_DOCUMENT", "maybe"),
            ("ALLOWED_EXTENSIONS", ", ,"),
        ] {
            let mut pairs = REQUIRED.to_vec();
            pairs.push((key, value));
            assert!(
                matches!(config_from(&pairs), Err(ConfigError::InvalidValue { .. })),
                "{} = {:?} should be rejected",
                key,
                value
            );
        }
    }
}
