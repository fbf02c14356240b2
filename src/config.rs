use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Clone, Debug)]
pub struct BackendConfig {
    pub base_url: String,
    /// Path segment the backend uses for organizations (`organizations` or `organisations`).
    pub org_segment: String,
    pub timeout: Duration,
}

#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub bucket: String,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub endpoint: Option<String>,
    pub url_ttl: Duration,
}

#[derive(Clone, Debug)]
pub struct MediaUploadConfig {
    pub cloud_name: String,
    pub upload_preset: String,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub bind_address: SocketAddr,
    pub backend: BackendConfig,
    pub storage: Option<StorageConfig>,
    pub media: Option<MediaUploadConfig>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_or(var("PORT"), "PORT", 3000u16)?;
        let bind_address = format!("{}:{}", host, port)
            .parse()
            .map_err(|_| ConfigError::Invalid {
                name: "HOST",
                value: host.clone(),
            })?;

        let base_url = var("BACKEND_URL")
            .ok_or(ConfigError::Missing("BACKEND_URL"))?
            .trim_end_matches('/')
            .to_string();
        let org_segment = var("BACKEND_ORG_SEGMENT").unwrap_or_else(|| "organizations".to_string());
        let timeout = Duration::from_secs(parse_or(
            var("BACKEND_TIMEOUT_SECS"),
            "BACKEND_TIMEOUT_SECS",
            30u64,
        )?);

        let storage = match (
            var("S3_BUCKET"),
            var("S3_REGION"),
            var("S3_ACCESS_KEY_ID"),
            var("S3_SECRET_ACCESS_KEY"),
        ) {
            (Some(bucket), Some(region), Some(access_key_id), Some(secret_access_key)) => {
                Some(StorageConfig {
                    bucket,
                    region,
                    access_key_id,
                    secret_access_key,
                    endpoint: var("S3_ENDPOINT"),
                    url_ttl: Duration::from_secs(parse_or(
                        var("UPLOAD_URL_TTL_SECS"),
                        "UPLOAD_URL_TTL_SECS",
                        900u64,
                    )?),
                })
            }
            _ => None,
        };

        let media = match (var("MEDIA_CLOUD_NAME"), var("MEDIA_UPLOAD_PRESET")) {
            (Some(cloud_name), Some(upload_preset)) => Some(MediaUploadConfig {
                cloud_name,
                upload_preset,
            }),
            _ => None,
        };

        Ok(Self {
            bind_address,
            backend: BackendConfig {
                base_url,
                org_segment,
                timeout,
            },
            storage,
            media,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    raw: Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}
