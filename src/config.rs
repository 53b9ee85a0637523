use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use ipnet::IpNet;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub bucket: String,
    pub storage: StorageBackend,
    pub s3: S3Config,
    pub storage_timeout: Option<Duration>,
    pub static_dir: PathBuf,
    pub max_body_size: usize,
    pub trusted_proxies: Vec<IpNet>,
    pub log_level: String,
}

/// Connection settings for the S3 adapter. Anything left unset is resolved
/// by the AWS SDK's default provider chain.
#[derive(Debug, Clone, Default)]
pub struct S3Config {
    pub region: Option<String>,
    pub endpoint_url: Option<String>,
    pub force_path_style: bool,
    pub credentials: Option<StaticCredentials>,
}

#[derive(Clone)]
pub struct StaticCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl std::fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StorageBackend {
    S3,
    Memory,
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackend::S3 => write!(f, "s3"),
            StorageBackend::Memory => write!(f, "memory"),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let bucket = env_required("FORMSINK_BUCKET")?;

        let host: IpAddr = env_or("FORMSINK_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid FORMSINK_HOST: {e}"))?;

        let port: u16 = env_or("FORMSINK_PORT", "80")
            .parse()
            .map_err(|e| format!("Invalid FORMSINK_PORT: {e}"))?;

        let storage = match env_or("FORMSINK_STORAGE", "s3").as_str() {
            "s3" => StorageBackend::S3,
            "memory" => StorageBackend::Memory,
            other => return Err(format!("Invalid FORMSINK_STORAGE: {other}")),
        };

        let credentials = match (
            env_optional("AWS_ACCESS_KEY_ID"),
            env_optional("AWS_SECRET_ACCESS_KEY"),
        ) {
            (Some(access_key_id), Some(secret_access_key)) => Some(StaticCredentials {
                access_key_id,
                secret_access_key,
            }),
            _ => None,
        };

        let force_path_style = match env_or("FORMSINK_S3_FORCE_PATH_STYLE", "false").as_str() {
            "true" | "1" | "yes" => true,
            "false" | "0" | "no" => false,
            other => return Err(format!("Invalid FORMSINK_S3_FORCE_PATH_STYLE: {other}")),
        };

        let s3 = S3Config {
            region: env_optional("AWS_REGION"),
            endpoint_url: env_optional("FORMSINK_S3_ENDPOINT"),
            force_path_style,
            credentials,
        };

        let storage_timeout = env_optional("FORMSINK_STORAGE_TIMEOUT_SECS")
            .map(|s| {
                s.parse::<u64>()
                    .map(Duration::from_secs)
                    .map_err(|e| format!("Invalid FORMSINK_STORAGE_TIMEOUT_SECS: {e}"))
            })
            .transpose()?;

        let static_dir = PathBuf::from(env_or("FORMSINK_STATIC_DIR", "public"));

        let max_body_size: usize = env_or("FORMSINK_MAX_BODY_SIZE", "1048576")
            .parse()
            .map_err(|e| format!("Invalid FORMSINK_MAX_BODY_SIZE: {e}"))?;

        let trusted_proxies: Vec<IpNet> = env_or("FORMSINK_TRUSTED_PROXIES", "")
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(|s| {
                s.trim()
                    .parse()
                    .map_err(|e| format!("Invalid FORMSINK_TRUSTED_PROXIES entry '{s}': {e}"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let log_level = env_or("FORMSINK_LOG_LEVEL", "info");

        Ok(Config {
            host,
            port,
            bucket,
            storage,
            s3,
            storage_timeout,
            static_dir,
            max_body_size,
            trusted_proxies,
            log_level,
        })
    }
}

fn env_required(key: &str) -> Result<String, String> {
    env_optional(key).ok_or_else(|| format!("Missing required environment variable: {key}"))
}

fn env_optional(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
