//! Configuration module
//!
//! Environment-driven configuration for the API process. Every required
//! value is checked in `from_env`/`validate` so a misconfigured process
//! refuses to start instead of failing on the first request.

use std::env;
use std::time::Duration;

const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const MAX_UPLOAD_SIZE_MB: usize = 50;
const MAX_AUDIO_SIZE_MB: usize = 100;
const SUMMARIZER_MAX_CONCURRENCY: usize = 4;
const SUMMARIZER_UNIT_TIMEOUT_SECS: u64 = 60;
const SUMMARIZER_BATCH_TIMEOUT_SECS: u64 = 300;

const DEFAULT_AVATAR_BASE_URL: &str = "https://tavusapi.com/v2";
const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com/v1";
const DEFAULT_ANTHROPIC_MODEL: &str = "claude-sonnet-4-20250514";
const DEFAULT_ASSEMBLYAI_BASE_URL: &str = "https://api.assemblyai.com/v2";

/// Blob storage backend selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    S3,
    Local,
}

/// Which summarization strategy the document pipeline uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummarizerStrategy {
    /// One combined call over all text units.
    Reduce,
    /// One call per unit through a bounded worker pool.
    FanOut,
}

/// Summarizer tuning: pool bound and deadlines (both mandatory).
#[derive(Debug, Clone)]
pub struct SummarizerSettings {
    pub strategy: SummarizerStrategy,
    pub max_concurrency: usize,
    pub unit_timeout: Duration,
    pub batch_timeout: Duration,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,

    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,

    pub storage_backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,

    pub avatar_api_key: String,
    pub avatar_replica_id: String,
    pub avatar_persona_id: String,
    pub avatar_base_url: String,
    pub avatar_callback_url: Option<String>,

    pub anthropic_api_key: String,
    pub anthropic_base_url: String,
    pub anthropic_model: String,

    pub assemblyai_api_key: String,
    pub assemblyai_base_url: String,

    pub max_upload_size_bytes: usize,
    pub max_audio_size_bytes: usize,

    pub summarizer: SummarizerSettings,
    pub context_include_raw_content: bool,

    /// Header carrying the caller identity (demo-grade authentication).
    pub identity_header: String,
    /// When set, every request is attributed to this fixed identity instead
    /// of reading the identity header.
    pub demo_user_id: Option<String>,
}

impl Config {
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let storage_backend = match env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "s3".to_string())
            .to_lowercase()
            .as_str()
        {
            "local" => StorageBackend::Local,
            _ => StorageBackend::S3,
        };

        let summarizer = SummarizerSettings {
            strategy: match env::var("SUMMARIZER_STRATEGY")
                .unwrap_or_else(|_| "fanout".to_string())
                .to_lowercase()
                .as_str()
            {
                "reduce" => SummarizerStrategy::Reduce,
                _ => SummarizerStrategy::FanOut,
            },
            max_concurrency: parse_env("SUMMARIZER_MAX_CONCURRENCY", SUMMARIZER_MAX_CONCURRENCY),
            unit_timeout: Duration::from_secs(parse_env(
                "SUMMARIZER_UNIT_TIMEOUT_SECS",
                SUMMARIZER_UNIT_TIMEOUT_SECS,
            )),
            batch_timeout: Duration::from_secs(parse_env(
                "SUMMARIZER_BATCH_TIMEOUT_SECS",
                SUMMARIZER_BATCH_TIMEOUT_SECS,
            )),
        };

        let config = Config {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| "4000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            environment,
            cors_origins,
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            db_max_connections: parse_env("DB_MAX_CONNECTIONS", MAX_CONNECTIONS),
            db_timeout_seconds: parse_env("DB_TIMEOUT_SECONDS", CONNECTION_TIMEOUT_SECS),
            storage_backend,
            s3_bucket: env::var("S3_BUCKET").ok(),
            s3_region: env::var("S3_REGION").or_else(|_| env::var("AWS_REGION")).ok(),
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            local_storage_path: env::var("LOCAL_STORAGE_PATH").ok(),
            local_storage_base_url: env::var("LOCAL_STORAGE_BASE_URL").ok(),
            avatar_api_key: env::var("AVATAR_API_KEY")
                .map_err(|_| anyhow::anyhow!("AVATAR_API_KEY must be set"))?,
            avatar_replica_id: env::var("AVATAR_REPLICA_ID")
                .map_err(|_| anyhow::anyhow!("AVATAR_REPLICA_ID must be set"))?,
            avatar_persona_id: env::var("AVATAR_PERSONA_ID")
                .map_err(|_| anyhow::anyhow!("AVATAR_PERSONA_ID must be set"))?,
            avatar_base_url: env::var("AVATAR_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_AVATAR_BASE_URL.to_string()),
            avatar_callback_url: env::var("AVATAR_CALLBACK_URL").ok().filter(|s| !s.is_empty()),
            anthropic_api_key: env::var("ANTHROPIC_API_KEY")
                .map_err(|_| anyhow::anyhow!("ANTHROPIC_API_KEY must be set"))?,
            anthropic_base_url: env::var("ANTHROPIC_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_ANTHROPIC_BASE_URL.to_string()),
            anthropic_model: env::var("ANTHROPIC_MODEL")
                .unwrap_or_else(|_| DEFAULT_ANTHROPIC_MODEL.to_string()),
            assemblyai_api_key: env::var("ASSEMBLYAI_API_KEY")
                .map_err(|_| anyhow::anyhow!("ASSEMBLYAI_API_KEY must be set"))?,
            assemblyai_base_url: env::var("ASSEMBLYAI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_ASSEMBLYAI_BASE_URL.to_string()),
            max_upload_size_bytes: parse_env("MAX_UPLOAD_SIZE_MB", MAX_UPLOAD_SIZE_MB) * 1024 * 1024,
            max_audio_size_bytes: parse_env("MAX_AUDIO_SIZE_MB", MAX_AUDIO_SIZE_MB) * 1024 * 1024,
            summarizer,
            context_include_raw_content: env::var("CONTEXT_INCLUDE_RAW_CONTENT")
                .unwrap_or_else(|_| "false".to_string())
                .to_lowercase()
                .parse()
                .unwrap_or(false),
            identity_header: env::var("IDENTITY_HEADER").unwrap_or_else(|_| "x-user-id".to_string()),
            demo_user_id: env::var("DEMO_USER_ID").ok().filter(|s| !s.is_empty()),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.is_production() && self.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        if !self.database_url.starts_with("postgresql://")
            && !self.database_url.starts_with("postgres://")
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        match self.storage_backend {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using the S3 storage backend"
                    ));
                }
                if self.s3_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using the S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using the local storage backend"
                    ));
                }
            }
        }

        if self.summarizer.max_concurrency == 0 {
            return Err(anyhow::anyhow!("SUMMARIZER_MAX_CONCURRENCY must be at least 1"));
        }
        if self.summarizer.unit_timeout.is_zero() || self.summarizer.batch_timeout.is_zero() {
            return Err(anyhow::anyhow!("Summarizer timeouts must be greater than zero"));
        }

        Ok(())
    }
}

fn parse_env<T: std::str::FromStr + ToString>(key: &str, default: T) -> T {
    env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse::<T>()
        .unwrap_or(default)
}
