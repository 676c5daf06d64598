use aws_config::timeout::TimeoutConfig;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_s3::config::Credentials;
use std::time::Duration;

const AWS_REGION: &str = "AWS_REGION";
const AWS_S3_BUCKET: &str = "AWS_S3_BUCKET";
const AWS_REKOGNITION_COLLECTION_ID: &str = "AWS_REKOGNITION_COLLECTION_ID";
const AWS_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
const AWS_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";
const CLOUDFRONT_URL: &str = "CLOUDFRONT_URL";
const PHOTO_COLLECTION_PREFIX: &str = "PHOTO_COLLECTION_PREFIX";
const OUTBOUND_TIMEOUT_SECS: &str = "OUTBOUND_TIMEOUT_SECS";

pub const DEFAULT_PHOTO_COLLECTION_PREFIX: &str = "prewed/";
const DEFAULT_OUTBOUND_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{0} has an invalid value: {1}")]
    Invalid(&'static str, String),
    #[error("AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY must be set together")]
    PartialCredentials,
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

/// Settings every process needs to reach the bucket and the face collection.
#[derive(Debug, Clone)]
pub struct AwsSettings {
    pub region: String,
    pub bucket: String,
    pub collection_id: String,
    pub credentials: Option<StaticCredentials>,
    pub outbound_timeout: Duration,
}

/// Full configuration of the API Lambda.
#[derive(Debug, Clone)]
pub struct Config {
    pub aws: AwsSettings,
    /// Public CDN base URL, without a trailing slash.
    pub cdn_base_url: String,
    /// Key prefix of the photo collection, with a trailing slash.
    pub photo_prefix: String,
}

impl AwsSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let credentials = match (
            optional(&lookup, AWS_ACCESS_KEY_ID),
            optional(&lookup, AWS_SECRET_ACCESS_KEY),
        ) {
            (Some(access_key_id), Some(secret_access_key)) => Some(StaticCredentials {
                access_key_id,
                secret_access_key,
            }),
            (None, None) => None,
            _ => return Err(ConfigError::PartialCredentials),
        };

        let outbound_timeout = match optional(&lookup, OUTBOUND_TIMEOUT_SECS) {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::Invalid(OUTBOUND_TIMEOUT_SECS, raw)),
            },
            None => Duration::from_secs(DEFAULT_OUTBOUND_TIMEOUT_SECS),
        };

        Ok(Self {
            region: required(&lookup, AWS_REGION)?,
            bucket: required(&lookup, AWS_S3_BUCKET)?,
            collection_id: required(&lookup, AWS_REKOGNITION_COLLECTION_ID)?,
            credentials,
            outbound_timeout,
        })
    }

    /// Build the SDK config shared by the S3 and Rekognition clients.
    pub async fn load_sdk_config(&self) -> SdkConfig {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(self.region.clone()))
            .timeout_config(
                TimeoutConfig::builder()
                    .operation_timeout(self.outbound_timeout)
                    .build(),
            );

        if let Some(creds) = &self.credentials {
            loader = loader.credentials_provider(Credentials::new(
                creds.access_key_id.clone(),
                creds.secret_access_key.clone(),
                None,
                None,
                "amour-static",
            ));
        }

        loader.load().await
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let aws = AwsSettings::from_lookup(&lookup)?;

        let cdn_base_url = required(&lookup, CLOUDFRONT_URL)?;
        if !cdn_base_url.starts_with("https://") && !cdn_base_url.starts_with("http://") {
            return Err(ConfigError::Invalid(CLOUDFRONT_URL, cdn_base_url));
        }
        let cdn_base_url = cdn_base_url.trim_end_matches('/').to_string();

        let mut photo_prefix = optional(&lookup, PHOTO_COLLECTION_PREFIX)
            .unwrap_or_else(|| DEFAULT_PHOTO_COLLECTION_PREFIX.to_string());
        if !photo_prefix.ends_with('/') {
            photo_prefix.push('/');
        }

        Ok(Self {
            aws,
            cdn_base_url,
            photo_prefix,
        })
    }

    /// Public URL of an object key.
    pub fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.cdn_base_url, key.trim_start_matches('/'))
    }
}

fn optional<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    optional(lookup, key).ok_or(ConfigError::Missing(key))
}
